//! Placeholder substitution for Word documents.
//!
//! This module provides:
//! - `ReplacementMap`, an ordered token → value list
//! - The run-level substitution engine over body paragraphs, table cells,
//!   section headers and section footers
//!
//! Only occurrences that sit entirely inside one run are replaced. A token the
//! authoring tool split across several runs is left as it is.

mod engine;
mod map;

pub use engine::{substitute, Location, ReplacementCount};
pub use map::ReplacementMap;
