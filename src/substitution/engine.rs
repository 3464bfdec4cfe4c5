//! Run-level placeholder substitution engine

use std::fmt;

use serde::Serialize;

use super::ReplacementMap;
use crate::document::{Document, Paragraph};

/// Where a paragraph lives, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Body {
        paragraph: usize,
    },
    Table {
        table: usize,
        row: usize,
        cell: usize,
        paragraph: usize,
    },
    Header {
        section: usize,
        paragraph: usize,
    },
    Footer {
        section: usize,
        paragraph: usize,
    },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Body { paragraph } => write!(f, "paragraph {}", paragraph),
            Location::Table {
                table,
                row,
                cell,
                paragraph,
            } => write!(
                f,
                "table {}, row {}, cell {}, paragraph {}",
                table, row, cell, paragraph
            ),
            Location::Header { section, paragraph } => {
                write!(f, "header {}, paragraph {}", section, paragraph)
            }
            Location::Footer { section, paragraph } => {
                write!(f, "footer {}, paragraph {}", section, paragraph)
            }
        }
    }
}

/// Number of placeholder occurrences replaced, per surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplacementCount {
    pub body: usize,
    pub tables: usize,
    pub headers: usize,
    pub footers: usize,
}

impl ReplacementCount {
    pub fn total(&self) -> usize {
        self.body + self.tables + self.headers + self.footers
    }
}

/// Replace placeholders across body paragraphs, table cells, section headers
/// and section footers.
///
/// Every occurrence of a token inside a single run's text is replaced and
/// counted once. Tokens that are never found are not an error.
pub fn substitute(document: &mut Document, replacements: &ReplacementMap) -> ReplacementCount {
    let mut count = ReplacementCount::default();
    if replacements.is_empty() {
        return count;
    }

    for (index, paragraph) in document.paragraphs_mut().enumerate() {
        count.body += substitute_paragraph(
            paragraph,
            replacements,
            Location::Body { paragraph: index },
        );
    }

    for (t, table) in document.tables_mut().enumerate() {
        for (r, row) in table.rows_mut().iter_mut().enumerate() {
            for (c, cell) in row.cells_mut().iter_mut().enumerate() {
                for (p, paragraph) in cell.paragraphs_mut().iter_mut().enumerate() {
                    count.tables += substitute_paragraph(
                        paragraph,
                        replacements,
                        Location::Table {
                            table: t,
                            row: r,
                            cell: c,
                            paragraph: p,
                        },
                    );
                }
            }
        }
    }

    for section in 0..document.sections().len() {
        if let Some(header) = document.section_header_mut(section) {
            for (p, paragraph) in header.paragraphs_mut().enumerate() {
                count.headers += substitute_paragraph(
                    paragraph,
                    replacements,
                    Location::Header {
                        section,
                        paragraph: p,
                    },
                );
            }
        }
        if let Some(footer) = document.section_footer_mut(section) {
            for (p, paragraph) in footer.paragraphs_mut().enumerate() {
                count.footers += substitute_paragraph(
                    paragraph,
                    replacements,
                    Location::Footer {
                        section,
                        paragraph: p,
                    },
                );
            }
        }
    }

    tracing::debug!(total = count.total(), ?count, "Substitution finished");
    count
}

fn substitute_paragraph(
    paragraph: &mut Paragraph,
    replacements: &ReplacementMap,
    location: Location,
) -> usize {
    let mut replaced = 0;

    for (token, value) in replacements.iter() {
        // paragraph text is only a pre-filter; matching happens per run
        if !paragraph.text().contains(token) {
            continue;
        }
        tracing::debug!(token, %location, "Found placeholder");

        for run in paragraph.runs_mut() {
            let n = run.replace_all(token, value);
            if n > 0 {
                tracing::debug!(token, occurrences = n, %location, "Replaced placeholder");
                replaced += n;
            }
        }
    }

    replaced
}
