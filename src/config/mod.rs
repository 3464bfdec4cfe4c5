mod settings;

pub use settings::{LoggingConfig, OutputConfig, ServerConfig, Settings, TemplateConfig};
