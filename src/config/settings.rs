use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Placeholder in `template.download_url` that is replaced with `template.id`
pub const TEMPLATE_ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub template: TemplateConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    /// Opaque identifier of the template document in the remote store
    #[serde(default = "default_template_id")]
    pub id: String,
    /// Download URL; `{id}` is replaced with the template identifier
    #[serde(default = "default_download_url")]
    pub download_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Largest template body accepted from the store
    #[serde(default = "default_max_template_bytes")]
    pub max_bytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,
    /// Scratch directory for serialized documents (OS temp dir when unset)
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Fallback filter directive when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_template_id() -> String {
    "1jnQRnscY9chDJZMPY8EI5TsQScMRNF05".to_string()
}

fn default_download_url() -> String {
    "https://drive.google.com/uc?export=download&id={id}".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_template_bytes() -> u64 {
    25 * 1024 * 1024 // 25 MB
}

fn default_filename_prefix() -> String {
    "Processed_Affidavit".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", 5001)?
            .set_default("template.id", default_template_id())?
            .set_default("template.download_url", default_download_url())?
            .set_default("output.filename_prefix", default_filename_prefix())?
            .set_default("logging.format", default_log_format())?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // SERVER__PORT, TEMPLATE__ID, OUTPUT__SCRATCH_DIR, LOGGING__FORMAT, etc.
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl TemplateConfig {
    /// Download URL with the template identifier filled in
    pub fn resolved_url(&self) -> String {
        self.download_url.replace(TEMPLATE_ID_PLACEHOLDER, &self.id)
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            template: TemplateConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            id: default_template_id(),
            download_url: default_download_url(),
            timeout_seconds: default_timeout_seconds(),
            max_bytes: default_max_template_bytes(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename_prefix: default_filename_prefix(),
            scratch_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            filter: default_log_filter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 5001);

        let output = OutputConfig::default();
        assert_eq!(output.filename_prefix, "Processed_Affidavit");
        assert!(output.scratch_dir.is_none());
    }

    #[test]
    fn test_resolved_url_fills_template_id() {
        let template = TemplateConfig::default();
        assert_eq!(
            template.resolved_url(),
            "https://drive.google.com/uc?export=download&id=1jnQRnscY9chDJZMPY8EI5TsQScMRNF05"
        );

        let custom = TemplateConfig {
            id: "abc".to_string(),
            download_url: "http://127.0.0.1:9000/files/{id}/raw".to_string(),
            ..TemplateConfig::default()
        };
        assert_eq!(custom.resolved_url(), "http://127.0.0.1:9000/files/abc/raw");
    }

    #[test]
    fn test_logging_format() {
        assert!(!LoggingConfig::default().is_json());
        let json = LoggingConfig {
            format: "JSON".to_string(),
            ..LoggingConfig::default()
        };
        assert!(json.is_json());
    }

    #[test]
    fn test_server_addr() {
        let settings = Settings::default();
        assert_eq!(settings.server_addr(), "0.0.0.0:5001");
    }
}
