use crate::error::Error;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

pub const DEFAULT_SAMPLE_ROWS: usize = 5;
pub const DEFAULT_PATTERN: &str = "*.csv";
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Number of data rows read after the header for type inference.
    pub sample_rows: usize,
    /// Glob matched against file names during a directory scan.
    pub pattern: String,
    pub recursive: bool,
    pub similarity_threshold: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sample_rows: DEFAULT_SAMPLE_ROWS,
            pattern: DEFAULT_PATTERN.to_string(),
            recursive: false,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.sample_rows == 0 {
            return Err(Error::InvalidConfig(
                "sample_rows must be a positive integer".to_string(),
            ));
        }
        crate::analysis::grouping::check_threshold(self.similarity_threshold)
    }
}

/// Load settings from an optional `Config.toml` and `SCHEMA_GROUPER_*` env vars.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .set_default("sample_rows", DEFAULT_SAMPLE_ROWS as u64)?
        .set_default("pattern", DEFAULT_PATTERN)?
        .set_default("recursive", false)?
        .set_default("similarity_threshold", DEFAULT_SIMILARITY_THRESHOLD)?
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("SCHEMA_GROUPER"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
