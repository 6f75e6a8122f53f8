use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    Config, CsvSourceSettings, DashboardSettings, DataSourceSettings, LoggingSettings,
    StoreBackend, StoreSettings,
};

/// Environment variables with this prefix override file values,
/// e.g. `SALESBOARD__STORE__BACKEND=postgres`.
pub const ENV_PREFIX: &str = "SALESBOARD";

/// Loads the application configuration from a TOML file plus environment overrides.
///
/// A missing file is not an error: every section has defaults. The result is validated
/// before it is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(config)
}

impl Config {
    /// Checks cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.dashboard;

        if let (Some(min), Some(max)) = (d.min_year, d.max_year) {
            if min > max {
                return Err(ConfigError::ValidationError(format!(
                    "dashboard.min_year ({}) must not be after dashboard.max_year ({})",
                    min, max
                )));
            }
        }
        if let (Some(start), Some(end)) = (d.default_start, d.default_end) {
            if start > end {
                return Err(ConfigError::ValidationError(format!(
                    "dashboard.default_start ({}) must not be after dashboard.default_end ({})",
                    start, end
                )));
            }
        }
        for (name, year) in [("default_start", d.default_start), ("default_end", d.default_end)] {
            let Some(year) = year else { continue };
            if d.min_year.is_some_and(|min| year < min) || d.max_year.is_some_and(|max| year > max) {
                return Err(ConfigError::ValidationError(format!(
                    "dashboard.{} ({}) lies outside the slider bounds",
                    name, year
                )));
            }
        }

        if let DataSourceSettings::Csv(csv) = &self.data_source {
            if csv.path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "data_source.path must be set for the csv source".to_string(),
                ));
            }
        }

        if self.store.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "store.max_connections must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
