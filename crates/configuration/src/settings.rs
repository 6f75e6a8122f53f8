use core_types::YearRange;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; a missing section falls back to its defaults,
/// which reproduce the built-in dashboard against an in-memory watchlist.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub data_source: DataSourceSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Sidebar controls and page chrome.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub title: String,
    /// Slider bounds. When unset, the dataset's own first/last year is used.
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    /// Initial slider position. When unset, the full bounds are selected.
    pub default_start: Option<i32>,
    pub default_end: Option<i32>,
    /// Initial state of the "显示利润" checkbox.
    pub show_profit: bool,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: "销售数据分析看板".to_string(),
            min_year: None,
            max_year: None,
            default_start: None,
            default_end: None,
            show_profit: true,
        }
    }
}

impl DashboardSettings {
    /// Resolves the slider bounds against the dataset's year domain.
    pub fn bounds(&self, domain: YearRange) -> YearRange {
        YearRange {
            start: self.min_year.unwrap_or(domain.start),
            end: self.max_year.unwrap_or(domain.end),
        }
    }

    /// Resolves the initial range against the slider bounds.
    pub fn default_range(&self, bounds: YearRange) -> YearRange {
        YearRange {
            start: self.default_start.unwrap_or(bounds.start),
            end: self.default_end.unwrap_or(bounds.end),
        }
    }
}

/// Where the sales table comes from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSourceSettings {
    /// The figures compiled into the binary.
    #[default]
    Embedded,
    /// A spreadsheet export in CSV form.
    Csv(CsvSourceSettings),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CsvSourceSettings {
    pub path: PathBuf,
    /// Number of lines to skip before the header line.
    #[serde(default)]
    pub header_row: usize,
    /// The year column, used as the row key.
    #[serde(default = "default_index_column")]
    pub index_column: String,
    #[serde(default = "default_product_a_column")]
    pub product_a_column: String,
    #[serde(default = "default_product_b_column")]
    pub product_b_column: String,
    #[serde(default = "default_cost_column")]
    pub cost_column: String,
}

fn default_index_column() -> String {
    "year".to_string()
}
fn default_product_a_column() -> String {
    "product_a_sales".to_string()
}
fn default_product_b_column() -> String {
    "product_b_sales".to_string()
}
fn default_cost_column() -> String {
    "cost".to_string()
}

/// Which watchlist store implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// The hosted PostgreSQL database.
    Postgres,
    /// A process-local store, lost on exit.
    #[default]
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    /// Connection string for the hosted database, credentials included. The `DATABASE_URL`
    /// environment variable takes precedence when set.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            database_url: None,
            max_connections: 5,
            acquire_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive; `RUST_LOG` overrides it.
    pub level: String,
    /// When set, logs also go to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "salesboard.log".to_string(),
        }
    }
}
