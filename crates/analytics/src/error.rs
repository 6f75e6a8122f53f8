use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Invalid record for year {year}: {reason}")]
    InvalidRecord { year: i32, reason: String },

    #[error("Invalid year range: start {start} is after end {end}")]
    InvalidRange { start: i32, end: i32 },

    #[error("No data in the selected range; metrics are undefined")]
    EmptyRange,

    #[error("Calculation error: Division by zero encountered in metric '{0}'")]
    DivisionByZero(String),

    #[error("Calculation error: Metric '{0}' is out of the representable range")]
    Overflow(String),
}
