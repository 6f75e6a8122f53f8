use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Sales data from '{source_name}' is unavailable: {reason}")]
    DataUnavailable { source_name: String, reason: String },
}

impl DatasetError {
    pub fn unavailable(source_name: &str, reason: impl ToString) -> Self {
        DatasetError::DataUnavailable {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }
}
