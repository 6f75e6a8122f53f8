use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventsError {
    #[error("Unknown dashboard command: {0}")]
    UnknownCommand(String),
}
