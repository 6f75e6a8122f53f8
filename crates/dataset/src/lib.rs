//! # Salesboard Dataset
//!
//! Produces the raw yearly sales table, either from the figures compiled into the binary or
//! from a spreadsheet export on disk, and keeps it for the lifetime of a session.
//!
//! ## Public API
//!
//! - `DataSource`: the trait every source implements.
//! - `EmbeddedSource` / `CsvFileSource`: the two built-in sources.
//! - `DatasetProvider`: the per-session cache in front of a source.
//! - `DatasetError`: the specific error types that can be returned from this crate.

pub mod error;
pub mod provider;
pub mod sources;

pub use error::DatasetError;
pub use provider::DatasetProvider;
pub use sources::{CsvFileSource, DataSource, EmbeddedSource};
