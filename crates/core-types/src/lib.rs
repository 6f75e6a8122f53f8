//! # Salesboard Core Types
//!
//! The shared vocabulary of the workspace: sales rows before and after enrichment, the
//! ordered dataset they live in, the inclusive year range used to filter it, and the
//! watchlist entry mirrored from the remote store.
//!
//! As a Layer 0 crate it holds no logic beyond constructors and small accessors.

pub mod error;
pub mod range;
pub mod sales;
pub mod watchlist;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use range::YearRange;
pub use sales::{RawSalesRow, SalesDataset, SalesRecord, SalesTable};
pub use watchlist::WatchlistEntry;
