//! # Salesboard Events
//!
//! The inputs a presentation layer sends into a dashboard session, and the notices the
//! session sends back alongside each view.
//!
//! As a Layer 0 crate, it depends only on `core-types`. Every user interaction becomes
//! exactly one `DashboardEvent`; there is no implicit re-run.

// Declare the modules that make up this crate.
pub mod error;
pub mod messages;

// Re-export the core types to provide a clean public API.
pub use error::EventsError;
pub use messages::{DashboardEvent, Notice, NoticeLevel};
