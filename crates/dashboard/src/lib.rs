//! # Salesboard Dashboard
//!
//! The session-scoped context that ties the pipeline together:
//! Dataset Provider → Derived-Metrics Calculator → Range Filter → Summary Aggregator →
//! chart projections, with the watchlist mirror alongside.
//!
//! ## Architectural Principles
//!
//! - **Explicit Session State:** the memoized dataset, the watchlist mirror and the current
//!   control values live in one `DashboardSession` value owned by the caller. Nothing is
//!   global, so two sessions never interfere.
//! - **Explicit Events:** every interaction is a `DashboardEvent` handed to
//!   `DashboardSession::handle`, which runs exactly one pipeline pass and returns the view.

pub mod error;
pub mod session;
pub mod view;

pub use error::DashboardError;
pub use session::DashboardSession;
pub use view::{DashboardView, MetricsPanel};
