//! # Salesboard Database Crate
//!
//! This crate is the persistence adapter for the watchlist. The hosted PostgreSQL
//! database is the source of truth; everything else only mirrors it.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate encapsulates all database-specific logic behind the
//!   narrow `WatchlistStore` trait (list, insert, delete-by-code), so callers never see SQL.
//! - **Swappable Store:** `DbRepository` talks to PostgreSQL through a `PgPool`;
//!   `InMemoryWatchlistStore` provides the same semantics in-process for offline runs and
//!   tests.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: Applies the embedded migrations, creating the `watchlist` table.
//! - `open_store`: Builds the store selected by `StoreSettings::backend`.
//! - `WatchlistStore`: The store interface.
//! - `DbRepository` / `InMemoryWatchlistStore`: Its two implementations.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, open_store, run_migrations};
pub use error::DbError;
pub use memory::InMemoryWatchlistStore;
pub use repository::{DbRepository, WatchlistStore};
