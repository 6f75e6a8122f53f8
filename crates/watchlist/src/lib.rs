//! # Salesboard Watchlist
//!
//! A cached mirror of the remote watchlist. The store is the source of truth: the mirror is
//! seeded from it once per session and only changes after the store has accepted a write.

use core_types::WatchlistEntry;
use database::WatchlistStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod error;

pub use error::WatchlistError;

/// What a call to [`Watchlist::add`] or [`Watchlist::remove`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    Added,
    Removed,
    /// Nothing to do: empty code, already present on add, or absent on remove.
    /// The store was not contacted.
    Unchanged,
}

/// The watchlist adapter: store handle plus in-process mirror, ordered by store id.
pub struct Watchlist {
    store: Arc<dyn WatchlistStore>,
    entries: Vec<WatchlistEntry>,
}

impl Watchlist {
    /// Seeds the mirror from the store.
    pub async fn load(store: Arc<dyn WatchlistStore>) -> Result<Self, WatchlistError> {
        let mut watchlist = Self {
            store,
            entries: Vec::new(),
        };
        watchlist.refresh().await?;
        Ok(watchlist)
    }

    /// Fetches every entry from the store, ordered by id ascending. The mirror is not
    /// touched.
    pub async fn list_all(&self) -> Result<Vec<WatchlistEntry>, WatchlistError> {
        let mut entries = self
            .store
            .list_all()
            .await
            .map_err(WatchlistError::StoreRead)?;
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }

    /// Replaces the mirror with the store's current contents. On failure the mirror is kept.
    pub async fn refresh(&mut self) -> Result<(), WatchlistError> {
        let entries = self.list_all().await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to load the watchlist.");
        })?;
        tracing::info!(count = entries.len(), "Watchlist mirror seeded from the store.");
        self.entries = entries;
        Ok(())
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn codes(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.code.clone()).collect()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.iter().any(|e| e.code == code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds `code` (surrounding whitespace ignored).
    ///
    /// An empty or already mirrored code is a no-op and no write is sent. Otherwise the code
    /// is written to the store first and appended to the mirror only once the write succeeded.
    pub async fn add(&mut self, code: &str) -> Result<Mutation, WatchlistError> {
        let code = code.trim();
        if code.is_empty() || self.contains(code) {
            tracing::debug!(code, "Skipping add: empty or already on the watchlist.");
            return Ok(Mutation::Unchanged);
        }

        let entry = self
            .store
            .insert(code)
            .await
            .map_err(|source| {
                tracing::warn!(code, error = %source, "Watchlist insert failed.");
                WatchlistError::StoreWrite {
                    code: code.to_string(),
                    source,
                }
            })?;

        tracing::info!(code = %entry.code, id = entry.id, "Added to watchlist.");
        // Store ids only grow, so a push keeps the mirror ordered by id.
        self.entries.push(entry);
        Ok(Mutation::Added)
    }

    /// Removes `code` (surrounding whitespace ignored, otherwise exact match).
    ///
    /// A code missing from the mirror is a no-op and the store is not contacted. Otherwise
    /// the store delete runs first; zero rows affected still counts as success.
    pub async fn remove(&mut self, code: &str) -> Result<Mutation, WatchlistError> {
        let code = code.trim();
        if !self.contains(code) {
            tracing::debug!(code, "Skipping remove: not on the watchlist.");
            return Ok(Mutation::Unchanged);
        }

        let affected = self
            .store
            .delete_by_code(code)
            .await
            .map_err(|source| {
                tracing::warn!(code, error = %source, "Watchlist delete failed.");
                WatchlistError::StoreWrite {
                    code: code.to_string(),
                    source,
                }
            })?;

        tracing::info!(code, affected, "Removed from watchlist.");
        self.entries.retain(|e| e.code != code);
        Ok(Mutation::Removed)
    }
}

impl std::fmt::Debug for Watchlist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watchlist").field("entries", &self.entries).finish()
    }
}
