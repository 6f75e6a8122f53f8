use crate::DbError;
use crate::repository::WatchlistStore;
use async_trait::async_trait;
use chrono::Utc;
use core_types::WatchlistEntry;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    entries: Vec<WatchlistEntry>,
}

/// A process-local watchlist store with the same semantics as the `watchlist` table:
/// ids increase monotonically and codes are unique.
///
/// Failures can be switched on to exercise error paths, and every insert/delete attempt
/// is counted.
#[derive(Debug, Default)]
pub struct InMemoryWatchlistStore {
    state: Mutex<State>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_attempts: AtomicUsize,
}

impl InMemoryWatchlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store that already holds `codes`, in order.
    pub fn with_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        if let Ok(mut state) = store.state.lock() {
            for code in codes {
                push_entry(&mut state, code.into());
            }
        }
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of insert and delete calls received, including failed ones.
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, DbError> {
        self.state
            .lock()
            .map_err(|_| DbError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    fn begin_write(&self) -> Result<(), DbError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("writes are disabled".to_string()));
        }
        Ok(())
    }
}

fn push_entry(state: &mut State, code: String) -> WatchlistEntry {
    state.next_id += 1;
    let entry = WatchlistEntry {
        id: state.next_id,
        code,
        created_at: Utc::now(),
    };
    state.entries.push(entry.clone());
    entry
}

#[async_trait]
impl WatchlistStore for InMemoryWatchlistStore {
    async fn list_all(&self) -> Result<Vec<WatchlistEntry>, DbError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("reads are disabled".to_string()));
        }
        let mut entries = self.lock()?.entries.clone();
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }

    async fn insert(&self, code: &str) -> Result<WatchlistEntry, DbError> {
        self.begin_write()?;
        let mut state = self.lock()?;
        if state.entries.iter().any(|e| e.code == code) {
            return Err(DbError::DuplicateCode(code.to_string()));
        }
        Ok(push_entry(&mut state, code.to_string()))
    }

    async fn delete_by_code(&self, code: &str) -> Result<u64, DbError> {
        self.begin_write()?;
        let mut state = self.lock()?;
        let before = state.entries.len();
        state.entries.retain(|e| e.code != code);
        Ok((before - state.entries.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_increase_and_order_is_stable() {
        let store = InMemoryWatchlistStore::new();
        let a = store.insert("sh600519").await.unwrap();
        let b = store.insert("sz000001").await.unwrap();
        assert!(a.id < b.id);

        let codes: Vec<String> = store.list_all().await.unwrap().into_iter().map(|e| e.code).collect();
        assert_eq!(codes, vec!["sh600519", "sz000001"]);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = InMemoryWatchlistStore::with_codes(["sh600519"]);
        assert!(matches!(
            store.insert("sh600519").await,
            Err(DbError::DuplicateCode(code)) if code == "sh600519"
        ));
    }

    #[tokio::test]
    async fn delete_reports_rows_affected() {
        let store = InMemoryWatchlistStore::with_codes(["sh600519"]);
        assert_eq!(store.delete_by_code("sz000001").await.unwrap(), 0);
        assert_eq!(store.delete_by_code("sh600519").await.unwrap(), 1);
        assert!(store.list_all().await.unwrap().is_empty());
        assert_eq!(store.write_attempts(), 2);
    }

    #[tokio::test]
    async fn injected_failures_leave_state_untouched() {
        let store = InMemoryWatchlistStore::with_codes(["sh600519"]);
        store.set_fail_writes(true);
        assert!(store.delete_by_code("sh600519").await.is_err());
        assert!(store.insert("sz000001").await.is_err());
        store.set_fail_writes(false);
        assert_eq!(store.list_all().await.unwrap().len(), 1);

        store.set_fail_reads(true);
        assert!(store.list_all().await.is_err());
    }
}
