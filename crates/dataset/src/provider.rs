use crate::error::DatasetError;
use crate::sources::{CsvFileSource, DataSource, EmbeddedSource};
use configuration::DataSourceSettings;
use core_types::SalesTable;

/// Session-scoped cache in front of a [`DataSource`].
///
/// The first [`load`](Self::load) fetches from the source; later calls return the same
/// table without touching the source again. A new provider (a new session) always fetches.
pub struct DatasetProvider {
    source: Box<dyn DataSource>,
    cached: Option<SalesTable>,
}

impl DatasetProvider {
    pub fn new(source: Box<dyn DataSource>) -> Self {
        Self {
            source,
            cached: None,
        }
    }

    /// Builds the provider for the configured source.
    pub fn from_settings(settings: &DataSourceSettings) -> Self {
        let source: Box<dyn DataSource> = match settings {
            DataSourceSettings::Embedded => Box::new(EmbeddedSource::new()),
            DataSourceSettings::Csv(csv) => Box::new(CsvFileSource::new(csv)),
        };
        Self::new(source)
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Returns the cached table, fetching it on first use.
    ///
    /// A failed fetch caches nothing, so the next call tries again.
    pub fn load(&mut self) -> Result<&SalesTable, DatasetError> {
        let table = match self.cached.take() {
            Some(table) => {
                tracing::debug!(source = %self.source.name(), "Serving cached sales table.");
                table
            }
            None => self.fetch()?,
        };
        let table: &SalesTable = self.cached.insert(table);
        Ok(table)
    }

    /// Drops the cached table and fetches a fresh one, replacing it wholesale.
    ///
    /// On failure the previous table is kept.
    pub fn reload(&mut self) -> Result<&SalesTable, DatasetError> {
        let table = self.fetch()?;
        let table: &SalesTable = self.cached.insert(table);
        Ok(table)
    }

    fn fetch(&self) -> Result<SalesTable, DatasetError> {
        let table = self.source.fetch().inspect_err(|e| {
            tracing::error!(source = %self.source.name(), error = %e, "Failed to fetch sales table.");
        })?;
        tracing::info!(source = %self.source.name(), rows = table.len(), "Fetched sales table.");
        Ok(table)
    }
}

impl std::fmt::Debug for DatasetProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetProvider")
            .field("source", &self.source.name())
            .field("cached_rows", &self.cached.as_ref().map(Vec::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps the embedded data and counts fetches; fails while `failing` is set.
    struct CountingSource {
        fetches: Arc<AtomicUsize>,
        failing: bool,
    }

    impl DataSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        fn fetch(&self) -> Result<SalesTable, DatasetError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                return Err(DatasetError::unavailable("counting", "feed offline"));
            }
            EmbeddedSource::new().fetch()
        }
    }

    fn provider(failing: bool) -> (DatasetProvider, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            fetches: Arc::clone(&fetches),
            failing,
        };
        (DatasetProvider::new(Box::new(source)), fetches)
    }

    #[test]
    fn load_fetches_once_per_session() {
        let (mut provider, fetches) = provider(false);
        let first = provider.load().unwrap().clone();
        let second = provider.load().unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn new_session_fetches_again() {
        let fetches = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let source = CountingSource {
                fetches: Arc::clone(&fetches),
                failing: false,
            };
            DatasetProvider::new(Box::new(source)).load().unwrap();
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn reload_refetches() {
        let (mut provider, fetches) = provider(false);
        provider.load().unwrap();
        provider.reload().unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_fetch_is_not_cached() {
        let (mut provider, fetches) = provider(true);
        assert!(provider.load().is_err());
        assert!(provider.load().is_err());
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn from_settings_picks_embedded_by_default() {
        let mut provider = DatasetProvider::from_settings(&DataSourceSettings::default());
        assert_eq!(provider.source_name(), "embedded");
        assert_eq!(provider.load().unwrap().len(), 6);
    }
}
