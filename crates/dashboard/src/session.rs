use crate::error::DashboardError;
use crate::view::{DashboardView, MetricsPanel};
use analytics::{AnalyticsEngine, AnalyticsError, enrich, filter, sales_mix_chart, trend_chart};
use configuration::DashboardSettings;
use core_types::{SalesDataset, YearRange};
use database::WatchlistStore;
use dataset::{DatasetError, DatasetProvider};
use events::{DashboardEvent, Notice};
use std::sync::Arc;
use watchlist::{Mutation, Watchlist};

/// One viewer's dashboard: the memoized dataset, the watchlist mirror and the control state.
pub struct DashboardSession {
    // --- Configuration ---
    settings: DashboardSettings,

    // --- Data ---
    provider: DatasetProvider,
    dataset: SalesDataset,
    watchlist: Watchlist,
    engine: AnalyticsEngine,

    // --- Controls ---
    bounds: YearRange,
    range: YearRange,
    show_profit: bool,
}

impl DashboardSession {
    /// Loads and enriches the sales table, seeds the watchlist mirror and positions the
    /// controls at their configured defaults.
    pub async fn start(
        settings: DashboardSettings,
        mut provider: DatasetProvider,
        store: Arc<dyn WatchlistStore>,
    ) -> Result<Self, DashboardError> {
        let dataset = load_dataset(&mut provider, false)?;
        let bounds = resolve_bounds(&settings, &dataset, provider.source_name())?;
        let range = settings.default_range(bounds).clamp_to(&bounds);
        let watchlist = Watchlist::load(store).await?;

        tracing::info!(
            source = %provider.source_name(),
            rows = dataset.len(),
            %bounds,
            %range,
            watchlist = watchlist.len(),
            "Dashboard session started."
        );

        Ok(Self {
            show_profit: settings.show_profit,
            settings,
            provider,
            dataset,
            watchlist,
            engine: AnalyticsEngine::new(),
            bounds,
            range,
        })
    }

    /// Applies one event and returns the freshly computed view.
    ///
    /// Only a failed reload is fatal; every other failure becomes a notice on the view.
    pub async fn handle(&mut self, event: DashboardEvent) -> Result<DashboardView, DashboardError> {
        tracing::debug!(?event, "Handling dashboard event.");
        let mut notices = Vec::new();

        match event {
            DashboardEvent::SetRange(requested) => {
                self.range = requested.clamp_to(&self.bounds);
                if self.range != requested {
                    notices.push(Notice::info(format!(
                        "Range {requested} clamped to {} within {}.",
                        self.range, self.bounds
                    )));
                }
            }
            DashboardEvent::ToggleProfit(show) => self.show_profit = show,
            DashboardEvent::AddCode(code) => match self.watchlist.add(&code).await {
                Ok(Mutation::Added) => notices.push(Notice::info(format!("Added {} to the watchlist.", code.trim()))),
                Ok(_) => notices.push(Notice::info(format!(
                    "'{}' is empty or already on the watchlist.",
                    code.trim()
                ))),
                Err(e) => notices.push(Notice::error(e.to_string())),
            },
            DashboardEvent::RemoveCode(code) => match self.watchlist.remove(&code).await {
                Ok(Mutation::Removed) => {
                    notices.push(Notice::info(format!("Removed {} from the watchlist.", code.trim())))
                }
                Ok(_) => notices.push(Notice::info(format!("'{}' is not on the watchlist.", code.trim()))),
                Err(e) => notices.push(Notice::error(e.to_string())),
            },
            DashboardEvent::Reload => self.reload(&mut notices)?,
            DashboardEvent::Refresh => {
                if let Err(e) = self.watchlist.refresh().await {
                    notices.push(Notice::error(e.to_string()));
                }
            }
        }

        Ok(self.render(notices))
    }

    /// The view for the current state, without applying any event.
    pub fn view(&self) -> DashboardView {
        self.render(Vec::new())
    }

    pub fn range(&self) -> YearRange {
        self.range
    }

    pub fn bounds(&self) -> YearRange {
        self.bounds
    }

    pub fn show_profit(&self) -> bool {
        self.show_profit
    }

    pub fn dataset(&self) -> &SalesDataset {
        &self.dataset
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    /// Replaces the dataset wholesale. On failure the session keeps its previous dataset.
    fn reload(&mut self, notices: &mut Vec<Notice>) -> Result<(), DashboardError> {
        let dataset = load_dataset(&mut self.provider, true)?;
        let bounds = resolve_bounds(&self.settings, &dataset, self.provider.source_name())?;

        self.dataset = dataset;
        self.bounds = bounds;
        self.range = self.range.clamp_to(&bounds);
        notices.push(Notice::info(format!(
            "Reloaded {} rows from {}.",
            self.dataset.len(),
            self.provider.source_name()
        )));
        Ok(())
    }

    /// One pipeline pass: filter → aggregate → chart projections.
    fn render(&self, mut notices: Vec<Notice>) -> DashboardView {
        let (rows, metrics, trend, mix) = match filter(&self.dataset, self.range) {
            Ok(view) if view.is_empty() => {
                let reason = "No data in the selected range.".to_string();
                notices.push(Notice::warn(reason.clone()));
                (Vec::new(), MetricsPanel::Unavailable { reason }, None, None)
            }
            Ok(view) => {
                let metrics = match self.engine.summarize(&view) {
                    Ok(metrics) => MetricsPanel::Ready {
                        tiles: metrics.tiles(),
                        metrics,
                    },
                    Err(e) => {
                        let reason = explain(&e);
                        tracing::warn!(range = %self.range, error = %e, "Summary metrics withheld.");
                        notices.push(Notice::warn(reason.clone()));
                        MetricsPanel::Unavailable { reason }
                    }
                };
                let trend = trend_chart(&view, self.show_profit);
                let mix = sales_mix_chart(&view);
                (view.records().to_vec(), metrics, Some(trend), Some(mix))
            }
            Err(e) => {
                let reason = explain(&e);
                tracing::warn!(range = %self.range, error = %e, "Range rejected.");
                notices.push(Notice::warn(reason.clone()));
                (Vec::new(), MetricsPanel::Unavailable { reason }, None, None)
            }
        };

        DashboardView {
            title: self.settings.title.clone(),
            bounds: self.bounds,
            range: self.range,
            show_profit: self.show_profit,
            rows,
            metrics,
            trend_chart: trend,
            mix_chart: mix,
            watchlist: self.watchlist.entries().to_vec(),
            notices,
        }
    }
}

impl std::fmt::Debug for DashboardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardSession")
            .field("provider", &self.provider)
            .field("rows", &self.dataset.len())
            .field("bounds", &self.bounds)
            .field("range", &self.range)
            .field("show_profit", &self.show_profit)
            .field("watchlist", &self.watchlist)
            .finish()
    }
}

fn load_dataset(provider: &mut DatasetProvider, fresh: bool) -> Result<SalesDataset, DashboardError> {
    let table = if fresh { provider.reload()? } else { provider.load()? };
    let dataset = enrich(table).inspect_err(|e| {
        tracing::error!(error = %e, "Sales table failed validation.");
    })?;
    Ok(dataset)
}

/// A dataset without any year has no slider domain, which makes it as unusable as a
/// failed fetch.
fn resolve_bounds(
    settings: &DashboardSettings,
    dataset: &SalesDataset,
    source_name: &str,
) -> Result<YearRange, DashboardError> {
    let domain = dataset
        .year_domain()
        .ok_or_else(|| DatasetError::unavailable(source_name, "the sales table has no rows"))?;
    Ok(settings.bounds(domain))
}

fn explain(error: &AnalyticsError) -> String {
    match error {
        AnalyticsError::InvalidRange { start, end } => {
            format!("Start year {start} is after end year {end}; pick a valid range.")
        }
        AnalyticsError::EmptyRange => "No data in the selected range.".to_string(),
        AnalyticsError::DivisionByZero(metric) => {
            format!("{metric} is undefined because the first year's total sales are zero.")
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{RawSalesRow, SalesTable};
    use database::InMemoryWatchlistStore;
    use dataset::{DataSource, EmbeddedSource};
    use events::NoticeLevel;
    use rust_decimal_macros::dec;

    struct FixedSource(SalesTable);

    impl DataSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(&self) -> Result<SalesTable, DatasetError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSource;

    impl DataSource for BrokenSource {
        fn name(&self) -> &str {
            "broken"
        }

        fn fetch(&self) -> Result<SalesTable, DatasetError> {
            Err(DatasetError::unavailable("broken", "connection refused"))
        }
    }

    async fn embedded_session(store: Arc<InMemoryWatchlistStore>) -> DashboardSession {
        DashboardSession::start(
            DashboardSettings::default(),
            DatasetProvider::new(Box::new(EmbeddedSource::new())),
            store,
        )
        .await
        .unwrap()
    }

    fn has_notice(view: &DashboardView, level: NoticeLevel) -> bool {
        view.notices.iter().any(|n| n.level == level)
    }

    #[tokio::test]
    async fn initial_view_covers_the_whole_dataset() {
        let session = embedded_session(Arc::new(InMemoryWatchlistStore::new())).await;
        let view = session.view();

        assert_eq!(view.bounds, YearRange { start: 2018, end: 2023 });
        assert_eq!(view.range, view.bounds);
        assert_eq!(view.rows.len(), 6);
        assert!(view.show_profit);
        let metrics = view.metrics.metrics().unwrap();
        assert_eq!(metrics.growth_rate_pct, dec!(175));
        assert_eq!(metrics.peak_profit_year, 2023);
        assert!(view.trend_chart.is_some());
        assert!(view.notices.is_empty());
    }

    #[tokio::test]
    async fn set_range_filters_rows_and_metrics() {
        let mut session = embedded_session(Arc::new(InMemoryWatchlistStore::new())).await;
        let view = session
            .handle(DashboardEvent::SetRange(YearRange { start: 2019, end: 2021 }))
            .await
            .unwrap();

        let years: Vec<i32> = view.rows.iter().map(|r| r.year()).collect();
        assert_eq!(years, vec![2019, 2020, 2021]);
        assert_eq!(view.metrics.metrics().unwrap().years_covered, 3);
        assert_eq!(view.mix_chart.unwrap().rows.len(), 3);
    }

    #[tokio::test]
    async fn reversed_range_withholds_metrics_and_charts() {
        let mut session = embedded_session(Arc::new(InMemoryWatchlistStore::new())).await;
        let view = session
            .handle(DashboardEvent::SetRange(YearRange { start: 2022, end: 2019 }))
            .await
            .unwrap();

        assert!(matches!(view.metrics, MetricsPanel::Unavailable { .. }));
        assert!(view.rows.is_empty());
        assert!(view.trend_chart.is_none());
        assert!(view.mix_chart.is_none());
        assert!(has_notice(&view, NoticeLevel::Warn));

        // The session keeps working after the bad range.
        let view = session
            .handle(DashboardEvent::SetRange(YearRange { start: 2019, end: 2022 }))
            .await
            .unwrap();
        assert!(view.metrics.metrics().is_some());
    }

    #[tokio::test]
    async fn out_of_bounds_range_is_clamped() {
        let mut session = embedded_session(Arc::new(InMemoryWatchlistStore::new())).await;
        let view = session
            .handle(DashboardEvent::SetRange(YearRange { start: 2000, end: 2021 }))
            .await
            .unwrap();

        assert_eq!(view.range, YearRange { start: 2018, end: 2021 });
        assert_eq!(view.rows.len(), 4);
        assert!(has_notice(&view, NoticeLevel::Info));
    }

    #[tokio::test]
    async fn toggling_profit_only_changes_the_trend_series() {
        let mut session = embedded_session(Arc::new(InMemoryWatchlistStore::new())).await;
        let before = session.view();
        let after = session.handle(DashboardEvent::ToggleProfit(false)).await.unwrap();

        assert_eq!(before.trend_chart.unwrap().series.len(), 3);
        assert_eq!(after.trend_chart.unwrap().series.len(), 2);
        assert_eq!(before.metrics, after.metrics);
        assert_eq!(before.rows, after.rows);
    }

    #[tokio::test]
    async fn watchlist_events_update_the_view() {
        let store = Arc::new(InMemoryWatchlistStore::with_codes(["sz000001"]));
        let mut session = embedded_session(Arc::clone(&store)).await;

        let view = session.handle(DashboardEvent::AddCode("sh600519".into())).await.unwrap();
        let codes: Vec<&str> = view.watchlist.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["sz000001", "sh600519"]);

        let view = session.handle(DashboardEvent::RemoveCode("sz000001".into())).await.unwrap();
        let codes: Vec<&str> = view.watchlist.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["sh600519"]);
    }

    #[tokio::test]
    async fn failed_write_is_a_notice_not_an_error() {
        let store = Arc::new(InMemoryWatchlistStore::new());
        let mut session = embedded_session(Arc::clone(&store)).await;
        store.set_fail_writes(true);

        let view = session.handle(DashboardEvent::AddCode("sh600519".into())).await.unwrap();
        assert!(view.watchlist.is_empty());
        assert!(has_notice(&view, NoticeLevel::Error));
        assert!(view.metrics.metrics().is_some());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_mirror() {
        let store = Arc::new(InMemoryWatchlistStore::with_codes(["sh600519"]));
        let mut session = embedded_session(Arc::clone(&store)).await;
        store.set_fail_reads(true);

        let view = session.handle(DashboardEvent::Refresh).await.unwrap();
        assert_eq!(view.watchlist.len(), 1);
        assert!(has_notice(&view, NoticeLevel::Error));
    }

    #[tokio::test]
    async fn start_fails_when_data_is_unavailable() {
        let result = DashboardSession::start(
            DashboardSettings::default(),
            DatasetProvider::new(Box::new(BrokenSource)),
            Arc::new(InMemoryWatchlistStore::new()),
        )
        .await;
        assert!(matches!(result, Err(DashboardError::Dataset(_))));
    }

    #[tokio::test]
    async fn start_fails_on_an_empty_table() {
        let result = DashboardSession::start(
            DashboardSettings::default(),
            DatasetProvider::new(Box::new(FixedSource(Vec::new()))),
            Arc::new(InMemoryWatchlistStore::new()),
        )
        .await;
        assert!(matches!(
            result,
            Err(DashboardError::Dataset(DatasetError::DataUnavailable { .. }))
        ));
    }

    #[tokio::test]
    async fn start_fails_on_invalid_records() {
        let mut row = RawSalesRow::new(2018, dec!(1000), dec!(600), dec!(800));
        row.cost = None;
        let result = DashboardSession::start(
            DashboardSettings::default(),
            DatasetProvider::new(Box::new(FixedSource(vec![row]))),
            Arc::new(InMemoryWatchlistStore::new()),
        )
        .await;
        assert!(matches!(
            result,
            Err(DashboardError::Analytics(AnalyticsError::InvalidRecord { year: 2018, .. }))
        ));
    }

    #[tokio::test]
    async fn start_fails_when_the_store_is_unreachable() {
        let store = Arc::new(InMemoryWatchlistStore::new());
        store.set_fail_reads(true);
        let result = DashboardSession::start(
            DashboardSettings::default(),
            DatasetProvider::new(Box::new(EmbeddedSource::new())),
            store,
        )
        .await;
        assert!(matches!(result, Err(DashboardError::Watchlist(_))));
    }

    #[tokio::test]
    async fn zero_base_year_withholds_only_the_metrics() {
        let table = vec![
            RawSalesRow::new(2018, dec!(0), dec!(0), dec!(100)),
            RawSalesRow::new(2019, dec!(500), dec!(500), dec!(400)),
        ];
        let session = DashboardSession::start(
            DashboardSettings::default(),
            DatasetProvider::new(Box::new(FixedSource(table))),
            Arc::new(InMemoryWatchlistStore::new()),
        )
        .await
        .unwrap();

        let view = session.view();
        assert!(matches!(view.metrics, MetricsPanel::Unavailable { .. }));
        assert_eq!(view.rows.len(), 2);
        assert!(view.trend_chart.is_some());
        assert!(has_notice(&view, NoticeLevel::Warn));
    }

    #[tokio::test]
    async fn configured_defaults_position_the_controls() {
        let settings = DashboardSettings {
            default_start: Some(2020),
            show_profit: false,
            ..DashboardSettings::default()
        };
        let session = DashboardSession::start(
            settings,
            DatasetProvider::new(Box::new(EmbeddedSource::new())),
            Arc::new(InMemoryWatchlistStore::new()),
        )
        .await
        .unwrap();

        assert_eq!(session.range(), YearRange { start: 2020, end: 2023 });
        assert!(!session.show_profit());
    }

    #[tokio::test]
    async fn reload_replaces_the_dataset() {
        let mut session = embedded_session(Arc::new(InMemoryWatchlistStore::new())).await;
        let view = session.handle(DashboardEvent::Reload).await.unwrap();
        assert_eq!(view.rows.len(), 6);
        assert_eq!(session.dataset().len(), 6);
    }
}
