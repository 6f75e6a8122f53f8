use analytics::{MetricTile, MixChart, SummaryMetrics, TrendChart};
use core_types::{SalesRecord, WatchlistEntry, YearRange};
use events::Notice;
use serde::Serialize;

/// The key-metrics panel: either complete metrics or the reason they are withheld.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MetricsPanel {
    Ready {
        metrics: SummaryMetrics,
        tiles: Vec<MetricTile>,
    },
    Unavailable {
        reason: String,
    },
}

impl MetricsPanel {
    pub fn metrics(&self) -> Option<&SummaryMetrics> {
        match self {
            MetricsPanel::Ready { metrics, .. } => Some(metrics),
            MetricsPanel::Unavailable { .. } => None,
        }
    }
}

/// Everything a presentation layer needs to draw one frame of the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub title: String,
    /// Slider bounds.
    pub bounds: YearRange,
    pub range: YearRange,
    pub show_profit: bool,
    /// The filtered rows, ascending by year.
    pub rows: Vec<SalesRecord>,
    pub metrics: MetricsPanel,
    /// Withheld (`None`) when the range is invalid or selects no rows.
    pub trend_chart: Option<TrendChart>,
    pub mix_chart: Option<MixChart>,
    pub watchlist: Vec<WatchlistEntry>,
    pub notices: Vec<Notice>,
}
