use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Scalar summary statistics over a filtered view.
///
/// This struct is the output of the `AnalyticsEngine` and is only ever produced complete;
/// an empty view or an undefined growth rate is reported as an error instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub mean_total_sales: Decimal,
    pub mean_profit: Decimal,
    /// Year with the highest profit; the earliest one wins a tie.
    pub peak_profit_year: i32,
    /// `(last.total_sales / first.total_sales - 1) * 100`.
    pub growth_rate_pct: Decimal,

    pub years_covered: usize,
    pub total_profit: Decimal,
}

/// A single labelled figure ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricTile {
    pub label: String,
    pub value: String,
}

impl MetricTile {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

impl SummaryMetrics {
    /// The four key-metric tiles of the dashboard, formatted for display (amounts in 万元).
    pub fn tiles(&self) -> Vec<MetricTile> {
        vec![
            MetricTile::new(
                "平均总销售额",
                format!("{:.0} 万元", self.mean_total_sales.round_dp(0)),
            ),
            MetricTile::new("平均利润", format!("{:.0} 万元", self.mean_profit.round_dp(0))),
            MetricTile::new("利润最高年份", self.peak_profit_year.to_string()),
            MetricTile::new(
                "总销售额增长率",
                format!("{:.1}%", self.growth_rate_pct.round_dp(1)),
            ),
        ]
    }
}
