use crate::error::AnalyticsError;
use crate::report::SummaryMetrics;
use core_types::{SalesDataset, SalesRecord};
use rust_decimal::Decimal;

/// A stateless calculator for the summary statistics of a filtered view.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating summary metrics.
    ///
    /// # Arguments
    ///
    /// * `filtered` - The filtered view, ascending by year.
    ///
    /// # Returns
    ///
    /// A `Result` containing the complete `SummaryMetrics`, or `EmptyRange` when the view has
    /// no rows, `DivisionByZero` when the first year's total sales are zero, or `Overflow` when
    /// a sum leaves the `Decimal` range.
    pub fn summarize(&self, filtered: &SalesDataset) -> Result<SummaryMetrics, AnalyticsError> {
        let (first, last) = match (filtered.first(), filtered.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(AnalyticsError::EmptyRange),
        };

        let count = Decimal::from(filtered.len());
        let sum_total_sales = checked_sum(filtered, SalesRecord::total_sales, "mean_total_sales")?;
        let total_profit = checked_sum(filtered, SalesRecord::profit, "total_profit")?;

        let metrics = SummaryMetrics {
            mean_total_sales: sum_total_sales / count,
            mean_profit: total_profit / count,
            peak_profit_year: self.peak_profit_year(filtered, first),
            growth_rate_pct: self.growth_rate_pct(first, last)?,
            years_covered: filtered.len(),
            total_profit,
        };

        tracing::debug!(
            years = metrics.years_covered,
            peak = metrics.peak_profit_year,
            growth = %metrics.growth_rate_pct,
            "Summarized filtered view."
        );
        Ok(metrics)
    }

    /// Year of the maximum profit. Only a strictly greater profit replaces the current best,
    /// so the earliest year wins a tie.
    fn peak_profit_year(&self, filtered: &SalesDataset, first: &SalesRecord) -> i32 {
        let mut best = first;
        for record in filtered.iter().skip(1) {
            if record.profit() > best.profit() {
                best = record;
            }
        }
        best.year()
    }

    fn growth_rate_pct(&self, first: &SalesRecord, last: &SalesRecord) -> Result<Decimal, AnalyticsError> {
        if first.total_sales().is_zero() {
            return Err(AnalyticsError::DivisionByZero("growth_rate_pct".to_string()));
        }
        let ratio = last
            .total_sales()
            .checked_div(first.total_sales())
            .ok_or_else(|| AnalyticsError::Overflow("growth_rate_pct".to_string()))?;
        ratio
            .checked_sub(Decimal::ONE)
            .and_then(|change| change.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| AnalyticsError::Overflow("growth_rate_pct".to_string()))
    }
}

fn checked_sum<F>(filtered: &SalesDataset, value: F, metric: &str) -> Result<Decimal, AnalyticsError>
where
    F: Fn(&SalesRecord) -> Decimal,
{
    filtered
        .iter()
        .try_fold(Decimal::ZERO, |acc, record| acc.checked_add(value(record)))
        .ok_or_else(|| AnalyticsError::Overflow(metric.to_string()))
}
