//! Chart-ready projections of a filtered view.
//!
//! Presentation layers draw these as they see fit (terminal tables, JSON for a browser
//! chart). Nothing here knows about rendering.

use core_types::{SalesDataset, SalesRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// One line of the trend chart; `values[i]` belongs to `TrendChart::years[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub marker: Marker,
    pub line_style: LineStyle,
    pub values: Vec<Decimal>,
}

/// Product sales (and optionally profit) per year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub years: Vec<i32>,
    pub series: Vec<ChartSeries>,
}

/// One bar group of the sales mix chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixRow {
    pub year: i32,
    pub product_a_sales: Decimal,
    pub product_b_sales: Decimal,
}

/// Per-year product A / product B sales, indexed by year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixChart {
    pub title: String,
    pub rows: Vec<MixRow>,
}

fn series<F>(label: &str, marker: Marker, line_style: LineStyle, view: &SalesDataset, value: F) -> ChartSeries
where
    F: Fn(&SalesRecord) -> Decimal,
{
    ChartSeries {
        label: label.to_string(),
        marker,
        line_style,
        values: view.iter().map(value).collect(),
    }
}

/// Builds the sales trend chart. The dashed profit line is only included when
/// `show_profit` is set.
pub fn trend_chart(view: &SalesDataset, show_profit: bool) -> TrendChart {
    let mut lines = vec![
        series("产品A", Marker::Circle, LineStyle::Solid, view, SalesRecord::product_a_sales),
        series("产品B", Marker::Square, LineStyle::Solid, view, SalesRecord::product_b_sales),
    ];
    if show_profit {
        lines.push(series("利润", Marker::Triangle, LineStyle::Dashed, view, SalesRecord::profit));
    }

    TrendChart {
        title: "产品销售额与利润趋势".to_string(),
        x_label: "年份".to_string(),
        y_label: "金额 (万元)".to_string(),
        years: view.years(),
        series: lines,
    }
}

pub fn sales_mix_chart(view: &SalesDataset) -> MixChart {
    MixChart {
        title: "年度销售额占比".to_string(),
        rows: view
            .iter()
            .map(|r| MixRow {
                year: r.year(),
                product_a_sales: r.product_a_sales(),
                product_b_sales: r.product_b_sales(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn view() -> SalesDataset {
        SalesDataset::new(vec![
            SalesRecord::new(2022, dec!(2200), dec!(1500), dec!(1400)),
            SalesRecord::new(2023, dec!(2500), dec!(1900), dec!(1500)),
        ])
        .unwrap()
    }

    #[test]
    fn trend_chart_hides_profit_when_toggled_off() {
        let with_profit = trend_chart(&view(), true);
        assert_eq!(with_profit.series.len(), 3);
        assert_eq!(with_profit.series[2].label, "利润");
        assert_eq!(with_profit.series[2].line_style, LineStyle::Dashed);
        assert_eq!(with_profit.series[2].values, vec![dec!(2300), dec!(2900)]);

        let without = trend_chart(&view(), false);
        assert_eq!(without.series.len(), 2);
        assert_eq!(without.years, vec![2022, 2023]);
    }

    #[test]
    fn mix_chart_keeps_year_order() {
        let chart = sales_mix_chart(&view());
        assert_eq!(chart.rows.len(), 2);
        assert_eq!(chart.rows[0].year, 2022);
        assert_eq!(chart.rows[1].product_b_sales, dec!(1900));
    }

    #[test]
    fn empty_view_yields_empty_charts() {
        let chart = trend_chart(&SalesDataset::empty(), true);
        assert!(chart.years.is_empty());
        assert!(chart.series.iter().all(|s| s.values.is_empty()));
        assert!(sales_mix_chart(&SalesDataset::empty()).rows.is_empty());
    }
}
