//! # Salesboard Analytics
//!
//! The filter-aggregate-present pipeline over the yearly sales dataset.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of data sources,
//!   the watchlist store or any presentation layer. It depends only on `core-types`.
//! - **Stateless Calculation:** every stage is a function of its inputs. The same raw rows
//!   always produce the same dataset, view, metrics and charts.
//!
//! ## Public API
//!
//! - `enrich`: derives `total_sales` and `profit` from the raw columns.
//! - `filter`: restricts a dataset to an inclusive `YearRange`.
//! - `AnalyticsEngine`: computes the `SummaryMetrics` of a filtered view.
//! - `trend_chart` / `sales_mix_chart`: chart-ready projections of a filtered view.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

pub mod calculator;
pub mod charts;
pub mod engine;
pub mod error;
pub mod filter;
pub mod report;

pub use calculator::{RawSales, enrich};
pub use charts::{ChartSeries, LineStyle, Marker, MixChart, MixRow, TrendChart, sales_mix_chart, trend_chart};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use filter::filter;
pub use report::{MetricTile, SummaryMetrics};
