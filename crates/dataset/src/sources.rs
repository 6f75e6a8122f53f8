use crate::error::DatasetError;
use configuration::CsvSourceSettings;
use core_types::{RawSalesRow, SalesTable};
use polars::prelude::*;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;
use std::path::PathBuf;

/// Anything that can produce the raw sales table.
///
/// Implementations must fail rather than return an empty or partial table when the
/// underlying data cannot be read.
pub trait DataSource: Send + Sync {
    /// A short, human-readable name used in logs and error messages.
    fn name(&self) -> &str;

    fn fetch(&self) -> Result<SalesTable, DatasetError>;
}

/// The yearly figures compiled into the binary (amounts in 万元).
#[derive(Debug, Default, Clone)]
pub struct EmbeddedSource;

impl EmbeddedSource {
    pub fn new() -> Self {
        Self
    }
}

impl DataSource for EmbeddedSource {
    fn name(&self) -> &str {
        "embedded"
    }

    fn fetch(&self) -> Result<SalesTable, DatasetError> {
        Ok(vec![
            RawSalesRow::new(2018, dec!(1000), dec!(600), dec!(800)),
            RawSalesRow::new(2019, dec!(1500), dec!(900), dec!(1000)),
            RawSalesRow::new(2020, dec!(1300), dec!(1200), dec!(1100)),
            RawSalesRow::new(2021, dec!(1800), dec!(1100), dec!(1200)),
            RawSalesRow::new(2022, dec!(2200), dec!(1500), dec!(1400)),
            RawSalesRow::new(2023, dec!(2500), dec!(1900), dec!(1500)),
        ])
    }
}

/// A spreadsheet export read with polars.
///
/// `header_row` lines are skipped before the header; the year column is the row key. Metric
/// cells that cannot be read as numbers become `None` and are rejected later by the
/// derived-metrics calculator with the offending year.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    name: String,
    path: PathBuf,
    header_row: usize,
    index_column: String,
    product_a_column: String,
    product_b_column: String,
    cost_column: String,
}

impl CsvFileSource {
    pub fn new(settings: &CsvSourceSettings) -> Self {
        Self {
            name: settings.path.display().to_string(),
            path: settings.path.clone(),
            header_row: settings.header_row,
            index_column: settings.index_column.clone(),
            product_a_column: settings.product_a_column.clone(),
            product_b_column: settings.product_b_column.clone(),
            cost_column: settings.cost_column.clone(),
        }
    }

    fn read_frame(&self) -> PolarsResult<DataFrame> {
        CsvReader::from_path(&self.path)?
            .has_header(true)
            .with_skip_rows(self.header_row)
            .finish()
    }

    /// Years must be whole numbers; `2018.7` is rejected rather than truncated.
    fn years(&self, df: &DataFrame) -> Result<Vec<i32>, DatasetError> {
        let column = df
            .column(&self.index_column)
            .and_then(|s| s.cast(&DataType::Float64))
            .map_err(|e| DatasetError::unavailable(&self.name, e))?;
        let values = column
            .f64()
            .map_err(|e| DatasetError::unavailable(&self.name, e))?;

        values
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value
                    .filter(|y| y.fract() == 0.0 && *y >= f64::from(i32::MIN) && *y <= f64::from(i32::MAX))
                    .map(|y| y as i32)
                    .ok_or_else(|| {
                        DatasetError::unavailable(
                            &self.name,
                            format!("row {} has no usable '{}' value", row + 1, self.index_column),
                        )
                    })
            })
            .collect()
    }

    fn metric(&self, df: &DataFrame, name: &str) -> Result<Vec<Option<Decimal>>, DatasetError> {
        // Non-strict cast: unparsable cells become nulls instead of failing the whole column.
        let column = df
            .column(name)
            .and_then(|s| s.cast(&DataType::Float64))
            .map_err(|e| DatasetError::unavailable(&self.name, e))?;
        let values = column
            .f64()
            .map_err(|e| DatasetError::unavailable(&self.name, e))?;

        Ok(values
            .into_iter()
            .map(|v| v.and_then(Decimal::from_f64))
            .collect())
    }
}

impl DataSource for CsvFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<SalesTable, DatasetError> {
        let df = self
            .read_frame()
            .map_err(|e| DatasetError::unavailable(&self.name, e))?;
        tracing::debug!(source = %self.name, shape = ?df.shape(), "Read sales sheet.");
        if df.height() == 0 {
            return Err(DatasetError::unavailable(&self.name, "the sheet has no data rows"));
        }

        let years = self.years(&df)?;
        let product_a = self.metric(&df, &self.product_a_column)?;
        let product_b = self.metric(&df, &self.product_b_column)?;
        let cost = self.metric(&df, &self.cost_column)?;

        let rows = years
            .into_iter()
            .zip(product_a)
            .zip(product_b)
            .zip(cost)
            .map(|(((year, product_a_sales), product_b_sales), cost)| RawSalesRow {
                year,
                product_a_sales,
                product_b_sales,
                cost,
            })
            .collect();
        Ok(rows)
    }
}
