use crate::error::AnalyticsError;
use core_types::{RawSalesRow, SalesDataset, SalesRecord};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Read access to the raw columns of a row.
///
/// Implemented for both raw rows and enriched records so that [`enrich`] can be applied to
/// its own output.
pub trait RawSales {
    fn year(&self) -> i32;
    fn product_a_sales(&self) -> Option<Decimal>;
    fn product_b_sales(&self) -> Option<Decimal>;
    fn cost(&self) -> Option<Decimal>;
}

impl RawSales for RawSalesRow {
    fn year(&self) -> i32 {
        self.year
    }
    fn product_a_sales(&self) -> Option<Decimal> {
        self.product_a_sales
    }
    fn product_b_sales(&self) -> Option<Decimal> {
        self.product_b_sales
    }
    fn cost(&self) -> Option<Decimal> {
        self.cost
    }
}

impl RawSales for SalesRecord {
    fn year(&self) -> i32 {
        SalesRecord::year(self)
    }
    fn product_a_sales(&self) -> Option<Decimal> {
        Some(SalesRecord::product_a_sales(self))
    }
    fn product_b_sales(&self) -> Option<Decimal> {
        Some(SalesRecord::product_b_sales(self))
    }
    fn cost(&self) -> Option<Decimal> {
        Some(SalesRecord::cost(self))
    }
}

/// Builds the canonical dataset from raw rows, deriving `total_sales` and `profit`.
///
/// Rows are re-ordered ascending by year. Derived columns are always recomputed from the raw
/// columns, so `enrich(enrich(rows).records())` yields the same dataset.
///
/// # Errors
///
/// `InvalidRecord` naming the year when a metric is missing, non-numeric or negative, when
/// the derived columns overflow, or when the same year appears twice.
pub fn enrich<R: RawSales>(rows: &[R]) -> Result<SalesDataset, AnalyticsError> {
    let mut by_year: BTreeMap<i32, SalesRecord> = BTreeMap::new();

    for row in rows {
        let year = row.year();
        let product_a = require(year, "product_a_sales", row.product_a_sales())?;
        let product_b = require(year, "product_b_sales", row.product_b_sales())?;
        let cost = require(year, "cost", row.cost())?;

        let record = SalesRecord::try_new(year, product_a, product_b, cost).map_err(|_| {
            AnalyticsError::InvalidRecord {
                year,
                reason: "value out of range".to_string(),
            }
        })?;
        if by_year.insert(year, record).is_some() {
            return Err(AnalyticsError::InvalidRecord {
                year,
                reason: "year appears more than once".to_string(),
            });
        }
    }

    let records: Vec<SalesRecord> = by_year.into_values().collect();
    tracing::debug!(rows = records.len(), "Enriched sales rows.");

    // The BTreeMap already guarantees unique, ascending years.
    SalesDataset::new(records).map_err(|e| AnalyticsError::InvalidRecord {
        year: 0,
        reason: e.to_string(),
    })
}

fn require(year: i32, column: &str, value: Option<Decimal>) -> Result<Decimal, AnalyticsError> {
    match value {
        None => Err(AnalyticsError::InvalidRecord {
            year,
            reason: format!("'{}' is missing or not numeric", column),
        }),
        Some(v) if v < Decimal::ZERO => Err(AnalyticsError::InvalidRecord {
            year,
            reason: format!("'{}' must not be negative, got {}", column, v),
        }),
        Some(v) => Ok(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw_rows() -> Vec<RawSalesRow> {
        vec![
            RawSalesRow::new(2019, dec!(1500), dec!(900), dec!(1000)),
            RawSalesRow::new(2018, dec!(1000), dec!(600), dec!(800)),
        ]
    }

    #[test]
    fn derives_total_sales_and_profit() {
        let dataset = enrich(&raw_rows()).unwrap();
        let first = dataset.first().unwrap();
        assert_eq!(first.year(), 2018);
        assert_eq!(first.total_sales(), dec!(1600));
        assert_eq!(first.profit(), dec!(800));
        assert_eq!(dataset.years(), vec![2018, 2019]);
    }

    #[test]
    fn enrich_is_idempotent() {
        let once = enrich(&raw_rows()).unwrap();
        let twice = enrich(once.records()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_metric_names_the_year() {
        let mut rows = raw_rows();
        rows[0].cost = None;
        let err = enrich(&rows).unwrap_err();
        match err {
            AnalyticsError::InvalidRecord { year, reason } => {
                assert_eq!(year, 2019);
                assert!(reason.contains("cost"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn negative_metric_is_rejected() {
        let rows = vec![RawSalesRow::new(2020, dec!(-1), dec!(10), dec!(5))];
        assert!(matches!(
            enrich(&rows),
            Err(AnalyticsError::InvalidRecord { year: 2020, .. })
        ));
    }

    #[test]
    fn duplicate_year_is_rejected() {
        let rows = vec![
            RawSalesRow::new(2020, dec!(1), dec!(1), dec!(1)),
            RawSalesRow::new(2020, dec!(2), dec!(2), dec!(2)),
        ];
        assert!(matches!(
            enrich(&rows),
            Err(AnalyticsError::InvalidRecord { year: 2020, .. })
        ));
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let half = Decimal::MAX / dec!(2) + dec!(1);
        let rows = vec![RawSalesRow::new(2020, half, half, dec!(0))];
        let err = enrich(&rows).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InvalidRecord {
                year: 2020,
                reason: "value out of range".to_string(),
            }
        );
    }

    #[test]
    fn profit_may_be_negative() {
        let rows = vec![RawSalesRow::new(2020, dec!(100), dec!(50), dec!(400))];
        let dataset = enrich(&rows).unwrap();
        assert_eq!(dataset.first().unwrap().profit(), dec!(-250));
    }
}
