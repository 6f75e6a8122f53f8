use crate::error::CoreError;
use crate::range::YearRange;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row exactly as the data source delivered it.
///
/// A metric is `None` when the source cell was empty or could not be read as a number.
/// Rows in this form have not been checked yet; the derived-metrics calculator is the
/// only place that turns them into [`SalesRecord`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSalesRow {
    pub year: i32,
    pub product_a_sales: Option<Decimal>,
    pub product_b_sales: Option<Decimal>,
    pub cost: Option<Decimal>,
}

impl RawSalesRow {
    pub fn new(year: i32, product_a_sales: Decimal, product_b_sales: Decimal, cost: Decimal) -> Self {
        Self {
            year,
            product_a_sales: Some(product_a_sales),
            product_b_sales: Some(product_b_sales),
            cost: Some(cost),
        }
    }
}

/// The raw table produced by a data source, in source order.
pub type SalesTable = Vec<RawSalesRow>;

/// A validated yearly row carrying its derived columns.
///
/// Fields are private: `total_sales` and `profit` are computed in [`SalesRecord::new`] and
/// there is no way to set them independently of the raw figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesRecord {
    year: i32,
    product_a_sales: Decimal,
    product_b_sales: Decimal,
    cost: Decimal,
    total_sales: Decimal,
    profit: Decimal,
}

impl SalesRecord {
    /// # Panics
    ///
    /// When the derived columns overflow `Decimal`. Use [`SalesRecord::try_new`] for figures
    /// read from outside the program.
    pub fn new(year: i32, product_a_sales: Decimal, product_b_sales: Decimal, cost: Decimal) -> Self {
        let total_sales = product_a_sales + product_b_sales;
        Self {
            year,
            product_a_sales,
            product_b_sales,
            cost,
            total_sales,
            profit: total_sales - cost,
        }
    }

    /// Like [`SalesRecord::new`], but reports an overflowing `total_sales` or `profit` as
    /// `InvalidInput` instead of panicking.
    pub fn try_new(
        year: i32,
        product_a_sales: Decimal,
        product_b_sales: Decimal,
        cost: Decimal,
    ) -> Result<Self, CoreError> {
        let out_of_range = |column: &str| {
            CoreError::InvalidInput(column.to_string(), format!("value out of range in {year}"))
        };
        let total_sales = product_a_sales
            .checked_add(product_b_sales)
            .ok_or_else(|| out_of_range("total_sales"))?;
        let profit = total_sales
            .checked_sub(cost)
            .ok_or_else(|| out_of_range("profit"))?;
        Ok(Self {
            year,
            product_a_sales,
            product_b_sales,
            cost,
            total_sales,
            profit,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn product_a_sales(&self) -> Decimal {
        self.product_a_sales
    }

    pub fn product_b_sales(&self) -> Decimal {
        self.product_b_sales
    }

    pub fn cost(&self) -> Decimal {
        self.cost
    }

    pub fn total_sales(&self) -> Decimal {
        self.total_sales
    }

    pub fn profit(&self) -> Decimal {
        self.profit
    }
}

impl From<&SalesRecord> for RawSalesRow {
    fn from(record: &SalesRecord) -> Self {
        RawSalesRow::new(
            record.year,
            record.product_a_sales,
            record.product_b_sales,
            record.cost,
        )
    }
}

/// An ordered sequence of [`SalesRecord`]s, unique by year and sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SalesDataset {
    records: Vec<SalesRecord>,
}

impl SalesDataset {
    /// Builds a dataset, enforcing strictly ascending years.
    pub fn new(records: Vec<SalesRecord>) -> Result<Self, CoreError> {
        if let Some(pair) = records.windows(2).find(|w| w[0].year >= w[1].year) {
            return Err(CoreError::InvalidInput(
                "dataset".to_string(),
                format!(
                    "years must be unique and ascending, found {} followed by {}",
                    pair[0].year, pair[1].year
                ),
            ));
        }
        Ok(Self { records })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&SalesRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&SalesRecord> {
        self.records.last()
    }

    pub fn years(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    /// The smallest range covering every year in the dataset, `None` when empty.
    pub fn year_domain(&self) -> Option<YearRange> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some(YearRange {
                start: first.year,
                end: last.year,
            }),
            _ => None,
        }
    }
}

impl<'a> IntoIterator for &'a SalesDataset {
    type Item = &'a SalesRecord;
    type IntoIter = std::slice::Iter<'a, SalesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn record_derives_total_and_profit() {
        let record = SalesRecord::new(2018, dec!(1000), dec!(600), dec!(800));
        assert_eq!(record.total_sales(), dec!(1600));
        assert_eq!(record.profit(), dec!(800));
    }

    #[test]
    fn try_new_reports_overflow() {
        let half = Decimal::MAX / dec!(2) + dec!(1);
        assert!(matches!(
            SalesRecord::try_new(2020, half, half, dec!(0)),
            Err(CoreError::InvalidInput(column, _)) if column == "total_sales"
        ));
        assert_eq!(
            SalesRecord::try_new(2018, dec!(1000), dec!(600), dec!(800)).unwrap(),
            SalesRecord::new(2018, dec!(1000), dec!(600), dec!(800))
        );
    }

    #[test]
    fn dataset_rejects_unsorted_or_duplicate_years() {
        let a = SalesRecord::new(2019, dec!(1), dec!(1), dec!(1));
        let b = SalesRecord::new(2018, dec!(1), dec!(1), dec!(1));
        assert!(SalesDataset::new(vec![a.clone(), b]).is_err());
        assert!(SalesDataset::new(vec![a.clone(), a]).is_err());
    }

    #[test]
    fn year_domain_spans_first_and_last() {
        let dataset = SalesDataset::new(vec![
            SalesRecord::new(2018, dec!(1), dec!(1), dec!(1)),
            SalesRecord::new(2021, dec!(1), dec!(1), dec!(1)),
        ])
        .unwrap();
        assert_eq!(dataset.year_domain(), Some(YearRange { start: 2018, end: 2021 }));
        assert_eq!(SalesDataset::empty().year_domain(), None);
    }
}
