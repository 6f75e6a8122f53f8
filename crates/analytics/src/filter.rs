use crate::error::AnalyticsError;
use core_types::{SalesDataset, YearRange};

/// Restricts `dataset` to the rows whose year lies in `range` (inclusive), preserving order.
///
/// An empty result is a valid view, not an error.
pub fn filter(dataset: &SalesDataset, range: YearRange) -> Result<SalesDataset, AnalyticsError> {
    if range.start > range.end {
        return Err(AnalyticsError::InvalidRange {
            start: range.start,
            end: range.end,
        });
    }

    let records = dataset
        .iter()
        .filter(|r| range.contains(r.year()))
        .cloned()
        .collect();

    // A sub-sequence of an ordered dataset is still ordered.
    SalesDataset::new(records).map_err(|_| AnalyticsError::InvalidRange {
        start: range.start,
        end: range.end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::SalesRecord;
    use rust_decimal::Decimal;

    fn dataset(years: &[i32]) -> SalesDataset {
        let records = years
            .iter()
            .map(|&y| SalesRecord::new(y, Decimal::from(y), Decimal::ONE, Decimal::ONE))
            .collect();
        SalesDataset::new(records).unwrap()
    }

    #[test]
    fn keeps_exactly_the_inclusive_range_in_order() {
        let full = dataset(&[2018, 2019, 2020, 2021, 2022, 2023]);
        for start in 2016..=2025 {
            for end in start..=2025 {
                let view = filter(&full, YearRange { start, end }).unwrap();
                let expected: Vec<i32> = (2018..=2023).filter(|y| *y >= start && *y <= end).collect();
                assert_eq!(view.years(), expected, "range {start}-{end}");
            }
        }
    }

    #[test]
    fn no_match_is_an_empty_view() {
        let full = dataset(&[2018, 2019]);
        let view = filter(&full, YearRange { start: 2030, end: 2031 }).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn reversed_range_is_rejected() {
        let full = dataset(&[2018, 2019]);
        assert_eq!(
            filter(&full, YearRange { start: 2019, end: 2018 }),
            Err(AnalyticsError::InvalidRange { start: 2019, end: 2018 })
        );
    }
}
