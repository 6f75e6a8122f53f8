use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive range of years, as selected by the two-ended slider.
///
/// The fields are public so presentation layers can pass plain values through; code that
/// builds a range from user input should go through [`YearRange::new`], which rejects
/// `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self, CoreError> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// Checks the `start <= end` invariant.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.start > self.end {
            return Err(CoreError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    /// Restricts this range to `bounds`. A range lying completely outside collapses
    /// onto the nearest bound.
    pub fn clamp_to(&self, bounds: &YearRange) -> YearRange {
        let start = self.start.clamp(bounds.start, bounds.end);
        let end = self.end.clamp(bounds.start, bounds.end);
        YearRange { start, end }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_reversed_range() {
        assert_eq!(
            YearRange::new(2022, 2019),
            Err(CoreError::InvalidRange { start: 2022, end: 2019 })
        );
        assert!(YearRange::new(2020, 2020).is_ok());
    }

    #[test]
    fn contains_is_inclusive() {
        let range = YearRange::new(2019, 2021).unwrap();
        assert!(range.contains(2019));
        assert!(range.contains(2021));
        assert!(!range.contains(2018));
        assert!(!range.contains(2022));
    }

    #[test]
    fn clamp_keeps_range_inside_bounds() {
        let bounds = YearRange::new(2018, 2023).unwrap();
        let clamped = YearRange { start: 2010, end: 2030 }.clamp_to(&bounds);
        assert_eq!(clamped, bounds);

        let below = YearRange { start: 2000, end: 2005 }.clamp_to(&bounds);
        assert_eq!(below, YearRange { start: 2018, end: 2018 });
    }
}
