//! Calendar month keys and per-account period state.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use iafa_shared::{AppError, AppResult};

/// A calendar month for a given account: the unit of closure.
///
/// Ordered chronologically: `(year, month)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
}

impl MonthKey {
    /// Creates a month key, validating the month number.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `month` is outside 1-12.
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    /// The month containing the given date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following calendar month.
    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding calendar month.
    #[must_use]
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// First calendar day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        // month is validated to 1-12 at construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    /// Returns true if the given date falls within this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The closure-relevant state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodState {
    /// Last day of the most recently closed period, if any.
    pub last_closed_date: Option<NaiveDate>,
    /// The explicitly designated open period, if any. Invariant: at most one.
    pub open: Option<MonthKey>,
}

impl PeriodState {
    /// State of a freshly configured account: nothing closed, nothing open.
    pub const NEW: Self = Self {
        last_closed_date: None,
        open: None,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_key_rejects_bad_month() {
        assert!(MonthKey::new(2024, 0).is_err());
        assert!(MonthKey::new(2024, 13).is_err());
        assert!(MonthKey::new(2024, 12).is_ok());
    }

    #[test]
    fn test_next_and_prev_roll_over_years() {
        let dec = MonthKey::new(2024, 12).unwrap();
        assert_eq!(dec.next(), MonthKey::new(2025, 1).unwrap());
        assert_eq!(dec.next().prev(), dec);
    }

    #[test]
    fn test_last_day_handles_leap_february() {
        assert_eq!(
            MonthKey::new(2024, 2).unwrap().last_day(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            MonthKey::new(2025, 2).unwrap().last_day(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert_eq!(
            MonthKey::new(2024, 6).unwrap().last_day(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
        );
    }

    #[test]
    fn test_contains() {
        let june = MonthKey::new(2024, 6).unwrap();
        assert!(june.contains(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
        assert!(june.contains(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()));
        assert!(!june.contains(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()));
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a = MonthKey::new(2023, 12).unwrap();
        let b = MonthKey::new(2024, 1).unwrap();
        assert!(a < b);
    }
}
