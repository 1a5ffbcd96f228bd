//! `MM-YYYY` month periods.
//!
//! Subscription dates travel and are stored as `MM-YYYY` text. `MonthYear` is the
//! parsed form: it orders chronologically and maps to the first day of its month,
//! which is what `to_date(value, 'MM-YYYY')` yields on the database side.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::errors::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear {
    // field order matters for the derived ordering
    year: i32,
    month: u32,
}

impl MonthYear {
    pub fn new(month: u32, year: i32) -> Option<Self> {
        if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
            return None;
        }
        Some(Self { year, month })
    }

    pub fn month(&self) -> u32 { self.month }

    pub fn year(&self) -> i32 { self.year }

    pub fn first_day(&self) -> NaiveDate {
        // month and year are range-checked in `new`
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }
}

impl FromStr for MonthYear {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::Validation(format!("'{s}' is not a MM-YYYY month"));
        let (mm, yyyy) = s.trim().split_once('-').ok_or_else(invalid)?;
        if mm.len() != 2 || yyyy.len() != 4 {
            return Err(invalid());
        }
        if !mm.bytes().chain(yyyy.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let month: u32 = mm.parse().map_err(|_| invalid())?;
        let year: i32 = yyyy.parse().map_err(|_| invalid())?;
        MonthYear::new(month, year).ok_or_else(invalid)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_month_year() {
        let p: MonthYear = "03-2024".parse().expect("parse");
        assert_eq!(p.month(), 3);
        assert_eq!(p.year(), 2024);
        assert_eq!(p.first_day(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(p.to_string(), "03-2024");
    }

    #[test]
    fn rejects_malformed_values() {
        for bad in ["", "2024-03", "3-2024", "13-2024", "00-2024", "03-24", "ab-2024", "03/2024", "03-20245", "+3-2024"] {
            assert!(bad.parse::<MonthYear>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn orders_chronologically() {
        let dec_2023: MonthYear = "12-2023".parse().unwrap();
        let jan_2024: MonthYear = "01-2024".parse().unwrap();
        let feb_2024: MonthYear = "02-2024".parse().unwrap();
        assert!(dec_2023 < jan_2024);
        assert!(jan_2024 < feb_2024);
        assert_eq!(dec_2023.max(feb_2024), feb_2024);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let p: MonthYear = " 07-2025 ".parse().expect("parse");
        assert_eq!(p, MonthYear::new(7, 2025).unwrap());
    }
}
