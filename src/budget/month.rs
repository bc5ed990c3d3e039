use std::{fmt, str::FromStr};

use chrono::{Datelike, Local, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::core::errors::BudgetError;

/// Calendar month identity of a budget record, written as `YYYY-MM`.
///
/// Parsing is strict (four-digit year, two-digit month) so that two distinct
/// keys can never refer to the same calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, BudgetError> {
        if !(0..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(BudgetError::InvalidMonth(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current calendar month on the local clock.
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month before this one, or `None` before `0000-01`.
    pub fn previous(&self) -> Option<Self> {
        match self.month {
            1 => Self::new(self.year - 1, 12).ok(),
            month => Self::new(self.year, month - 1).ok(),
        }
    }

    /// The month after this one, or `None` past `9999-12`.
    pub fn next(&self) -> Option<Self> {
        match self.month {
            12 => Self::new(self.year + 1, 1).ok(),
            month => Self::new(self.year, month + 1).ok(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = BudgetError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || BudgetError::InvalidMonth(input.to_string());
        let (year, month) = input.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
