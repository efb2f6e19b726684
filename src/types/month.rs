use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A calendar month, `Month(year, month)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);

impl Month {
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }
    pub fn new(month: u32, year: i32) -> Self {
        Self(year, month)
    }

    pub fn of(date: NaiveDate) -> Self {
        Self(date.year(), date.month())
    }

    pub fn next(self) -> Self {
        if self.1 >= 12 {
            Self(self.0 + 1, 1)
        } else {
            Self(self.0, self.1 + 1)
        }
    }

    /// Every month from the one containing `start` up to and including the
    /// one containing `end`.
    pub fn span(start: NaiveDate, end: NaiveDate) -> Vec<Month> {
        let last = Month::of(end);
        let mut months = Vec::new();
        let mut current = Month::of(start);
        while current <= last {
            months.push(current);
            current = current.next();
        }
        months
    }

    /// File stem used by the monthly weather archive, e.g. `2025-3`.
    pub(crate) fn file_stem(self) -> String {
        format!("{}-{}", self.0, self.1)
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}
