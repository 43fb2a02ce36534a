use chrono::{Datelike, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

use crate::error::{KpiError, Result};

/// `MMM-YY`, e.g. `Feb-25`
static MONTH_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{3}-\d{2}$").expect("month token pattern"));

const TOKEN_FORMAT: &str = "%b-%y";

/// A calendar month, stored as the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(MonthKey)
    }

    /// Collapse any date onto the first day of its month.
    pub fn from_date(date: NaiveDate) -> Self {
        MonthKey(date.with_day(1).unwrap_or(date))
    }

    /// Parse an `MMM-YY` token such as `Feb-25` (month names are case-insensitive).
    pub fn parse(token: &str) -> Result<Self> {
        let t = token.trim();
        if !MONTH_TOKEN.is_match(t) {
            return Err(KpiError::parse(None, "Month", token, "an MMM-YY month"));
        }
        // pin the day so chrono has a full date to build
        NaiveDate::parse_from_str(&format!("01-{}", t), &format!("%d-{}", TOKEN_FORMAT))
            .map(MonthKey)
            .map_err(|_| KpiError::parse(None, "Month", token, "an MMM-YY month"))
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    /// The calendar month before this one.
    pub fn previous(self) -> Option<Self> {
        self.0.checked_sub_months(Months::new(1)).map(MonthKey)
    }

    /// Canonical `MMM-YY` form.
    pub fn token(self) -> String {
        self.0.format(TOKEN_FORMAT).to_string()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TOKEN_FORMAT))
    }
}

impl FromStr for MonthKey {
    type Err = KpiError;

    fn from_str(s: &str) -> Result<Self> {
        MonthKey::parse(s)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token())
    }
}
