use serde::Serialize;
use std::fmt;

use crate::error::{KpiError, Result};

/// A percentage in percent points (`"87.5%"` holds 87.5).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Percent(f64);

impl Percent {
    /// Parse `"87.5%"`. The `%` suffix is required: a bare number such as a
    /// spreadsheet percent cell stored as `0.875` is ambiguous and rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let Some(digits) = raw.trim().strip_suffix('%') else {
            return Err(KpiError::format(raw));
        };
        match digits.trim_end().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Percent(v)),
            _ => Err(KpiError::format(raw)),
        }
    }

    pub fn from_points(points: f64) -> Self {
        Percent(points)
    }

    pub fn points(self) -> f64 {
        self.0
    }

    /// `0.875` for 87.5%
    pub fn fraction(self) -> f64 {
        self.0 / 100.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

/// Parse a plain numeric cell, tolerating `1,250` style thousands separators.
pub fn parse_number(raw: &str) -> Result<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(KpiError::format(raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn strips_percent_sign() {
        let p = Percent::parse("45.0%").unwrap();
        assert_eq!(p.points(), 45.0);
        assert_eq!(p.fraction(), 0.45);
        assert_eq!(Percent::parse(" 87.5 % ").unwrap().points(), 87.5);
    }

    #[test]
    fn bare_number_is_rejected() {
        for bad in ["12", "0.45", "45.0"] {
            let err = Percent::parse(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format, "input {:?}", bad);
        }
    }

    #[test]
    fn non_numeric_fails_loudly() {
        for bad in ["abc%", "%", "", "12.5%%", "NaN%", "inf"] {
            let err = Percent::parse(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format, "input {:?}", bad);
        }
    }

    #[test]
    fn displays_one_decimal() {
        assert_eq!(Percent::from_points(87.5).to_string(), "87.5%");
        assert_eq!(Percent::from_points(12.04).to_string(), "12.0%");
    }

    #[test]
    fn numbers_accept_thousands_separators() {
        assert_eq!(parse_number("1,250").unwrap(), 1250.0);
        assert_eq!(parse_number(" -3.5 ").unwrap(), -3.5);
        assert_eq!(parse_number("12x").unwrap_err().kind(), ErrorKind::Format);
    }
}
