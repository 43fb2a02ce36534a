// src/model/perspective.rs

use serde::Serialize;
use std::{fmt, str::FromStr};

use crate::error::KpiError;

/// Balanced-scorecard category a KPI row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Perspective {
    Financial,
    CustomerService,
    Quality,
    Employee,
}

/// Which source column names the sub-unit of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitColumn {
    /// Sub-division, used by every perspective except Customer & Service
    Subdiv,
    /// Product line, used by Customer & Service
    Produk,
}

impl UnitColumn {
    pub fn header(self) -> &'static str {
        match self {
            UnitColumn::Subdiv => "Subdiv",
            UnitColumn::Produk => "Produk",
        }
    }
}

impl Perspective {
    pub const ALL: [Perspective; 4] = [
        Perspective::Financial,
        Perspective::CustomerService,
        Perspective::Quality,
        Perspective::Employee,
    ];

    /// Column holding the sub-unit for rows of this perspective.
    pub fn unit_column(self) -> UnitColumn {
        match self {
            Perspective::CustomerService => UnitColumn::Produk,
            Perspective::Financial | Perspective::Quality | Perspective::Employee => {
                UnitColumn::Subdiv
            }
        }
    }

    /// Label as it appears in the source data.
    pub fn label(self) -> &'static str {
        match self {
            Perspective::Financial => "Financial",
            Perspective::CustomerService => "Customer n Service",
            Perspective::Quality => "Quality",
            Perspective::Employee => "Employee",
        }
    }

    /// Match a source label, ignoring case, spacing and the `n`/`&`/`and` joiner.
    pub fn from_label(raw: &str) -> Option<Perspective> {
        let squashed: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match squashed.as_str() {
            "financial" => Some(Perspective::Financial),
            "customernservice" | "customer&service" | "customerandservice"
            | "customerservice" => Some(Perspective::CustomerService),
            "quality" => Some(Perspective::Quality),
            "employee" => Some(Perspective::Employee),
            _ => None,
        }
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Perspective {
    type Err = KpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Perspective::from_label(s)
            .ok_or_else(|| KpiError::parse(None, "Perspective", s, "a known perspective"))
    }
}
