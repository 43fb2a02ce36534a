//! Typed metrics per perspective, pulled out of a selected [`Record`].

use serde::Serialize;

use crate::{
    error::{KpiError, Result},
    model::{percent::parse_number, Percent, Perspective, Record},
};

/// Source column headers for every metric.
pub mod columns {
    pub const BUDGET: &str = "Budget";
    pub const EXPENSE: &str = "Expense";
    pub const USAGE: &str = "Usage";
    pub const PROFIT: &str = "Profit";
    pub const REVENUE: &str = "Revenue";

    pub const CUSTOMERS: &str = "Number of customer";
    pub const SATISFACTION: &str = "Customer satisfaction";

    pub const TARGET: &str = "Target";
    pub const REALIZATION: &str = "Realization";
    pub const VELOCITY: &str = "Velocity";
    pub const QUALITY: &str = "Quality";

    pub const CURRENT_MP: &str = "Current MP";
    pub const NEEDED_MP: &str = "Needed MP";
    pub const COMPETENCY: &str = "Competency";
    pub const TURNOVER: &str = "Turnover ratio";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialMetrics {
    pub budget: f64,
    pub expense: f64,
    pub usage: Percent,
    pub profit: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerServiceMetrics {
    pub customers: f64,
    /// 0 to 5 scale, not a percentage
    pub satisfaction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityMetrics {
    pub target: f64,
    pub realization: f64,
    pub velocity: Percent,
    pub quality: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeMetrics {
    pub current_headcount: f64,
    pub needed_headcount: f64,
    pub competency: Percent,
    pub turnover: Percent,
    /// `needed_headcount - current_headcount`; negative when overstaffed
    pub shortage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "perspective", rename_all = "snake_case")]
pub enum MetricSet {
    Financial(FinancialMetrics),
    CustomerService(CustomerServiceMetrics),
    Quality(QualityMetrics),
    Employee(EmployeeMetrics),
}

/// Headline values that get a month-over-month annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Usage,
    Profit,
    Revenue,
    Customers,
    Satisfaction,
    Velocity,
    Quality,
    Competency,
    Turnover,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::Usage => "Usage",
            Metric::Profit => "Profit",
            Metric::Revenue => "Revenue",
            Metric::Customers => "Number of customers",
            Metric::Satisfaction => "Customer satisfaction",
            Metric::Velocity => "Average velocity",
            Metric::Quality => "Average quality",
            Metric::Competency => "Average competency",
            Metric::Turnover => "Turnover ratio",
        }
    }

    pub fn is_percent(self) -> bool {
        matches!(
            self,
            Metric::Usage
                | Metric::Velocity
                | Metric::Quality
                | Metric::Competency
                | Metric::Turnover
        )
    }
}

impl MetricSet {
    pub fn perspective(&self) -> Perspective {
        match self {
            MetricSet::Financial(_) => Perspective::Financial,
            MetricSet::CustomerService(_) => Perspective::CustomerService,
            MetricSet::Quality(_) => Perspective::Quality,
            MetricSet::Employee(_) => Perspective::Employee,
        }
    }

    /// Tracked metrics with their current value (percent metrics in points).
    pub fn tracked(&self) -> Vec<(Metric, f64)> {
        match self {
            MetricSet::Financial(m) => vec![
                (Metric::Usage, m.usage.points()),
                (Metric::Profit, m.profit),
                (Metric::Revenue, m.revenue),
            ],
            MetricSet::CustomerService(m) => vec![
                (Metric::Customers, m.customers),
                (Metric::Satisfaction, m.satisfaction),
            ],
            MetricSet::Quality(m) => vec![
                (Metric::Velocity, m.velocity.points()),
                (Metric::Quality, m.quality.points()),
            ],
            MetricSet::Employee(m) => vec![
                (Metric::Competency, m.competency.points()),
                (Metric::Turnover, m.turnover.points()),
            ],
        }
    }

    /// Current value of `metric`, if this perspective tracks it.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.tracked()
            .into_iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, v)| v)
    }
}

/// Pull the `perspective`-specific metrics out of `record`.
pub fn derive(perspective: Perspective, record: &Record) -> Result<MetricSet> {
    let fields = Fields {
        perspective,
        record,
    };
    let set = match perspective {
        Perspective::Financial => MetricSet::Financial(FinancialMetrics {
            budget: fields.number(columns::BUDGET)?,
            expense: fields.number(columns::EXPENSE)?,
            usage: fields.percent(columns::USAGE)?,
            profit: fields.number(columns::PROFIT)?,
            revenue: fields.number(columns::REVENUE)?,
        }),
        Perspective::CustomerService => MetricSet::CustomerService(CustomerServiceMetrics {
            customers: fields.number(columns::CUSTOMERS)?,
            satisfaction: fields.number(columns::SATISFACTION)?,
        }),
        Perspective::Quality => MetricSet::Quality(QualityMetrics {
            target: fields.number(columns::TARGET)?,
            realization: fields.number(columns::REALIZATION)?,
            velocity: fields.percent(columns::VELOCITY)?,
            quality: fields.percent(columns::QUALITY)?,
        }),
        Perspective::Employee => {
            let current_headcount = fields.number(columns::CURRENT_MP)?;
            let needed_headcount = fields.number(columns::NEEDED_MP)?;
            MetricSet::Employee(EmployeeMetrics {
                current_headcount,
                needed_headcount,
                competency: fields.percent(columns::COMPETENCY)?,
                turnover: fields.percent(columns::TURNOVER)?,
                shortage: needed_headcount - current_headcount,
            })
        }
    };
    Ok(set)
}

struct Fields<'a> {
    perspective: Perspective,
    record: &'a Record,
}

impl Fields<'_> {
    fn raw(&self, column: &str) -> Result<&str> {
        self.record
            .field(column)
            .ok_or_else(|| KpiError::missing_field(self.perspective, column))
    }

    fn number(&self, column: &str) -> Result<f64> {
        parse_number(self.raw(column)?).map_err(|e| e.in_column(column))
    }

    fn percent(&self, column: &str) -> Result<Percent> {
        Percent::parse(self.raw(column)?).map_err(|e| e.in_column(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, model::MonthKey};
    use std::collections::BTreeMap;

    fn record(perspective: Perspective, pairs: &[(&str, &str)]) -> Record {
        let fields: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Record::new(perspective, MonthKey::new(2025, 2).unwrap(), 2, fields)
    }

    fn financial(usage: &str) -> Record {
        record(
            Perspective::Financial,
            &[
                ("Subdiv", "Subdiv 1"),
                ("Budget", "1000"),
                ("Expense", "450"),
                ("Usage", usage),
                ("Profit", "320"),
                ("Revenue", "1,250"),
            ],
        )
    }

    #[test]
    fn financial_usage_is_parsed_from_percent() {
        let set = derive(Perspective::Financial, &financial("45.0%")).unwrap();
        let MetricSet::Financial(m) = &set else {
            panic!("wrong variant: {:?}", set)
        };
        assert_eq!(m.usage.points(), 45.0);
        assert_eq!(m.budget, 1000.0);
        assert_eq!(m.expense, 450.0);
        assert_eq!(m.revenue, 1250.0);
        assert_eq!(set.perspective(), Perspective::Financial);
    }

    #[test]
    fn derive_is_deterministic() {
        let r = financial("45.0%");
        assert_eq!(
            derive(Perspective::Financial, &r).unwrap(),
            derive(Perspective::Financial, &r).unwrap()
        );
    }

    #[test]
    fn employee_shortage() {
        let r = record(
            Perspective::Employee,
            &[
                ("Current MP", "20"),
                ("Needed MP", "25"),
                ("Competency", "80%"),
                ("Turnover ratio", "5.5%"),
            ],
        );
        let MetricSet::Employee(m) = derive(Perspective::Employee, &r).unwrap() else {
            panic!("wrong variant")
        };
        assert_eq!(m.shortage, 5.0);
        assert_eq!(m.turnover.points(), 5.5);
    }

    #[test]
    fn customer_satisfaction_is_a_raw_score() {
        let r = record(
            Perspective::CustomerService,
            &[("Number of customer", "60"), ("Customer satisfaction", "4.2")],
        );
        let set = derive(Perspective::CustomerService, &r).unwrap();
        assert_eq!(set.value(Metric::Satisfaction), Some(4.2));
        assert_eq!(set.value(Metric::Customers), Some(60.0));
        assert_eq!(set.value(Metric::Usage), None);
    }

    #[test]
    fn quality_tracks_velocity_and_quality() {
        let r = record(
            Perspective::Quality,
            &[
                ("Target", "100"),
                ("Realization", "92"),
                ("Velocity", "88.5%"),
                ("Quality", "97%"),
            ],
        );
        let set = derive(Perspective::Quality, &r).unwrap();
        assert_eq!(
            set.tracked(),
            vec![(Metric::Velocity, 88.5), (Metric::Quality, 97.0)]
        );
    }

    #[test]
    fn missing_column_is_missing_field() {
        let r = record(Perspective::Financial, &[("Budget", "1000")]);
        let err = derive(Perspective::Financial, &r).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert!(err.to_string().contains("Expense"), "{}", err);
    }

    #[test]
    fn bad_percent_is_format_error() {
        let err = derive(Perspective::Financial, &financial("n/a%")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.to_string(), "Usage: `n/a%` is not numeric");
    }

    #[test]
    fn serialises_with_perspective_tag() {
        let set = derive(Perspective::Financial, &financial("45.0%")).unwrap();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["perspective"], "financial");
        assert_eq!(json["usage"], 45.0);
    }
}
