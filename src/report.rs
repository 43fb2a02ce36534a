// src/report.rs
//! Scorecard for one selection: current metrics plus month-over-month trends.

use serde::Serialize;
use std::fmt::Write as _;
use tracing::debug;

use crate::{
    derive::{derive, Metric, MetricSet},
    error::Result,
    model::MonthKey,
    select::{Dataset, Selection},
    trend::{compare, Direction, Trend},
};

#[derive(Debug, Clone, Serialize)]
pub struct MetricTrend {
    pub metric: Metric,
    pub current: f64,
    pub previous: f64,
    #[serde(flatten)]
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scorecard {
    #[serde(flatten)]
    pub selection: Selection,
    /// Month the trends compare against, when that slice exists
    pub previous_month: Option<MonthKey>,
    pub metrics: MetricSet,
    pub trends: Vec<MetricTrend>,
}

impl Scorecard {
    /// `Ok(None)` when the dataset has no row for `selection`.
    pub fn build(dataset: &Dataset, selection: &Selection) -> Result<Option<Scorecard>> {
        let Some(record) = dataset.select(selection) else {
            debug!(?selection, "no data for slice");
            return Ok(None);
        };
        let metrics = derive(selection.perspective, record)?;

        let previous = match selection.previous() {
            Some(prev) => match dataset.select(&prev) {
                Some(r) => Some((prev.month, derive(prev.perspective, r)?)),
                None => None,
            },
            None => None,
        };

        let trends = match &previous {
            Some((_, before)) => metrics
                .tracked()
                .into_iter()
                .filter_map(|(metric, current)| {
                    before.value(metric).map(|previous| MetricTrend {
                        metric,
                        current,
                        previous,
                        trend: compare(current, previous),
                    })
                })
                .collect(),
            None => Vec::new(),
        };

        Ok(Some(Scorecard {
            selection: selection.clone(),
            previous_month: previous.map(|(m, _)| m),
            metrics,
            trends,
        }))
    }

    pub fn trend(&self, metric: Metric) -> Option<&MetricTrend> {
        self.trends.iter().find(|t| t.metric == metric)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let sel = &self.selection;
        let _ = writeln!(out, "{} / {} / {}", sel.perspective, sel.unit, sel.month);
        let _ = writeln!(out, "{:-<48}", "");

        match &self.metrics {
            MetricSet::Financial(m) => {
                row(&mut out, "Budget", &fmt_num(m.budget));
                row(&mut out, "Expense", &fmt_num(m.expense));
                self.tracked_row(&mut out, Metric::Usage, &m.usage.to_string());
                self.tracked_row(&mut out, Metric::Profit, &fmt_num(m.profit));
                self.tracked_row(&mut out, Metric::Revenue, &fmt_num(m.revenue));
            }
            MetricSet::CustomerService(m) => {
                self.tracked_row(&mut out, Metric::Customers, &fmt_num(m.customers));
                self.tracked_row(
                    &mut out,
                    Metric::Satisfaction,
                    &format!("{:.1} / 5", m.satisfaction),
                );
            }
            MetricSet::Quality(m) => {
                row(&mut out, "Target", &fmt_num(m.target));
                row(&mut out, "Realization", &fmt_num(m.realization));
                self.tracked_row(&mut out, Metric::Velocity, &m.velocity.to_string());
                self.tracked_row(&mut out, Metric::Quality, &m.quality.to_string());
            }
            MetricSet::Employee(m) => {
                row(&mut out, "Current MP", &fmt_num(m.current_headcount));
                row(&mut out, "Needed MP", &fmt_num(m.needed_headcount));
                row(&mut out, "MP shortage", &fmt_num(m.shortage));
                self.tracked_row(&mut out, Metric::Competency, &m.competency.to_string());
                self.tracked_row(&mut out, Metric::Turnover, &m.turnover.to_string());
            }
        }

        match self.previous_month {
            Some(m) => {
                let _ = writeln!(out, "(trends vs {})", m);
            }
            None => {
                let _ = writeln!(out, "(no previous month to compare)");
            }
        }
        out
    }

    fn tracked_row(&self, out: &mut String, metric: Metric, value: &str) {
        match self.trend(metric) {
            Some(t) => {
                let delta = if metric.is_percent() {
                    format!("{:.1}%", t.trend.magnitude)
                } else {
                    format!("{:.1}", t.trend.magnitude)
                };
                let _ = writeln!(
                    out,
                    "{: <24} {:>14}  {} {}",
                    metric.label(),
                    value,
                    glyph(t.trend.direction),
                    delta
                );
            }
            None => row(out, metric.label(), value),
        }
    }
}

fn row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "{: <24} {:>14}", label, value);
}

fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

pub fn glyph(direction: Direction) -> char {
    match direction {
        Direction::Up => '▲',
        Direction::Down => '▼',
        Direction::Flat => '→',
    }
}
