// src/select.rs

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

use crate::{
    error::{KpiError, Result},
    load::utils::clean_str,
    model::{MonthKey, Perspective, Record},
};

/// What to do when two rows share perspective, sub-unit and month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail the load with `DuplicateRecord`
    #[default]
    Reject,
    /// Keep every row; selection returns the earliest
    FirstWins,
}

/// The slice a caller is currently looking at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Selection {
    pub perspective: Perspective,
    pub unit: String,
    pub month: MonthKey,
}

impl Selection {
    /// `unit` is cleaned the same way the loader cleans cells.
    pub fn new(perspective: Perspective, unit: impl Into<String>, month: MonthKey) -> Self {
        Self {
            perspective,
            unit: clean_str(&unit.into()),
            month,
        }
    }

    /// Same perspective and sub-unit, one calendar month earlier.
    pub fn previous(&self) -> Option<Selection> {
        self.month.previous().map(|month| Selection {
            perspective: self.perspective,
            unit: self.unit.clone(),
            month,
        })
    }
}

/// First record matching `perspective`, `unit` and `month`, in source order.
///
/// The sub-unit is read from `Produk` for Customer & Service and from
/// `Subdiv` otherwise. No match is `None`, not an error.
pub fn select<'a>(
    records: &'a [Record],
    perspective: Perspective,
    unit: &str,
    month: MonthKey,
) -> Option<&'a Record> {
    let column = perspective.unit_column().header();
    records.iter().find(|r| {
        r.perspective == perspective && r.month == month && r.field(column) == Some(unit)
    })
}

/// All records of one upload. Replaced wholesale on the next upload.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Wrap `records`, enforcing `policy` on duplicate keys.
    pub fn new(records: Vec<Record>, policy: DuplicatePolicy) -> Result<Self> {
        check_duplicates(&records, policy)?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn select(&self, selection: &Selection) -> Option<&Record> {
        select(
            &self.records,
            selection.perspective,
            &selection.unit,
            selection.month,
        )
    }

    /// Distinct months present, oldest first.
    pub fn months(&self) -> Vec<MonthKey> {
        self.records
            .iter()
            .map(|r| r.month)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Perspectives present, in declaration order.
    pub fn perspectives(&self) -> Vec<Perspective> {
        Perspective::ALL
            .into_iter()
            .filter(|p| self.records.iter().any(|r| r.perspective == *p))
            .collect()
    }

    /// Distinct sub-units of `perspective`, in first-seen order.
    pub fn units(&self, perspective: Perspective) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for unit in self
            .records
            .iter()
            .filter(|r| r.perspective == perspective)
            .filter_map(Record::unit)
        {
            if !out.contains(&unit) {
                out.push(unit);
            }
        }
        out
    }
}

fn check_duplicates(records: &[Record], policy: DuplicatePolicy) -> Result<()> {
    let mut seen: HashMap<(Perspective, &str, MonthKey), usize> = HashMap::new();
    let mut duplicates = 0usize;
    for r in records {
        let Some(unit) = r.unit() else { continue };
        match seen.get(&(r.perspective, unit, r.month)) {
            None => {
                seen.insert((r.perspective, unit, r.month), r.line);
            }
            Some(&first_row) => match policy {
                DuplicatePolicy::Reject => {
                    return Err(KpiError::DuplicateRecord {
                        perspective: r.perspective,
                        unit: unit.to_string(),
                        month: r.month,
                        first_row,
                        row: r.line,
                    });
                }
                DuplicatePolicy::FirstWins => {
                    duplicates += 1;
                    debug!(line = r.line, first_row, "duplicate slice; earlier row wins");
                }
            },
        }
    }
    if duplicates > 0 {
        warn!(duplicates, "dataset has duplicate slices; first row wins");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::BTreeMap;

    fn month(token: &str) -> MonthKey {
        MonthKey::parse(token).unwrap()
    }

    fn rec(line: usize, perspective: Perspective, unit: &str, m: &str, extra: &str) -> Record {
        let mut fields = BTreeMap::new();
        fields.insert(perspective.unit_column().header().to_string(), unit.to_string());
        fields.insert("Tag".to_string(), extra.to_string());
        Record::new(perspective, month(m), line, fields)
    }

    fn sample() -> Vec<Record> {
        vec![
            rec(2, Perspective::Financial, "Subdiv 1", "Jan-25", "a"),
            rec(3, Perspective::Financial, "Subdiv 1", "Feb-25", "b"),
            rec(4, Perspective::Financial, "Subdiv 2", "Feb-25", "c"),
            rec(5, Perspective::CustomerService, "PRODUK 1", "Feb-25", "d"),
            rec(6, Perspective::Quality, "Subdiv 1", "Feb-25", "e"),
        ]
    }

    #[test]
    fn selects_exact_slice() {
        let records = sample();
        let r = select(&records, Perspective::Financial, "Subdiv 1", month("Feb-25")).unwrap();
        assert_eq!(r.field("Tag"), Some("b"));
        let r = select(
            &records,
            Perspective::CustomerService,
            "PRODUK 1",
            month("Feb-25"),
        )
        .unwrap();
        assert_eq!(r.field("Tag"), Some("d"));
    }

    #[test]
    fn absent_month_selects_nothing() {
        let records = sample();
        for p in Perspective::ALL {
            for unit in ["Subdiv 1", "Subdiv 2", "PRODUK 1"] {
                assert!(select(&records, p, unit, month("Mar-25")).is_none());
            }
        }
    }

    #[test]
    fn unit_column_follows_perspective() {
        // a Customer & Service row only matches on its product, never on Subdiv
        let mut fields = BTreeMap::new();
        fields.insert("Subdiv".to_string(), "Subdiv 1".to_string());
        fields.insert("Produk".to_string(), "PRODUK 2".to_string());
        let records = vec![Record::new(
            Perspective::CustomerService,
            month("Feb-25"),
            2,
            fields,
        )];
        assert!(select(
            &records,
            Perspective::CustomerService,
            "Subdiv 1",
            month("Feb-25")
        )
        .is_none());
        assert!(select(
            &records,
            Perspective::CustomerService,
            "PRODUK 2",
            month("Feb-25")
        )
        .is_some());
    }

    #[test]
    fn duplicates_rejected_by_default() {
        let mut records = sample();
        records.push(rec(7, Perspective::Financial, "Subdiv 1", "Feb-25", "z"));
        let err = Dataset::new(records, DuplicatePolicy::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateRecord);
        match err {
            KpiError::DuplicateRecord { first_row, row, .. } => {
                assert_eq!((first_row, row), (3, 7));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn first_wins_keeps_source_order() {
        let mut records = sample();
        records.push(rec(7, Perspective::Financial, "Subdiv 1", "Feb-25", "z"));
        let ds = Dataset::new(records, DuplicatePolicy::FirstWins).unwrap();
        let sel = Selection::new(Perspective::Financial, "Subdiv 1", month("Feb-25"));
        assert_eq!(ds.select(&sel).unwrap().field("Tag"), Some("b"));
    }

    #[test]
    fn lists_months_units_and_perspectives() {
        let ds = Dataset::new(sample(), DuplicatePolicy::Reject).unwrap();
        assert_eq!(ds.months(), vec![month("Jan-25"), month("Feb-25")]);
        assert_eq!(
            ds.units(Perspective::Financial),
            vec!["Subdiv 1", "Subdiv 2"]
        );
        assert_eq!(ds.units(Perspective::CustomerService), vec!["PRODUK 1"]);
        assert!(ds.units(Perspective::Employee).is_empty());
        assert_eq!(
            ds.perspectives(),
            vec![
                Perspective::Financial,
                Perspective::CustomerService,
                Perspective::Quality
            ]
        );
    }

    #[test]
    fn selection_unit_is_cleaned_like_cells() {
        let ds = Dataset::new(sample(), DuplicatePolicy::Reject).unwrap();
        let sel = Selection::new(Perspective::Financial, "  Subdiv 1 ", month("Feb-25"));
        assert_eq!(sel.unit, "Subdiv 1");
        assert_eq!(ds.select(&sel).unwrap().field("Tag"), Some("b"));

        let quoted = Selection::new(Perspective::Financial, "\"Subdiv 2\"", month("Feb-25"));
        assert_eq!(ds.select(&quoted).unwrap().field("Tag"), Some("c"));
    }

    #[test]
    fn previous_selection_steps_back_a_month() {
        let sel = Selection::new(Perspective::Quality, "Subdiv 1", month("Jan-25"));
        let prev = sel.previous().unwrap();
        assert_eq!(prev.month, month("Dec-24"));
        assert_eq!(prev.unit, "Subdiv 1");
    }
}
