// src/model/record.rs

use std::collections::BTreeMap;

use super::{MonthKey, Perspective};

/// One row of the uploaded dataset.
///
/// The perspective and month are parsed at load time; every other column
/// (sub-unit included) is kept as trimmed text keyed by its header.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub perspective: Perspective,
    pub month: MonthKey,
    /// 1-based line in the source file, header included
    pub line: usize,
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new(
        perspective: Perspective,
        month: MonthKey,
        line: usize,
        fields: BTreeMap<String, String>,
    ) -> Self {
        Self {
            perspective,
            month,
            line,
            fields,
        }
    }

    /// Value of `column`, matched case-insensitively. Blank cells are absent.
    pub fn field(&self, column: &str) -> Option<&str> {
        if let Some(v) = self.fields.get(column) {
            return Some(v.as_str());
        }
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(column))
            .map(|(_, v)| v.as_str())
    }

    /// Sub-unit under this record's own perspective (`Produk` or `Subdiv`).
    pub fn unit(&self) -> Option<&str> {
        self.field(self.perspective.unit_column().header())
    }
}
