// src/load/mod.rs
//! Turn uploaded CSV or spreadsheet bytes into a [`Dataset`] of [`Record`]s.

pub mod sheet;
pub mod text;
pub mod utils;

use chrono::NaiveDate;
use std::{collections::BTreeMap, fs, path::Path};
use tracing::{debug, info, warn};

use crate::{
    error::{KpiError, Result},
    model::{MonthKey, Perspective, Record},
    select::{Dataset, DuplicatePolicy},
};

pub const PERSPECTIVE_COLUMN: &str = "Perspective";
pub const MONTH_COLUMN: &str = "Month";

static EMPTY_CELL: Cell = Cell::Empty;

/// Source format of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileKind {
    Csv,
    Spreadsheet,
    /// Try CSV first, then fall back to spreadsheet parsing
    #[default]
    Auto,
}

impl FileKind {
    /// Guess from a file extension; unknown extensions fall back to `Auto`.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") | Some("txt") => FileKind::Csv,
            Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
                FileKind::Spreadsheet
            }
            _ => FileKind::Auto,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub duplicates: DuplicatePolicy,
    /// Worksheet to read; first sheet when `None`
    pub sheet: Option<String>,
}

/// One cell as read from the source, before column typing.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    /// Spreadsheet cell stored as a real date
    Date(NaiveDate),
}

impl Cell {
    /// Cleaned text cell; blank text becomes `Empty`.
    pub fn text(raw: &str) -> Cell {
        let s = utils::clean_str(raw);
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

#[derive(Debug, Clone)]
pub struct RawRow {
    /// 1-based line in the source, header included
    pub line: usize,
    pub cells: Vec<Cell>,
}

/// Header plus rows, exactly as the source presented them.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }
}

/// Parse `bytes` as `kind` and build the session dataset.
#[tracing::instrument(level = "info", skip(bytes, options), fields(len = bytes.len()))]
pub fn load(bytes: &[u8], kind: FileKind, options: &LoadOptions) -> Result<Dataset> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(KpiError::load("file is empty"));
    }

    let table = read_table(bytes, kind, options.sheet.as_deref())?;
    let records = normalize(&table)?;
    let dataset = Dataset::new(records, options.duplicates)?;
    info!(records = dataset.len(), "dataset loaded");
    Ok(dataset)
}

/// Read a file from disk, inferring the kind from its extension when `kind` is `Auto`.
#[tracing::instrument(level = "info", skip(path, options), fields(path = %path.as_ref().display()))]
pub fn load_path<P: AsRef<Path>>(path: P, kind: FileKind, options: &LoadOptions) -> Result<Dataset> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .map_err(|e| KpiError::load(format!("cannot read {}: {}", path.display(), e)))?;
    let kind = match kind {
        FileKind::Auto => FileKind::from_path(path),
        k => k,
    };
    load(&bytes, kind, options)
}

fn read_table(bytes: &[u8], kind: FileKind, sheet: Option<&str>) -> Result<RawTable> {
    match kind {
        FileKind::Csv => text::read_csv(bytes),
        FileKind::Spreadsheet => sheet::read_spreadsheet(bytes, sheet),
        FileKind::Auto => match text::read_csv(bytes) {
            Ok(table) => Ok(table),
            Err(csv_err) => {
                debug!(error = %csv_err, "not CSV, trying spreadsheet");
                sheet::read_spreadsheet(bytes, sheet).map_err(|sheet_err| {
                    KpiError::load(format!(
                        "neither CSV ({}) nor spreadsheet ({})",
                        csv_err, sheet_err
                    ))
                })
            }
        },
    }
}

/// Type the perspective and month of every row and keep the rest as text.
pub fn normalize(table: &RawTable) -> Result<Vec<Record>> {
    if table.headers.iter().all(|h| h.is_empty()) {
        return Err(KpiError::load("file is empty"));
    }
    let perspective_idx = table
        .column(PERSPECTIVE_COLUMN)
        .ok_or_else(|| KpiError::load(format!("missing `{}` column", PERSPECTIVE_COLUMN)))?;
    let month_idx = table
        .column(MONTH_COLUMN)
        .ok_or_else(|| KpiError::load(format!("missing `{}` column", MONTH_COLUMN)))?;

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        if row.cells.iter().all(Cell::is_empty) {
            continue;
        }
        let cell = |idx: usize| row.cells.get(idx).unwrap_or(&EMPTY_CELL);

        let perspective = match cell(perspective_idx) {
            Cell::Text(s) => Perspective::from_label(s).ok_or_else(|| {
                KpiError::parse(Some(row.line), PERSPECTIVE_COLUMN, s, "a known perspective")
            })?,
            other => {
                return Err(KpiError::parse(
                    Some(row.line),
                    PERSPECTIVE_COLUMN,
                    cell_text(other),
                    "a known perspective",
                ))
            }
        };

        let month = match cell(month_idx) {
            Cell::Date(d) => MonthKey::from_date(*d),
            Cell::Text(s) => MonthKey::parse(s).map_err(|e| e.at_row(row.line))?,
            Cell::Empty => {
                return Err(KpiError::parse(
                    Some(row.line),
                    MONTH_COLUMN,
                    "",
                    "an MMM-YY month",
                ))
            }
        };

        let unit_header = perspective.unit_column().header();
        let Some(unit_idx) = table.column(unit_header) else {
            return Err(KpiError::load(format!(
                "row {}: {} rows need a `{}` column",
                row.line, perspective, unit_header
            )));
        };
        // a row without a sub-unit can never be selected
        if cell(unit_idx).is_empty() {
            return Err(KpiError::load(format!(
                "row {}: {} row has a blank `{}`",
                row.line, perspective, unit_header
            )));
        }

        let mut fields = BTreeMap::new();
        for (idx, header) in table.headers.iter().enumerate() {
            if idx == perspective_idx || idx == month_idx || header.is_empty() {
                continue;
            }
            match cell(idx) {
                Cell::Empty => {}
                other => {
                    fields
                        .entry(header.clone())
                        .or_insert_with(|| cell_text(other));
                }
            }
        }
        if row.cells.len() > table.headers.len() {
            warn!(line = row.line, "row has more cells than headers; extras ignored");
        }

        records.push(Record::new(perspective, month, row.line, fields));
    }

    if records.is_empty() {
        return Err(KpiError::load("file has no data rows"));
    }
    Ok(records)
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(s) => s.clone(),
        Cell::Date(d) => d.to_string(),
    }
}
