//! Error taxonomy for loading, selecting and deriving KPI data.

use thiserror::Error;

use crate::model::{MonthKey, Perspective};

/// Result type for dataset operations
pub type Result<T> = std::result::Result<T, KpiError>;

/// Coarse classification of a [`KpiError`], for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Load,
    Parse,
    MissingField,
    Format,
    DuplicateRecord,
}

/// Errors that can occur while turning an uploaded file into metrics
#[derive(Debug, Error)]
pub enum KpiError {
    /// File unreadable, unsupported, empty, or missing a required column
    #[error("cannot load dataset: {reason}")]
    Load { reason: String },

    /// A cell could not be read as the value its column requires
    #[error("{}{column} value `{value}` is not {expected}", row_prefix(.row))]
    Parse {
        row: Option<usize>,
        column: String,
        value: String,
        expected: &'static str,
    },

    /// A metric column needed by the perspective is absent or blank
    #[error("{perspective} record has no `{column}` value")]
    MissingField {
        perspective: Perspective,
        column: String,
    },

    /// A numeric or percent cell holds non-numeric text
    #[error("{}`{value}` is not numeric", column_prefix(.column))]
    Format {
        column: Option<String>,
        value: String,
    },

    /// Two rows share the same perspective, sub-unit and month
    #[error(
        "row {row} duplicates row {first_row} ({perspective} / {unit} / {month})"
    )]
    DuplicateRecord {
        perspective: Perspective,
        unit: String,
        month: MonthKey,
        first_row: usize,
        row: usize,
    },
}

fn row_prefix(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!("row {}: ", r),
        None => String::new(),
    }
}

fn column_prefix(column: &Option<String>) -> String {
    match column {
        Some(c) => format!("{}: ", c),
        None => String::new(),
    }
}

impl KpiError {
    pub fn load(reason: impl Into<String>) -> Self {
        KpiError::Load {
            reason: reason.into(),
        }
    }

    pub fn parse(
        row: Option<usize>,
        column: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        KpiError::Parse {
            row,
            column: column.into(),
            value: value.into(),
            expected,
        }
    }

    pub fn missing_field(perspective: Perspective, column: impl Into<String>) -> Self {
        KpiError::MissingField {
            perspective,
            column: column.into(),
        }
    }

    pub fn format(value: impl Into<String>) -> Self {
        KpiError::Format {
            column: None,
            value: value.into(),
        }
    }

    /// Attach the source column to a `Format` error; other variants pass through.
    pub fn in_column(self, name: &str) -> Self {
        match self {
            KpiError::Format { value, .. } => KpiError::Format {
                column: Some(name.to_string()),
                value,
            },
            other => other,
        }
    }

    /// Attach the source row to a `Parse` error that has none yet.
    pub fn at_row(self, line: usize) -> Self {
        match self {
            KpiError::Parse {
                row: None,
                column,
                value,
                expected,
            } => KpiError::Parse {
                row: Some(line),
                column,
                value,
                expected,
            },
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            KpiError::Load { .. } => ErrorKind::Load,
            KpiError::Parse { .. } => ErrorKind::Parse,
            KpiError::MissingField { .. } => ErrorKind::MissingField,
            KpiError::Format { .. } => ErrorKind::Format,
            KpiError::DuplicateRecord { .. } => ErrorKind::DuplicateRecord,
        }
    }
}
