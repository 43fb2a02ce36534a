use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use std::io::Cursor;
use tracing::debug;

use super::{utils::clean_str, Cell, RawRow, RawTable};
use crate::error::{KpiError, Result};

/// Read one worksheet (the named one, or the first) of an xlsx/xls/ods workbook.
pub fn read_spreadsheet(bytes: &[u8], sheet: Option<&str>) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| KpiError::load(format!("unreadable spreadsheet: {}", e)))?;

    let name = match sheet {
        Some(s) => s.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| KpiError::load("workbook has no worksheets"))?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| KpiError::load(format!("cannot read worksheet `{}`: {}", name, e)))?;

    // Range coordinates are 0-based and may not start at A1
    let first_line = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);

    let mut iter = range.rows();
    let headers: Vec<String> = match iter.next() {
        Some(row) => row.iter().map(|c| clean_str(&c.to_string())).collect(),
        None => return Ok(RawTable::default()),
    };

    let rows: Vec<RawRow> = iter
        .enumerate()
        .map(|(i, row)| RawRow {
            line: first_line + i + 1,
            cells: row.iter().map(to_cell).collect(),
        })
        .collect();

    debug!(sheet = %name, columns = headers.len(), rows = rows.len(), "parsed worksheet");
    Ok(RawTable { headers, rows })
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s),
        Data::Float(f) => Cell::Text(f.to_string()),
        Data::Int(i) => Cell::Text(i.to_string()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match data.as_date() {
            Some(d) => Cell::Date(d),
            None => Cell::text(&data.to_string()),
        },
        Data::DurationIso(s) => Cell::text(s),
        Data::Error(e) => Cell::Text(format!("{:?}", e)),
    }
}
