use csv::{ReaderBuilder, Trim};
use tracing::{debug, trace};

use super::{utils::{clean_str, strip_bom}, Cell, RawRow, RawTable};
use crate::error::{KpiError, Result};

/// Parse comma-separated text with a header row into a [`RawTable`].
pub fn read_csv(bytes: &[u8]) -> Result<RawTable> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| KpiError::load(format!("not UTF-8 text: {}", e)))?;
    let text = strip_bom(text);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| KpiError::load(format!("invalid CSV header: {}", e)))?
        .iter()
        .map(clean_str)
        .collect();
    trace!(?headers, "csv headers");

    let mut rows = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec.map_err(|e| KpiError::load(format!("invalid CSV row: {}", e)))?;
        // header is line 1
        let line = rec
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(i + 2);
        let cells = rec.iter().map(Cell::text).collect();
        rows.push(RawRow { line, cells });
    }

    debug!(columns = headers.len(), rows = rows.len(), "parsed CSV");
    Ok(RawTable { headers, rows })
}
