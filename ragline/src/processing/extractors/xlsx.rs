use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

use crate::error::{RagError, Result};

/// Extracts spreadsheet rows (xls and xlsx) as `header: value` lines, using
/// the first row of each sheet as the header.
pub struct XlsxExtractor;

impl XlsxExtractor {
    const MAX_ROWS: usize = 100_000;

    pub fn extract(bytes: &[u8]) -> Result<String> {
        let cursor = Cursor::new(bytes);
        let mut workbook = open_workbook_auto_from_rs(cursor)
            .map_err(|e| RagError::Extraction(format!("Spreadsheet parse error: {e}")))?;

        let sheets = workbook.worksheets();
        let multiple_sheets = sheets.len() > 1;
        let mut lines: Vec<String> = Vec::new();

        for (name, range) in sheets {
            if multiple_sheets {
                lines.push(format!("--- Sheet: {name} ---"));
            }

            let (rows, cols) = range.get_size();
            if rows == 0 || cols == 0 {
                continue;
            }

            let headers: Vec<String> = (0..cols)
                .map(|col| {
                    let header = Self::format_cell_value(range.get_value((0, col as u32)));
                    if header.is_empty() {
                        format!("column_{}", col + 1)
                    } else {
                        header
                    }
                })
                .collect();

            for row in 1..rows.min(Self::MAX_ROWS) {
                let cells: Vec<String> = (0..cols)
                    .map(|col| Self::format_cell_value(range.get_value((row as u32, col as u32))))
                    .collect();

                if cells.iter().all(|cell| cell.is_empty()) {
                    continue;
                }

                let line = headers
                    .iter()
                    .zip(cells.iter())
                    .map(|(header, cell)| format!("{header}: {cell}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                lines.push(line);
            }

            if rows > Self::MAX_ROWS {
                tracing::warn!(
                    sheet = %name,
                    rows,
                    limit = Self::MAX_ROWS,
                    "Sheet truncated during extraction"
                );
            }
        }

        Ok(lines.join("\n"))
    }

    fn format_cell_value(cell: Option<&Data>) -> String {
        match cell {
            Some(Data::String(s)) => s.clone(),
            Some(Data::Int(i)) => i.to_string(),
            Some(Data::Float(f)) => {
                let s = format!("{f}");
                if s.contains('.') {
                    s.trim_end_matches('0').trim_end_matches('.').to_string()
                } else {
                    s
                }
            }
            Some(Data::Bool(b)) => b.to_string(),
            Some(Data::DateTime(dt)) => dt.to_string(),
            Some(Data::DateTimeIso(dt)) => dt.to_string(),
            Some(Data::DurationIso(d)) => d.to_string(),
            Some(Data::Empty) | None => String::new(),
            _ => String::new(),
        }
    }
}
