use crate::error::Result;

/// Renders CSV rows as `header: value, header: value` lines.
pub struct CsvExtractor;

impl CsvExtractor {
    pub fn extract(bytes: &[u8]) -> Result<String> {
        let bytes = strip_bom(bytes);
        let raw = String::from_utf8_lossy(bytes).into_owned();

        if raw.trim().is_empty() {
            return Ok(raw);
        }

        let delimiter = detect_delimiter(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(bytes);

        let headers = match reader.headers() {
            Ok(headers) => headers.iter().map(|h| h.trim().to_string()).collect::<Vec<_>>(),
            Err(e) => {
                tracing::debug!(error = %e, "CSV headers unreadable, keeping raw text");
                return Ok(raw);
            }
        };

        let mut lines = Vec::new();
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    tracing::debug!(error = %e, "CSV record unreadable, keeping raw text");
                    return Ok(raw);
                }
            };

            let line = record
                .iter()
                .enumerate()
                .map(|(i, value)| {
                    let key = headers
                        .get(i)
                        .filter(|h| !h.is_empty())
                        .cloned()
                        .unwrap_or_else(|| format!("column_{}", i + 1));
                    format!("{key}: {value}")
                })
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(line);
        }

        if lines.is_empty() {
            return Ok(raw);
        }

        Ok(lines.join("\n"))
    }
}

/// Strip UTF-8 BOM if present
fn strip_bom(bytes: &[u8]) -> &[u8] {
    if bytes.len() >= 3 && bytes[0..3] == [0xEF, 0xBB, 0xBF] {
        &bytes[3..]
    } else {
        bytes
    }
}

/// Picks the delimiter that yields the most consistent multi-column layout.
fn detect_delimiter(bytes: &[u8]) -> u8 {
    let candidates = [b',', b';', b'\t'];
    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delimiter in &candidates {
        let score = evaluate_delimiter(bytes, delimiter);
        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}

fn evaluate_delimiter(bytes: &[u8], delimiter: u8) -> usize {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let mut column_counts: Vec<usize> = Vec::new();

    if let Ok(headers) = reader.headers() {
        column_counts.push(headers.len());
    }

    for record in reader.records().take(5).flatten() {
        column_counts.push(record.len());
    }

    let Some(&first_count) = column_counts.first() else {
        return 0;
    };

    let consistent = column_counts.iter().all(|&c| c == first_count);
    let has_multiple_columns = first_count > 1;

    if consistent && has_multiple_columns {
        first_count * 10
    } else if has_multiple_columns {
        first_count
    } else {
        0
    }
}
