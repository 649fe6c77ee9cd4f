//! Delimited-text codec for the flat-file format and the CSV export.
//!
//! The format is a fixed 15-column layout (see [`Field::ALL`]) with standard
//! quoting: fields containing commas, double quotes, or newlines are wrapped
//! in double quotes, with embedded quotes doubled. UTF-8 throughout.

use crate::error::ValidationError;
use crate::field::Field;
use crate::model::{parse_timestamp, SurveyRecord};

/// Errors produced while decoding the flat-file format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CsvError {
    /// A quoted field was never closed.
    #[error("unterminated quoted field at record {0}")]
    UnterminatedQuote(usize),

    /// A record has the wrong number of columns.
    #[error("record {index} has {found} columns, expected {expected}")]
    ColumnCount {
        index: usize,
        found: usize,
        expected: usize,
    },

    /// A value failed to parse into its field's representation.
    #[error("record {index}: {source}")]
    Value {
        index: usize,
        source: ValidationError,
    },
}

/// The header line: all column names in wire order.
pub fn header() -> String {
    let names: Vec<&str> = Field::ALL.iter().map(|f| f.column_name()).collect();
    names.join(",")
}

/// Encode one record as a single CSV line (no trailing newline).
pub fn encode_record(record: &SurveyRecord) -> String {
    let cells: Vec<String> = Field::ALL
        .iter()
        .map(|field| quote(&record.get(*field)))
        .collect();
    cells.join(",")
}

/// Decode a whole file body (header line included) into records.
///
/// Returns one entry per data record; individually malformed records come
/// back as `Err` so callers can skip them without discarding the rest of
/// the file. An empty or header-only body yields no entries.
pub fn decode(body: &str) -> Vec<Result<SurveyRecord, CsvError>> {
    let mut rows = match split_records(body) {
        Ok(rows) => rows,
        Err(err) => return vec![Err(err)],
    };

    if rows.is_empty() {
        return Vec::new();
    }
    // Drop the header row.
    rows.remove(0);

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| decode_row(index, &row))
        .collect()
}

fn decode_row(index: usize, cells: &[String]) -> Result<SurveyRecord, CsvError> {
    if cells.len() != Field::ALL.len() {
        return Err(CsvError::ColumnCount {
            index,
            found: cells.len(),
            expected: Field::ALL.len(),
        });
    }

    let submitted_at = parse_timestamp(&cells[0]).ok_or_else(|| CsvError::Value {
        index,
        source: ValidationError::InvalidValue {
            field: Field::SubmittedAt,
            value: cells[0].clone(),
        },
    })?;

    let mut record = SurveyRecord {
        id: None,
        submitted_at,
        report_name: String::new(),
        periodicity: String::new(),
        source_system: String::new(),
        responsible: String::new(),
        responsible_email: String::new(),
        audit_usage: String::new(),
        audit_periodicity: None,
        department: String::new(),
        criticality: String::new(),
        delivery_formats: None,
        description: None,
        stakeholders: None,
        automation: None,
        observations: None,
        created_at: None,
        updated_at: None,
    };

    for (field, cell) in Field::ALL.iter().zip(cells.iter()).skip(1) {
        record
            .set(*field, cell)
            .map_err(|source| CsvError::Value { index, source })?;
    }

    Ok(record)
}

fn quote(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

/// Split a body into records of cells, honoring quoted fields that may
/// contain delimiters and newlines.
fn split_records(body: &str) -> Result<Vec<Vec<String>>, CsvError> {
    let mut records = Vec::new();
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = body.chars().peekable();
    let mut any_content = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        cell.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                other => cell.push(other),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                any_content = true;
            }
            ',' => {
                cells.push(std::mem::take(&mut cell));
                any_content = true;
            }
            '\r' => {
                // Swallow; the \n that follows (if any) ends the record.
            }
            '\n' => {
                if any_content || !cell.is_empty() {
                    cells.push(std::mem::take(&mut cell));
                    records.push(std::mem::take(&mut cells));
                }
                any_content = false;
            }
            other => {
                cell.push(other);
                any_content = true;
            }
        }
    }

    if in_quotes {
        return Err(CsvError::UnterminatedQuote(records.len()));
    }
    if any_content || !cell.is_empty() {
        cells.push(cell);
        records.push(cells);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SurveyRecord {
        SurveyRecord {
            id: None,
            submitted_at: parse_timestamp("2024-03-01 10:30:00").unwrap(),
            report_name: "Ventas, región \"Norte\"".into(),
            periodicity: "Mensual".into(),
            source_system: "SAP".into(),
            responsible: "Ana Gómez".into(),
            responsible_email: "ana@example.com".into(),
            audit_usage: "línea 1\nlínea 2".into(),
            audit_periodicity: None,
            department: "Finanzas".into(),
            criticality: "Alto".into(),
            delivery_formats: Some("Excel, PDF".into()),
            description: None,
            stakeholders: None,
            automation: Some("No".into()),
            observations: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn header_has_fifteen_columns() {
        assert_eq!(header().split(',').count(), 15);
        assert!(header().starts_with("fecha_envio,nombre_reporte"));
    }

    #[test]
    fn quoting_survives_delimiters_quotes_and_newlines() {
        let record = sample();
        let body = format!("{}\n{}\n", header(), encode_record(&record));
        let decoded = decode(&body);
        assert_eq!(decoded.len(), 1);
        let restored = decoded[0].as_ref().unwrap();
        assert_eq!(restored.report_name, record.report_name);
        assert_eq!(restored.audit_usage, record.audit_usage);
        assert_eq!(restored.delivery_formats, record.delivery_formats);
    }

    #[test]
    fn empty_body_and_header_only_yield_nothing() {
        assert!(decode("").is_empty());
        assert!(decode(&format!("{}\n", header())).is_empty());
    }

    #[test]
    fn malformed_record_is_isolated() {
        let good = encode_record(&sample());
        let body = format!("{}\nnot,enough,columns\n{good}\n", header());
        let decoded = decode(&body);
        assert_eq!(decoded.len(), 2);
        assert!(matches!(decoded[0], Err(CsvError::ColumnCount { .. })));
        assert!(decoded[1].is_ok());
    }

    #[test]
    fn bad_timestamp_is_a_value_error() {
        let mut line = encode_record(&sample());
        line = line.replacen("2024-03-01 10:30:00", "mañana", 1);
        let body = format!("{}\n{line}\n", header());
        let decoded = decode(&body);
        assert!(matches!(decoded[0], Err(CsvError::Value { .. })));
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let body = format!("{}\r\n{}\r\n", header(), encode_record(&sample()));
        let decoded = decode(&body);
        assert_eq!(decoded.len(), 1);
        assert!(decoded[0].is_ok());
    }
}
