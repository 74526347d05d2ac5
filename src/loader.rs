//! CSV loading for load-test round results.
//!
//! The file must carry a header row with the fixed column names in
//! [`COLUMNS`]; any failure to read or coerce a row aborts the load.

use crate::model::{RawRecord, COLUMNS};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV file '{}' not found", .0.display())]
    NotFound(PathBuf),
    #[error("failed to open '{}'", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("required column '{0}' is missing from the header")]
    MissingColumn(&'static str),
    #[error("malformed row at line {line}: {reason}")]
    Malformed { line: u64, reason: String },
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Load every round from `path`, failing fast on a missing file or malformed content.
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let records = read_records(reader)?;
    debug!(path = %path.display(), rows = records.len(), "loaded load-test rounds");
    Ok(records)
}

/// Parse rounds from any reader configured with a header row.
pub fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<RawRecord>, LoadError> {
    let headers = reader.headers()?.clone();
    check_headers(&headers)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| LoadError::Malformed {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: describe(&e),
        })?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let record: RawRecord = row
            .deserialize(Some(&headers))
            .map_err(|e| LoadError::Malformed {
                line,
                reason: describe(&e),
            })?;
        validate(&record, line)?;
        records.push(record);
    }
    Ok(records)
}

fn check_headers(headers: &StringRecord) -> Result<(), LoadError> {
    for column in COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }
    Ok(())
}

fn validate(record: &RawRecord, line: u64) -> Result<(), LoadError> {
    for (column, value) in record.identifiers() {
        if value == 0 {
            return Err(LoadError::Malformed {
                line,
                reason: format!("column '{column}' must be a positive integer, got 0"),
            });
        }
    }
    for (column, value) in record.latencies() {
        if !value.is_finite() || value < 0.0 {
            return Err(LoadError::Malformed {
                line,
                reason: format!("column '{column}' must be a non-negative number, got {value}"),
            });
        }
    }
    Ok(())
}

fn describe(e: &csv::Error) -> String {
    match e.kind() {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(idx) => format!("field {} is not valid: {}", idx + 1, err.kind()),
            None => err.kind().to_string(),
        },
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} fields, found {len}"),
        _ => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Rodada, Servidores, Clientes, MensagensPorCliente, LatenciaMedia(ms), LatenciaMin(ms), LatenciaMax(ms), LatenciaMediana(ms), LatenciaStdDev(ms), Sucessos, Falhas";

    fn parse(text: &str) -> Result<Vec<RawRecord>, LoadError> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());
        read_records(reader)
    }

    #[test]
    fn parses_header_with_spaces() {
        let text = format!("{HEADER}\n1, 2, 10, 5, 12.50, 3.10, 40.00, 11.00, 4.20, 50, 0\n");
        let records = parse(&text).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.round, 1);
        assert_eq!(r.server_count, 2);
        assert_eq!(r.client_count, 10);
        assert_eq!(r.messages_per_client, 5);
        assert_eq!(r.latency_mean, 12.5);
        assert_eq!(r.success_count, 50);
        assert_eq!(r.failure_count, 0);
    }

    #[test]
    fn header_only_is_empty() {
        let records = parse(&format!("{HEADER}\n")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn preserves_row_order() {
        let text = format!(
            "{HEADER}\n3,1,10,1,1,1,1,1,0,10,0\n1,1,10,1,2,2,2,2,0,10,0\n2,1,10,1,3,3,3,3,0,10,0\n"
        );
        let rounds: Vec<u32> = parse(&text).unwrap().iter().map(|r| r.round).collect();
        assert_eq!(rounds, vec![3, 1, 2]);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let text = format!("{HEADER}, Notas\n1,1,10,1,1,1,1,1,0,10,0,warm\n");
        assert_eq!(parse(&text).unwrap().len(), 1);
    }

    #[test]
    fn missing_column_is_rejected() {
        let header = HEADER.replace(", Sucessos", "");
        let text = format!("{header}\n1,1,10,1,1,1,1,1,0,0\n");
        match parse(&text) {
            Err(LoadError::MissingColumn(col)) => assert_eq!(col, "Sucessos"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let text = format!("{HEADER}\n1,1,10,1,fast,1,1,1,0,10,0\n");
        match parse(&text) {
            Err(LoadError::Malformed { line, reason }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("field 5"), "{reason}");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn negative_latency_is_rejected() {
        let text = format!("{HEADER}\n1,1,10,1,-4,1,1,1,0,10,0\n");
        assert!(matches!(parse(&text), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn zero_scenario_field_is_rejected() {
        let text = format!("{HEADER}\n1,0,10,1,4,1,1,1,0,10,0\n");
        match parse(&text) {
            Err(LoadError::Malformed { line, reason }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("Servidores"), "{reason}");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
        let text = format!("{HEADER}\n0,1,10,1,4,1,1,1,0,10,0\n");
        assert!(matches!(parse(&text), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn zero_counts_are_accepted() {
        // A round where no client connected is recorded with zero successes and latencies.
        let text = format!("{HEADER}\n1,1,10,1,0,0,0,0,0,0,10\n");
        let records = parse(&text).unwrap();
        assert_eq!(records[0].success_count, 0);
        assert_eq!(records[0].failure_count, 10);
    }

    #[test]
    fn short_row_is_rejected() {
        let text = format!("{HEADER}\n1,1,10,1,4,1\n");
        assert!(matches!(parse(&text), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(matches!(load_records(&path), Err(LoadError::NotFound(_))));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(&path, format!("{HEADER}\n1,3,20,10,8.5,2,30,8,1.5,200,1\n")).unwrap();
        let records = load_records(&path).unwrap();
        assert_eq!(records[0].scenario().servers, 3);
        assert_eq!(records[0].failure_count, 1);
    }
}
