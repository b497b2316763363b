//! Line parser for availability test results.
//!
//! Each line holds eight space-separated fields:
//!
//! ```text
//! <year> <network> <station> <channel> <availability_pct> <minutes> <coverage_metric> <inventory_flag>
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{PlotError, Result};

const FIELD_COUNT: usize = 8;

/// One availability measurement for a single channel in a given year.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub year: i32,
    pub network: String,
    pub station: String,
    pub channel: String,
    pub availability_pct: f64,
    pub minutes: f64,
    pub coverage_metric: f64,
    pub inventory_flag: String,
}

fn field<T: FromStr>(raw: &str, name: &str, line: usize) -> Result<T> {
    raw.parse().map_err(|_| PlotError::Parse {
        line,
        reason: format!("{name} is not numeric: {raw:?}"),
    })
}

/// Parses a single record. `line` is the 1-based line number used in errors.
///
/// # Errors
///
/// Returns [`PlotError::Parse`] if the line does not have exactly eight
/// fields or a numeric field fails to parse.
pub fn parse_line(raw: &str, line: usize) -> Result<Record> {
    let raw = raw.trim_end_matches(['\n', '\r']);
    let fields: Vec<&str> = raw.split(' ').collect();
    if fields.len() != FIELD_COUNT {
        return Err(PlotError::Parse {
            line,
            reason: format!("expected {FIELD_COUNT} fields, found {}", fields.len()),
        });
    }

    Ok(Record {
        year: field(fields[0], "year", line)?,
        network: fields[1].to_string(),
        station: fields[2].to_string(),
        channel: fields[3].to_string(),
        availability_pct: field(fields[4], "availability_pct", line)?,
        minutes: field(fields[5], "minutes", line)?,
        coverage_metric: field(fields[6], "coverage_metric", line)?,
        inventory_flag: fields[7].to_string(),
    })
}

/// Reads every record from `reader`, stopping at the first malformed line.
///
/// Blank lines are skipped.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| PlotError::Io {
            path: "<input>".into(),
            source: e,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(parse_line(&line, idx + 1)?);
    }
    Ok(records)
}

/// Opens `path` and reads all records from it.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn read_records_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PlotError::from_io(path, e))?;
    let records = read_records(BufReader::new(file))?;
    debug!(records = records.len(), "Input parsed");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_valid_line() {
        let record = parse_line("2020 XX AA BHZ 50.0 100.0 50.0 GOOD", 1).unwrap();
        assert_eq!(record.year, 2020);
        assert_eq!(record.network, "XX");
        assert_eq!(record.station, "AA");
        assert_eq!(record.channel, "BHZ");
        assert_eq!(record.availability_pct, 50.0);
        assert_eq!(record.minutes, 100.0);
        assert_eq!(record.coverage_metric, 50.0);
        assert_eq!(record.inventory_flag, "GOOD");
    }

    #[test]
    fn test_parse_strips_line_ending() {
        let record = parse_line("2019 GE APE HHZ 99.5 525600 99.5 OK\r\n", 3).unwrap();
        assert_eq!(record.inventory_flag, "OK");
    }

    #[test]
    fn test_wrong_field_count() {
        let err = parse_line("2020 XX AA BHZ 50.0 100.0 50.0", 7).unwrap_err();
        match err {
            PlotError::Parse { line, reason } => {
                assert_eq!(line, 7);
                assert!(reason.contains("found 7"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_field() {
        let err = parse_line("2020 XX AA BHZ fifty 100.0 50.0 GOOD", 2).unwrap_err();
        assert!(matches!(err, PlotError::Parse { line: 2, .. }));

        let err = parse_line("20x0 XX AA BHZ 50.0 100.0 50.0 GOOD", 1).unwrap_err();
        assert!(matches!(err, PlotError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_read_records_fails_fast() {
        let input = "2020 XX AA BHZ 50.0 100.0 50.0 GOOD\nbroken line\n2021 XX AA BHZ 50.0 100.0 50.0 GOOD\n";
        let err = read_records(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, PlotError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_read_records_skips_blank_lines() {
        let input = "2020 XX AA BHZ 50.0 100.0 50.0 GOOD\n\n2021 YY BB BHZ 10.0 100.0 20.0 GOOD\n";
        let records = read_records(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].network, "YY");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_records_from_path(dir.path().join("results.txt")).unwrap_err();
        assert!(matches!(err, PlotError::FileNotFound { .. }));
    }
}
