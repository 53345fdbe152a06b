//! Delimited-text loader with delimiter and storage detection.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::table::{Series, Table};
use super::value::{StorageKind, Value};
use crate::error::{AssayError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Lines sampled for delimiter detection.
const DETECTION_LINES: usize = 10;

// Cheap gate before handing a cell to chrono.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap(), // ISO date
        Regex::new(r"^\d{2}/\d{2}/\d{4}").unwrap(), // US date
        Regex::new(r"^\d{4}/\d{2}/\d{2}").unwrap(), // Alt ISO
    ]
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the input has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Loads CSV/TSV-like text into a [`Table`].
///
/// Missing-value tokens become nulls, and each column gets the narrowest
/// storage every present cell fits: integer, float, boolean, date-time, or
/// generic object storage holding strings.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Read and parse a file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Table> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|e| AssayError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse_bytes(&contents)
    }

    pub fn parse_str(&self, text: &str) -> Result<Table> {
        self.parse_bytes(text.as_bytes())
    }

    /// Parse raw bytes.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Table> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };
        debug!(delimiter = %(delimiter as char).escape_default(), "parsing delimited text");

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(str::to_string).collect()
        } else {
            Vec::new()
        };

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in reader.records() {
            if self.config.max_rows.is_some_and(|max| rows.len() >= max) {
                break;
            }
            let record = result?;
            if headers.is_empty() {
                headers = (1..=record.len()).map(|i| format!("column_{i}")).collect();
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        if headers.is_empty() {
            return Err(AssayError::EmptyData("No columns found".to_string()));
        }
        if rows.is_empty() {
            return Err(AssayError::EmptyData("No data rows found".to_string()));
        }

        let mut table = Table::new();
        for (idx, name) in headers.into_iter().enumerate() {
            let cells: Vec<&str> = rows.iter().map(|row| row[idx].as_str()).collect();
            let series = build_series(&cells);
            debug!(column = %name, storage = ?series.storage(), "detected column storage");
            table.insert_column(name, series)?;
        }
        Ok(table)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a cell represents a missing/null value.
pub fn is_null_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("nil")
        || trimmed == "."
        || trimmed == "-"
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if !DATE_PATTERNS.iter().any(|p| p.is_match(trimmed)) {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Pick the narrowest storage all present cells fit and convert them.
fn build_series(cells: &[&str]) -> Series {
    let present: Vec<&str> = cells
        .iter()
        .copied()
        .filter(|c| !is_null_value(c))
        .collect();

    // An all-missing column reads as floats, like a dataframe reader would.
    let storage = if present.is_empty() {
        StorageKind::Float
    } else if present.iter().all(|c| c.trim().parse::<i64>().is_ok()) {
        StorageKind::Integer
    } else if present.iter().all(|c| c.trim().parse::<f64>().is_ok()) {
        StorageKind::Float
    } else if present.iter().all(|c| parse_bool(c).is_some()) {
        StorageKind::Boolean
    } else if present.iter().all(|c| parse_datetime(c).is_some()) {
        StorageKind::DateTime
    } else {
        StorageKind::Object
    };

    let values = cells
        .iter()
        .map(|cell| {
            if is_null_value(cell) {
                return Value::Null;
            }
            let converted = match storage {
                StorageKind::Integer => cell.trim().parse::<i64>().ok().map(Value::Int),
                StorageKind::Float => cell.trim().parse::<f64>().ok().map(Value::Float),
                StorageKind::Boolean => parse_bool(cell).map(Value::Bool),
                StorageKind::DateTime => parse_datetime(cell).map(Value::DateTime),
                _ => Some(Value::Str((*cell).to_string())),
            };
            converted.unwrap_or(Value::Null)
        })
        .collect();

    Series::new(storage, values)
}

/// Detect the delimiter from the first few lines.
///
/// A delimiter that appears the same number of times on every line wins over
/// one with a varying count; tabs break ties since they rarely occur in data.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(DETECTION_LINES)
        .collect();

    if lines.is_empty() {
        return Err(AssayError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best = (b',', 0usize);
    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_unquoted(line, delim as char))
            .collect();
        let first = counts[0];
        if first == 0 {
            continue;
        }
        let score = if counts.iter().all(|&c| c == first) {
            first * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else {
            first
        };
        if score > best.1 {
            best = (delim, score);
        }
    }

    Ok(best.0)
}

/// Count delimiter occurrences outside double quotes.
fn count_unquoted(line: &str, delimiter: char) -> usize {
    let mut in_quotes = false;
    line.chars()
        .filter(|&ch| {
            if ch == '"' {
                in_quotes = !in_quotes;
            }
            ch == delimiter && !in_quotes
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        assert_eq!(detect_delimiter(b"a,b,c\n1,2,3\n4,5,6").unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        assert_eq!(detect_delimiter(b"a\tb\tc\n1\t2\t3\n4\t5\t6").unwrap(), b'\t');
    }

    #[test]
    fn test_quoted_delimiters_ignored() {
        assert_eq!(count_unquoted("\"a,b\",c", ','), 1);
    }

    #[test]
    fn test_storage_detection() {
        let table = Parser::new()
            .parse_str(
                "id,score,flag,seen,name\n\
                 1,0.5,true,2024-01-02,alice\n\
                 2,NA,false,2024-01-03 10:00:00,bob\n\
                 3,1.5,yes,2024-01-04,carol\n",
            )
            .unwrap();

        assert_eq!(table.column("id").unwrap().storage(), StorageKind::Integer);
        assert_eq!(table.column("score").unwrap().storage(), StorageKind::Float);
        assert_eq!(table.column("flag").unwrap().storage(), StorageKind::Boolean);
        assert_eq!(table.column("seen").unwrap().storage(), StorageKind::DateTime);
        assert_eq!(table.column("name").unwrap().storage(), StorageKind::Object);
        assert_eq!(table.column("score").unwrap().get(1), Some(&Value::Null));
    }

    #[test]
    fn test_all_missing_column_reads_as_float() {
        let table = Parser::new().parse_str("a,b\n1,\n2,NA\n").unwrap();
        let b = table.column("b").unwrap();
        assert_eq!(b.storage(), StorageKind::Float);
        assert_eq!(b.non_missing_count(), 0);
    }

    #[test]
    fn test_headerless_input() {
        let parser = Parser::with_config(ParserConfig {
            has_header: false,
            ..ParserConfig::default()
        });
        let table = parser.parse_str("x,1\ny,2\n").unwrap();
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_header_only_is_empty() {
        let err = Parser::new().parse_str("a,b\n").unwrap_err();
        assert!(matches!(err, AssayError::EmptyData(_)));
    }

    #[test]
    fn test_is_null_value() {
        assert!(is_null_value(""));
        assert!(is_null_value("NA"));
        assert!(is_null_value("n/a"));
        assert!(is_null_value("NULL"));
        assert!(is_null_value("."));
        assert!(!is_null_value("value"));
        assert!(!is_null_value("0"));
    }
}
