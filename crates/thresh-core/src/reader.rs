//! Readers turning tabular text files into column tables
//!
//! Three formats are understood, picked by extension:
//! - whitespace-delimited text with a header line (a leading `#` is dropped)
//! - `.csv`, comma-delimited with a header row
//! - `.json`, an object of name -> number or array, loaded namespace-only

use crate::error::{Error, Result};
use crate::table::{ColumnTable, Columns};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name used for standard input
pub const STDIN: &str = "-";

/// On-disk layout of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Csv,
    Json,
}

impl Format {
    /// Detect the format from a file name; `-.csv` style names work for stdin
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            Format::Csv
        } else if lower.ends_with(".json") {
            Format::Json
        } else {
            Format::Text
        }
    }
}

/// Whether `name` refers to standard input (`-` or `-.<ext>`)
pub fn is_stdin(name: &str) -> bool {
    name == STDIN || name.starts_with("-.")
}

/// Read a table from a file, or from stdin for `-` / `-.<ext>`
pub fn read_table<P: AsRef<Path>>(path: P, alias: Option<&str>) -> Result<ColumnTable> {
    let path = path.as_ref();
    let name = path.to_string_lossy();

    let content = if is_stdin(&name) {
        std::io::read_to_string(std::io::stdin()).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?
    } else {
        fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?
    };

    let table = read_table_str(&content, &name, alias)?;
    tracing::debug!(
        source = %name,
        columns = table.column_count(),
        rows = table.row_count(),
        "read table"
    );
    Ok(table)
}

/// Parse table content held in memory; `source_name` selects the format
pub fn read_table_str(content: &str, source_name: &str, alias: Option<&str>) -> Result<ColumnTable> {
    let path = PathBuf::from(source_name);
    let mut table = match Format::from_name(source_name) {
        Format::Text => ColumnTable::new(parse_text(content, &path)?),
        Format::Csv => ColumnTable::new(parse_csv(content, &path)?),
        Format::Json => ColumnTable::new(parse_json(content)?).namespace_only(true),
    };
    table.alias = alias.map(str::to_string);
    Ok(table)
}

fn parse_value(field: &str, path: &Path, line: usize, column: &str) -> Result<f64> {
    field.trim().parse::<f64>().map_err(|_| Error::Parse {
        path: path.to_path_buf(),
        line,
        message: format!("column '{}': '{}' is not a number", column, field),
    })
}

fn empty_columns(headers: &[String], path: &Path, line: usize) -> Result<Columns> {
    let mut columns = Columns::new();
    for name in headers {
        if columns.insert(name.clone(), Vec::new()).is_some() {
            return Err(Error::Parse {
                path: path.to_path_buf(),
                line,
                message: format!("duplicate column name '{}'", name),
            });
        }
    }
    Ok(columns)
}

/// Whitespace-delimited text with a header line
pub fn parse_text(content: &str, path: &Path) -> Result<Columns> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let Some((header_line, header)) = lines.next() else {
        return Ok(Columns::new());
    };
    let headers: Vec<String> = header
        .trim_start_matches('#')
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let mut columns = empty_columns(&headers, path, header_line)?;

    for (line_number, line) in lines {
        if line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != headers.len() {
            return Err(Error::Parse {
                path: path.to_path_buf(),
                line: line_number,
                message: format!(
                    "expected {} fields, found {}",
                    headers.len(),
                    fields.len()
                ),
            });
        }
        for ((name, values), field) in columns.iter_mut().zip(fields) {
            values.push(parse_value(field, path, line_number, name)?);
        }
    }

    Ok(columns)
}

/// Comma-delimited text with a header row
pub fn parse_csv(content: &str, path: &Path) -> Result<Columns> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?
        .iter()
        .map(str::to_string)
        .collect();
    let mut columns = empty_columns(&headers, path, 1)?;

    for result in csv_reader.records() {
        let record = result.map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        for ((name, values), field) in columns.iter_mut().zip(record.iter()) {
            values.push(parse_value(field, path, line, name)?);
        }
    }

    Ok(columns)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonColumn {
    Scalar(f64),
    Array(Vec<f64>),
}

/// JSON object of name -> number or array of numbers
pub fn parse_json(content: &str) -> Result<Columns> {
    let raw: IndexMap<String, JsonColumn> = serde_json::from_str(content)?;
    Ok(raw
        .into_iter()
        .map(|(name, column)| {
            let values = match column {
                JsonColumn::Scalar(v) => vec![v],
                JsonColumn::Array(values) => values,
            };
            (name, values)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::columns;
    use std::io::Write;

    #[test]
    fn test_parse_text_with_commented_header() {
        let text = "# time  temp\n0 1.5\n1 2.5\n\n# trailing note\n2 3.5\n";
        let table = read_table_str(text, "data.txt", None).unwrap();

        assert_eq!(
            table.content,
            columns(&[("time", &[0.0, 1.0, 2.0]), ("temp", &[1.5, 2.5, 3.5])])
        );
        assert!(!table.namespace_only);
    }

    #[test]
    fn test_parse_text_field_count_mismatch() {
        let err = read_table_str("a b\n1 2\n3\n", "bad.txt", None).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn test_parse_text_non_numeric() {
        let err = read_table_str("a\nfoo\n", "bad.txt", None).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let err = read_table_str("a a\n1 2\n", "dup.txt", None).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_parse_csv() {
        let csv = "x, y\n1, 2\n3, 4.5e1\n";
        let table = read_table_str(csv, "data.csv", Some("A")).unwrap();

        assert_eq!(table.content, columns(&[("x", &[1.0, 3.0]), ("y", &[2.0, 45.0])]));
        assert_eq!(table.alias.as_deref(), Some("A"));
    }

    #[test]
    fn test_parse_csv_ragged_row() {
        let err = read_table_str("x,y\n1,2\n3\n", "data.csv", None).unwrap_err();
        assert!(matches!(err, Error::Csv { .. }));
    }

    #[test]
    fn test_parse_json_is_namespace_only() {
        let json = r#"{"limit": 5, "points": [1, 2, 3]}"#;
        let table = read_table_str(json, "params.json", None).unwrap();

        assert!(table.namespace_only);
        assert_eq!(
            table.content,
            columns(&[("limit", &[5.0]), ("points", &[1.0, 2.0, 3.0])])
        );
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_name("-"), Format::Text);
        assert_eq!(Format::from_name("-.csv"), Format::Csv);
        assert_eq!(Format::from_name("RESULTS.CSV"), Format::Csv);
        assert_eq!(Format::from_name("p.json"), Format::Json);
        assert!(is_stdin("-.csv"));
        assert!(!is_stdin("file.txt"));
    }

    #[test]
    fn test_read_table_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "a b\n1 2").unwrap();

        let table = read_table(file.path(), Some("F")).unwrap();
        assert_eq!(table.content, columns(&[("a", &[1.0]), ("b", &[2.0])]));
        assert_eq!(table.alias.as_deref(), Some("F"));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_table("/definitely/not/here.txt", None).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
