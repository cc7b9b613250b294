//! Rendering column tables back to text

use crate::error::{Error, Result};
use crate::reader::Format;
use crate::table::ColumnTable;
use std::fs;
use std::path::PathBuf;

/// Render a table in the given format
pub fn render(table: &ColumnTable, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(to_text(table)),
        Format::Csv => to_csv(table),
        Format::Json => to_json(table),
    }
}

/// Write a table to `path`, choosing the format from its extension
pub fn write_table(table: &ColumnTable, path: &str) -> Result<()> {
    let text = render(table, Format::from_name(path))?;
    fs::write(path, text).map_err(|e| Error::FileWrite {
        path: PathBuf::from(path),
        source: e,
    })
}

/// Written in place of the cells a short column doesn't have
pub const MISSING: &str = "nan";

fn format_value(value: f64) -> String {
    if value.is_nan() {
        return MISSING.to_string();
    }
    value.to_string()
}

/// Rows of formatted cells; short columns are padded with `MISSING`
fn cells(table: &ColumnTable) -> Vec<Vec<String>> {
    (0..table.row_count())
        .map(|row| {
            table
                .content
                .values()
                .map(|values| match values.get(row) {
                    Some(v) => format_value(*v),
                    None => MISSING.to_string(),
                })
                .collect()
        })
        .collect()
}

/// Whitespace-aligned text, each column right-aligned to its widest cell
pub fn to_text(table: &ColumnTable) -> String {
    if table.content.is_empty() {
        return String::new();
    }

    let rows = cells(table);
    let widths: Vec<usize> = table
        .content
        .keys()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .map(|row| row[i].len())
                .chain(std::iter::once(name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let mut push_line = |fields: Vec<&str>| {
        let line: Vec<String> = fields
            .iter()
            .zip(&widths)
            .map(|(field, width)| format!("{:>width$}", field, width = width))
            .collect();
        out.push_str(&line.join("  "));
        out.push('\n');
    };

    push_line(table.names().collect());
    for row in &rows {
        push_line(row.iter().map(String::as_str).collect());
    }
    out
}

fn csv_err(source: csv::Error) -> Error {
    Error::Csv {
        path: PathBuf::from("<output>"),
        source,
    }
}

/// Comma-separated text with a header row
pub fn to_csv(table: &ColumnTable) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if !table.content.is_empty() {
        writer.write_record(table.names()).map_err(csv_err)?;
        for row in cells(table) {
            writer.write_record(&row).map_err(csv_err)?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Pretty JSON object of name -> array
pub fn to_json(table: &ColumnTable) -> Result<String> {
    let mut json = serde_json::to_string_pretty(&table.content)?;
    json.push('\n');
    Ok(json)
}

/// Human-readable listing: index, name, length and range of every column
pub fn list_headers(table: &ColumnTable) -> String {
    let name_width = table.names().map(str::len).chain(std::iter::once(4)).max().unwrap_or(4);
    let mut out = format!(
        "{:>3}  {:<name_width$}  {:>6}  {:>12}  {:>12}\n",
        "col",
        "name",
        "length",
        "min",
        "max",
        name_width = name_width
    );
    for (i, (name, values)) in table.content.iter().enumerate() {
        let min = values.iter().copied().reduce(f64::min);
        let max = values.iter().copied().reduce(f64::max);
        let show = |v: Option<f64>| v.map(format_value).unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:>3}  {:<name_width$}  {:>6}  {:>12}  {:>12}\n",
            i + 1,
            name,
            values.len(),
            show(min),
            show(max),
            name_width = name_width
        ));
    }
    out
}

/// One column name per line
pub fn header_list(table: &ColumnTable) -> String {
    table.names().map(|name| format!("{}\n", name)).collect()
}

/// Write every column to its own `<prefix><name>.txt` file
pub fn burst(table: &ColumnTable, prefix: &str) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (name, values) in &table.content {
        let mut single = ColumnTable::default();
        single.content.insert(name.clone(), values.clone());

        let path = PathBuf::from(format!("{}{}.txt", prefix, name));
        fs::write(&path, to_text(&single)).map_err(|e| Error::FileWrite {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "wrote column");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_table_str;
    use crate::table::columns;

    fn sample() -> ColumnTable {
        ColumnTable::new(columns(&[("a", &[1.0, 2.5, 30.0]), ("long_name", &[-1.0, 0.0, 1.0])]))
    }

    #[test]
    fn test_to_text_alignment() {
        let text = to_text(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  a  long_name");
        assert_eq!(lines[1], "  1         -1");
        assert_eq!(lines[2], "2.5          0");
        assert_eq!(lines[3], " 30          1");
    }

    #[test]
    fn test_ragged_columns_are_padded() {
        let table = ColumnTable::new(columns(&[("x", &[1.0, 2.0]), ("m", &[5.0])]));
        let csv = to_csv(&table).unwrap();
        assert_eq!(csv, "x,m\n1,5\n2,nan\n");
    }

    #[test]
    fn test_ragged_text_output_reads_back() {
        let table = ColumnTable::new(columns(&[("x", &[1.0, 2.0]), ("m", &[1.5])]));
        let text = to_text(&table);
        assert_eq!(text, "x    m\n1  1.5\n2  nan\n");

        let reread = read_table_str(&text, "out.txt", None).unwrap();
        assert_eq!(reread.content["x"], vec![1.0, 2.0]);
        assert_eq!(reread.content["m"][0], 1.5);
        assert!(reread.content["m"][1].is_nan());

        let reread = read_table_str(&to_csv(&table).unwrap(), "out.csv", None).unwrap();
        assert!(reread.content["m"][1].is_nan());
    }

    #[test]
    fn test_text_output_reads_back() {
        let table = sample();
        let text = to_text(&table);
        let reread = read_table_str(&text, "out.txt", None).unwrap();
        assert_eq!(reread.content, table.content);

        let csv = to_csv(&table).unwrap();
        let reread = read_table_str(&csv, "out.csv", None).unwrap();
        assert_eq!(reread.content, table.content);
    }

    #[test]
    fn test_json_output() {
        let table = ColumnTable::new(columns(&[("x", &[1.0, 2.0])]));
        let json: serde_json::Value = serde_json::from_str(&to_json(&table).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"x": [1.0, 2.0]}));
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        let table = ColumnTable::default();
        assert_eq!(to_text(&table), "");
        assert_eq!(to_csv(&table).unwrap(), "");
    }

    #[test]
    fn test_header_listings() {
        let table = sample();
        assert_eq!(header_list(&table), "a\nlong_name\n");

        let listing = list_headers(&table);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("a") && lines[1].contains("30"));
        assert!(lines[2].trim_start().starts_with("2  long_name"));
    }

    #[test]
    fn test_burst_writes_one_file_per_column() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = format!("{}/col_", dir.path().display());

        let written = burst(&sample(), &prefix).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[1].ends_with("col_long_name.txt"));

        let content = std::fs::read_to_string(&written[0]).unwrap();
        let reread = read_table_str(&content, "col_a.txt", None).unwrap();
        assert_eq!(reread.content, columns(&[("a", &[1.0, 2.5, 30.0])]));
    }
}
