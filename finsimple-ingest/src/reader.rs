//! Parse uploaded CSV files into raw tables.
//!
//! The first record is the header. Fields are kept verbatim as text except for
//! the usual "no value" spellings, which become missing cells. No type
//! inference happens here; that is the cleaner's job.

use anyhow::{bail, Context, Result};
use finsimple_core::{Cell, Table};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const BOM: char = '\u{feff}';

/// Parse a CSV file from disk.
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_csv(file).with_context(|| format!("parsing {}", path.display()))
}

/// Parse CSV from any reader.
pub fn read_csv<R: Read>(input: R) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(input);

    let mut records = rdr.records();

    let headers: Vec<String> = match records.next() {
        Some(header) => header
            .context("reading header row")?
            .iter()
            .enumerate()
            .map(|(i, h)| header_name(i, h))
            .collect(),
        None => return Ok(Table::default()),
    };
    let width = headers.len();

    let mut rows = Vec::new();
    for (i, result) in records.enumerate() {
        // Line 1 is the header.
        let line = i + 2;
        let record = result.with_context(|| format!("reading line {line}"))?;
        if record.len() > width {
            bail!(
                "line {line}: expected {width} fields, saw {}",
                record.len()
            );
        }
        rows.push(record.iter().map(Cell::from_field).collect::<Vec<_>>());
    }

    debug!(columns = width, rows = rows.len(), "read csv");

    Ok(Table::from_rows(headers, rows)?)
}

/// Header text as written, minus a leading byte-order mark. Blank headers get
/// positional placeholder names.
fn header_name(index: usize, raw: &str) -> String {
    let name = if index == 0 {
        raw.trim_start_matches(BOM)
    } else {
        raw
    };
    if name.trim().is_empty() {
        format!("Unnamed: {index}")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_header_and_rows() {
        let csv = "Date ,Amount,Notes\n2024-01-05,100,x\n2024-01-01,abc,y\n,,\n";
        let t = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(t.column_names(), vec!["Date ", "Amount", "Notes"]);
        assert_eq!(t.row_count(), 3);
        assert_eq!(t.column("Amount").unwrap().cells[1], Cell::Text("abc".into()));
        assert!(t.columns().iter().all(|c| c.cells[2].is_missing()));
    }

    #[test]
    fn test_na_tokens_and_short_rows() {
        let csv = "a,b,c\nNA,N/A,\n1\n";
        let t = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(t.row_count(), 2);
        assert!(t.columns().iter().all(|c| c.cells[0].is_missing()));
        let second: Vec<_> = t.columns().iter().map(|c| &c.cells[1]).collect();
        assert_eq!(second, vec![&Cell::Text("1".into()), &Cell::Missing, &Cell::Missing]);
    }

    #[test]
    fn test_rejects_wide_rows() {
        let err = read_csv("a,b\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2: expected 2 fields, saw 3"), "{err}");
    }

    #[test]
    fn test_empty_input() {
        let t = read_csv("".as_bytes()).unwrap();
        assert!(t.is_empty());
    }

    #[test]
    fn test_header_cleanup() {
        let csv = "\u{feff}Date,,Amount\n2024-01-01,x,1\n";
        let t = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(t.column_names(), vec!["Date", "Unnamed: 1", "Amount"]);
    }

    #[test]
    fn test_quoted_fields() {
        let csv = "Description,Amount\n\"Coffee, large\",3.50\n";
        let t = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(
            t.column("Description").unwrap().cells[0],
            Cell::Text("Coffee, large".into())
        );
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = read_csv_path("/definitely/not/here.csv").unwrap_err();
        assert!(err.to_string().contains("opening /definitely/not/here.csv"));
    }
}
