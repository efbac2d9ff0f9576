//! Serialize tables back to CSV (exports and the analysis prompt).

use anyhow::{Context, Result};
use finsimple_core::Table;
use std::io::Write;

/// Write `table` as CSV: header row, then one record per row. Missing cells are
/// empty fields.
pub fn write_csv<W: Write>(table: &Table, out: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(out);

    if table.column_count() == 0 {
        return Ok(());
    }

    wtr.write_record(table.column_names())
        .context("writing header")?;

    let formatted: Vec<Vec<String>> = table.columns().iter().map(|c| c.formatted()).collect();
    for row in 0..table.row_count() {
        wtr.write_record(formatted.iter().map(|col| col[row].as_str()))
            .with_context(|| format!("writing row {row}"))?;
    }

    wtr.flush().context("flushing csv")?;
    Ok(())
}

pub fn to_csv_string(table: &Table) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    String::from_utf8(buf).context("csv output was not utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use finsimple_core::clean;

    #[test]
    fn test_cleaned_table_to_csv() {
        let raw = Table::from_fields(
            &["Date ", "Amount", "Notes"],
            &[
                &["2024-01-05", "100", "x, y"],
                &["2024-01-01", "abc", "y"],
                &["", "", ""],
            ],
        )
        .unwrap();
        let csv = to_csv_string(&clean(&raw)).unwrap();
        assert_eq!(
            csv,
            "date,amount,notes\n2024-01-01,,y\n2024-01-05,100.0,\"x, y\"\n"
        );
    }

    #[test]
    fn test_empty_table_writes_nothing() {
        assert_eq!(to_csv_string(&Table::default()).unwrap(), "");
    }

    #[test]
    fn test_header_only_table() {
        let t = Table::from_fields::<&[&str]>(&["a", "b"], &[]).unwrap();
        assert_eq!(to_csv_string(&t).unwrap(), "a,b\n");
    }
}
