//! Cleaning pipeline: raw uploaded table -> normalized table.
//!
//! Steps run in a fixed order, each over the whole table:
//! 1. drop rows where every cell is missing
//! 2. drop columns where every cell is missing
//! 3. normalize column names (trim, lower-case, spaces -> `_`)
//! 4. coerce `date` columns to date/times
//! 5. coerce `amount`, `balance`, `debit`, `credit` columns to numbers
//! 6. stable sort by the first `date` column, missing dates last
//!
//! The pipeline never fails. Unreadable cells become `Cell::Missing`.
//! Columns whose names collide after normalization are all kept, in order;
//! coercion applies to each of them and lookups resolve to the first.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::cell::Cell;
use crate::coerce::{parse_date, parse_number};
use crate::table::{Column, Table};

/// Name of the column that is parsed as dates and used for ordering.
pub const DATE_COLUMN: &str = "date";

/// Columns parsed as numbers.
pub const NUMERIC_ROLE_COLUMNS: [&str; 4] = ["amount", "balance", "debit", "credit"];

/// Normalize a header: trim, lower-case, replace spaces with underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Clean a raw table into its normalized form.
pub fn clean(raw: &Table) -> Table {
    let rows: Vec<usize> = (0..raw.row_count())
        .filter(|&r| raw.columns().iter().any(|c| !c.cells[r].is_missing()))
        .collect();

    let mut columns: Vec<Column> = raw
        .columns()
        .iter()
        .map(|c| Column::new(&*c.name, rows.iter().map(|&r| c.cells[r].clone()).collect()))
        .filter(|c| !c.is_empty())
        .map(normalize_column)
        .collect();

    debug!(
        dropped_rows = raw.row_count() - rows.len(),
        dropped_columns = raw.column_count() - columns.len(),
        "dropped empty rows and columns"
    );

    if let Some(order) = date_order(&columns) {
        for col in columns.iter_mut() {
            col.cells = order.iter().map(|&i| col.cells[i].clone()).collect();
        }
    }

    // Every column carries the same (filtered) row count.
    Table::from_columns(columns).unwrap_or_default()
}

fn normalize_column(col: Column) -> Column {
    let name = normalize_column_name(&col.name);
    let cells = if name == DATE_COLUMN {
        coerce_cells(col.cells, |c| parse_date(c).map(Cell::Date))
    } else if NUMERIC_ROLE_COLUMNS.contains(&name.as_str()) {
        coerce_cells(col.cells, |c| parse_number(c).map(Cell::Number))
    } else {
        col.cells
    };
    Column::new(name, cells)
}

fn coerce_cells(cells: Vec<Cell>, parse: impl Fn(&Cell) -> Option<Cell>) -> Vec<Cell> {
    cells
        .iter()
        .map(|c| parse(c).unwrap_or(Cell::Missing))
        .collect()
}

/// Row permutation that sorts by the first date column, if there is one.
fn date_order(columns: &[Column]) -> Option<Vec<usize>> {
    let dates = columns.iter().find(|c| c.name == DATE_COLUMN)?;
    let mut order: Vec<usize> = (0..dates.cells.len()).collect();
    // `sort_by` is stable, so ties keep their input order.
    order.sort_by(|&a, &b| cmp_missing_last(dates.cells[a].as_date(), dates.cells[b].as_date()));
    Some(order)
}

fn cmp_missing_last(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
