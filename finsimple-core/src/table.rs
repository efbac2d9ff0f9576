//! Column-oriented table shared by the raw and cleaned stages.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell::{format_number, Cell};

#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("column '{name}' has {found} cells, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("row {row} has {found} fields, expected {expected}")]
    RowTooWide {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Every cell is missing (vacuously true for a zero-row column).
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_missing)
    }

    /// At least one number, and nothing but numbers among the present cells.
    pub fn is_numeric(&self) -> bool {
        let mut any = false;
        for cell in &self.cells {
            match cell {
                Cell::Number(_) => any = true,
                c if c.is_missing() => {}
                _ => return false,
            }
        }
        any
    }

    /// Present numeric values, in row order.
    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().filter_map(Cell::as_number)
    }

    /// Display strings for every cell.
    ///
    /// Dates are rendered per column: date-only when every value sits on
    /// midnight, full date-time otherwise.
    pub fn formatted(&self) -> Vec<String> {
        let date_only = self
            .cells
            .iter()
            .filter_map(Cell::as_date)
            .all(|d| is_midnight(&d));

        self.cells
            .iter()
            .map(|cell| match cell {
                Cell::Missing => String::new(),
                Cell::Text(s) => s.clone(),
                Cell::Number(n) => format_number(*n),
                Cell::Date(d) if date_only => d.format("%Y-%m-%d").to_string(),
                Cell::Date(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
            })
            .collect()
    }
}

fn is_midnight(d: &NaiveDateTime) -> bool {
    d.num_seconds_from_midnight() == 0 && d.nanosecond() == 0
}

/// Ordered, rectangular collection of named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableRepr")]
pub struct Table {
    columns: Vec<Column>,
}

/// Wire shape of [`Table`]; deserialized input goes through `from_columns`.
#[derive(Deserialize)]
struct TableRepr {
    columns: Vec<Column>,
}

impl TryFrom<TableRepr> for Table {
    type Error = TableError;

    fn try_from(repr: TableRepr) -> Result<Self, Self::Error> {
        Table::from_columns(repr.columns)
    }
}

impl Table {
    /// Build a table from columns, rejecting ragged input.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, TableError> {
        if let Some(first) = columns.first() {
            let expected = first.cells.len();
            if let Some(bad) = columns.iter().find(|c| c.cells.len() != expected) {
                return Err(TableError::RaggedColumn {
                    name: bad.name.clone(),
                    expected,
                    found: bad.cells.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Build a table from a header and row-major cells. Short rows are padded
    /// with missing cells; rows wider than the header are rejected.
    pub fn from_rows<H, R>(headers: H, rows: R) -> Result<Self, TableError>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = Vec<Cell>>,
    {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|h| Column::new(h, Vec::new()))
            .collect();
        let width = columns.len();

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(TableError::RowTooWide {
                    row: i,
                    expected: width,
                    found: row.len(),
                });
            }
            let found = row.len();
            for (col, cell) in columns.iter_mut().zip(row) {
                col.cells.push(cell);
            }
            for col in columns.iter_mut().skip(found) {
                col.cells.push(Cell::Missing);
            }
        }

        Ok(Self { columns })
    }

    /// Convenience for tests and fixtures: every field goes through
    /// [`Cell::from_field`].
    pub fn from_fields<'a, R>(headers: &[&str], rows: &[R]) -> Result<Self, TableError>
    where
        R: AsRef<[&'a str]>,
    {
        Self::from_rows(
            headers.iter().copied(),
            rows.iter().map(|r| {
                r.as_ref()
                    .iter()
                    .map(|f| Cell::from_field(f))
                    .collect::<Vec<Cell>>()
            }),
        )
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// First column with this exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0 && self.column_count() == 0
    }

    /// Columns whose present cells are all numbers.
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_numeric()).collect()
    }
}
