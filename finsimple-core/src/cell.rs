//! Cell values: the tagged value stored at every (row, column) position.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Field spellings that mean "no value" in exported spreadsheets and bank CSVs.
pub const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// A single table cell.
///
/// Raw tables only carry `Text` and `Missing`; `Number` and `Date` appear after
/// the cleaner coerces the recognized columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Cell {
    Missing,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

impl Cell {
    /// Build a cell from a raw delimited-text field.
    pub fn from_field(field: &str) -> Self {
        if NA_TOKENS.contains(&field) {
            Cell::Missing
        } else {
            Cell::Text(field.to_string())
        }
    }

    /// True for the missing marker and for empty text.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(field: &str) -> Self {
        Cell::from_field(field)
    }
}

/// Render a number the way spreadsheet exports do: integral values keep a
/// trailing `.0`, everything else uses the shortest round-trip form.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.1}")
    } else {
        format!("{n}")
    }
}
