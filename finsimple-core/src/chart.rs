//! Chart binding: resolve a user's chart choice against a cleaned table.
//!
//! Rendering is left to the caller; this module only produces the data a
//! renderer needs (points or pie slices) and the title.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::table::Table;

#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("no numeric columns found to generate plots")]
    NoNumericColumns,

    #[error("column '{0}' not found")]
    UnknownColumn(String),

    #[error("column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("pie wedge sizes must be non-negative (group {group} sums to {total})")]
    NegativeWedge { group: f64, total: f64 },
}

/// Supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Area,
    Scatter,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Area,
        ChartKind::Scatter,
        ChartKind::Pie,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Bar => "Bar",
            ChartKind::Area => "Area",
            ChartKind::Scatter => "Scatter",
            ChartKind::Pie => "Pie",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown chart kind '{s}' (expected line, bar, area, scatter or pie)")
            })
    }
}

/// What the user picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub x: String,
    pub y: String,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            kind,
            x: x.into(),
            y: y.into(),
        }
    }

    /// Default selection: first numeric column on both axes, line chart.
    pub fn default_for(table: &Table) -> Option<Self> {
        let first = table.numeric_columns().into_iter().next()?;
        Some(Self::new(ChartKind::Line, &*first.name, &*first.name))
    }

    pub fn title(&self) -> String {
        format!("{} Plot of {} vs {}", self.kind, self.y, self.x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    /// Group key (the x value)
    pub label: f64,
    /// Sum of y over the group
    pub value: f64,
    /// Fraction of the total, 0.0 - 1.0
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartData {
    Points(Vec<(f64, f64)>),
    Slices(Vec<PieSlice>),
}

/// A chart ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundChart {
    pub spec: ChartSpec,
    pub title: String,
    pub data: ChartData,
}

/// Bind a chart selection to the table's data.
pub fn bind_chart(table: &Table, spec: &ChartSpec) -> Result<BoundChart, ChartError> {
    if table.numeric_columns().is_empty() {
        return Err(ChartError::NoNumericColumns);
    }
    let xs = numeric_cells(table, &spec.x)?;
    let ys = numeric_cells(table, &spec.y)?;

    let data = match spec.kind {
        ChartKind::Pie => ChartData::Slices(pie_slices(&xs, &ys)?),
        _ => ChartData::Points(
            xs.iter()
                .zip(&ys)
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .collect(),
        ),
    };

    Ok(BoundChart {
        spec: spec.clone(),
        title: spec.title(),
        data,
    })
}

fn numeric_cells(table: &Table, name: &str) -> Result<Vec<Option<f64>>, ChartError> {
    let col = table
        .column(name)
        .ok_or_else(|| ChartError::UnknownColumn(name.to_string()))?;
    if !col.is_numeric() {
        return Err(ChartError::NotNumeric(name.to_string()));
    }
    Ok(col.cells.iter().map(|c| c.as_number()).collect())
}

/// Group by x (ascending), sum y per group. Rows with a missing x are skipped;
/// missing y values add nothing.
fn pie_slices(xs: &[Option<f64>], ys: &[Option<f64>]) -> Result<Vec<PieSlice>, ChartError> {
    let mut pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, y.unwrap_or(0.0))))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut groups: Vec<(f64, f64)> = Vec::new();
    for (x, y) in pairs {
        match groups.last_mut() {
            Some((key, sum)) if *key == x => *sum += y,
            _ => groups.push((x, y)),
        }
    }

    if let Some(&(group, total)) = groups.iter().find(|(_, sum)| *sum < 0.0) {
        return Err(ChartError::NegativeWedge { group, total });
    }

    let total: f64 = groups.iter().map(|(_, sum)| sum).sum();
    Ok(groups
        .into_iter()
        .map(|(label, value)| PieSlice {
            label,
            value,
            share: if total > 0.0 { value / total } else { 0.0 },
        })
        .collect())
}
