//! Key metrics over the numeric columns of a cleaned table.

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Headline figures shown next to the cleaned table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Smallest value in any numeric column
    pub min: f64,
    /// Largest value in any numeric column
    pub max: f64,
    /// Mean of the per-column means, rounded to cents
    pub mean: f64,
    /// Number of columns that contributed
    pub columns: usize,
}

impl Metrics {
    /// Compute metrics across every numeric column.
    /// Returns `None` when the table has no numeric column.
    pub fn compute(table: &Table) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut means = Vec::new();

        for col in table.numeric_columns() {
            let mut sum = 0.0;
            let mut count = 0usize;
            for v in col.numbers() {
                min = min.min(v);
                max = max.max(v);
                sum += v;
                count += 1;
            }
            if count > 0 {
                means.push(sum / count as f64);
            }
        }

        if means.is_empty() {
            return None;
        }

        let mean = means.iter().sum::<f64>() / means.len() as f64;
        Some(Self {
            min,
            max,
            mean: round_cents(mean),
            columns: means.len(),
        })
    }
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::clean;

    #[test]
    fn test_metrics_across_columns() {
        let raw = Table::from_fields(
            &["Debit", "Credit", "Memo"],
            &[&["10", "", "a"], &["20", "5", "b"], &["", "1", "c"]],
        )
        .unwrap();
        let m = Metrics::compute(&clean(&raw)).unwrap();
        assert_eq!(m.min, 1.0);
        assert_eq!(m.max, 20.0);
        // debit mean 15, credit mean 3
        assert_eq!(m.mean, 9.0);
        assert_eq!(m.columns, 2);
    }

    #[test]
    fn test_mean_is_rounded() {
        let raw = Table::from_fields(&["amount"], &[&["1"], &["1"], &["2"]]).unwrap();
        let m = Metrics::compute(&clean(&raw)).unwrap();
        assert_eq!(m.mean, 1.33);
    }

    #[test]
    fn test_no_numeric_columns() {
        let raw = Table::from_fields(&["memo"], &[&["1"], &["2"]]).unwrap();
        assert_eq!(Metrics::compute(&clean(&raw)), None);
        assert_eq!(Metrics::compute(&Table::default()), None);
    }

    #[test]
    fn test_fully_unparseable_role_column_is_ignored() {
        let raw = Table::from_fields(&["amount", "memo"], &[&["abc", "x"]]).unwrap();
        assert_eq!(Metrics::compute(&clean(&raw)), None);
    }
}
