//! Plain-text rendering of tables, metrics and bound charts.

use finsimple_core::cell::format_number;
use finsimple_core::{BoundChart, ChartData, Metrics, Table};
use std::fmt::Write;

/// Column-aligned preview of the first `limit` rows.
pub fn render_table(table: &Table, limit: usize) -> String {
    if table.column_count() == 0 {
        return "(empty table)\n".to_string();
    }

    let shown = table.row_count().min(limit);
    let cells: Vec<Vec<String>> = table
        .columns()
        .iter()
        .map(|c| c.formatted().into_iter().take(shown).collect())
        .collect();
    let widths: Vec<usize> = table
        .columns()
        .iter()
        .zip(&cells)
        .map(|(col, vals)| {
            vals.iter()
                .map(|v| v.chars().count())
                .chain(std::iter::once(col.name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<&str> = table.column_names();
    push_line(&mut out, header.iter().copied(), &widths);
    push_line(
        &mut out,
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().iter().map(String::as_str),
        &widths,
    );
    for row in 0..shown {
        push_line(&mut out, cells.iter().map(|col| col[row].as_str()), &widths);
    }

    let hidden = table.row_count() - shown;
    if hidden > 0 {
        let _ = writeln!(out, "... ({hidden} more rows)");
    }
    out
}

fn push_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = fields
        .zip(widths)
        .map(|(f, &w)| format!("{f:<w$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

pub fn columns_caption(table: &Table) -> String {
    format!("Columns detected: {}", table.column_names().join(", "))
}

pub fn render_metrics(metrics: Option<&Metrics>) -> String {
    match metrics {
        Some(m) => format!(
            "### Key Metrics\nMin Value:  {}\nMax Value:  {}\nMean Value: {}\n",
            format_number(m.min),
            format_number(m.max),
            format_number(m.mean),
        ),
        None => "No numeric columns found.\n".to_string(),
    }
}

pub fn render_chart(chart: &BoundChart) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "### {}", chart.title);
    let _ = writeln!(out, "x: {}  y: {}", chart.spec.x, chart.spec.y);

    match &chart.data {
        ChartData::Points(points) if points.is_empty() => {
            out.push_str("(no rows with both values present)\n");
        }
        ChartData::Points(points) => {
            for (x, y) in points {
                let _ = writeln!(out, "{}\t{}", format_number(*x), format_number(*y));
            }
        }
        ChartData::Slices(slices) if slices.is_empty() => {
            out.push_str("(no groups)\n");
        }
        ChartData::Slices(slices) => {
            for s in slices {
                let _ = writeln!(
                    out,
                    "{}\t{}\t{:.1}%",
                    format_number(s.label),
                    format_number(s.value),
                    s.share * 100.0
                );
            }
        }
    }
    out
}
