//! finsimple-core: table model, cleaning pipeline, metrics, chart binding and
//! the analysis prompt. Pure code, no I/O.

pub mod cell;
pub mod chart;
pub mod cleaner;
pub mod coerce;
pub mod metrics;
pub mod prompt;
pub mod table;

pub use cell::{Cell, NA_TOKENS};
pub use chart::{bind_chart, BoundChart, ChartData, ChartError, ChartKind, ChartSpec, PieSlice};
pub use cleaner::{clean, normalize_column_name, DATE_COLUMN, NUMERIC_ROLE_COLUMNS};
pub use metrics::Metrics;
pub use prompt::build_prompt;
pub use table::{Column, Table, TableError};
