//! finsimple-ingest: CSV files in, raw tables out (and cleaned tables back to CSV).

pub mod reader;
pub mod writer;

pub use reader::{read_csv, read_csv_path};
pub use writer::{to_csv_string, write_csv};
