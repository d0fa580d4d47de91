//! Report rendering and roster export.

pub mod csv;
pub mod generator;

pub use csv::write_csv;
pub use generator::{build_report, generate_json_report, generate_markdown_report};
