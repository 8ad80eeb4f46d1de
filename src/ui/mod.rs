//! Terminal output

pub mod report;

pub use report::{colored_summary, comparison_table};
