//! CLI output formatting

pub mod table;
