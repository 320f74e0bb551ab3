//! CLI command implementations.

pub mod config;
pub mod parse_table;
pub mod run;
