//! Domain layer for the field report agent
//!
//! This module contains the report data model, the port traits the agent
//! talks through, and the domain error type.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
