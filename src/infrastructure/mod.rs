//! Infrastructure layer
//!
//! Configuration loading, logging setup and the completion service client.

pub mod completion;
pub mod config;
pub mod logging;
