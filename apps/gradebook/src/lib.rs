//! # gradebook
//!
//! Command-line front end for `gradebook-core`: argument parsing,
//! configuration and logging. The binary in `main.rs` only wires these up.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use config::{AppConfig, LogFormat, OutputFormat};
pub use error::AppError;
