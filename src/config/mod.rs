//! Configuration module for SortDir
//!
//! Command-line arguments and the runtime configuration derived from them.

mod settings;

pub use settings::*;
