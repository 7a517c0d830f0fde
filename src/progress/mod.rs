//! Progress and diagnostics module
//!
//! Progress bars for the copy pass and the diagnostic context that writes
//! per-entry error lines.

mod diagnostics;
mod reporter;

pub use diagnostics::*;
pub use reporter::*;
