//! File system module
//!
//! Path building, entry classification, the recursive walker, and the
//! single-file copy operations used by the flat copy pass.

mod entry;
mod operations;
pub mod path;
mod scanner;

pub use entry::*;
pub use operations::*;
pub use path::join_path;
pub use scanner::*;
