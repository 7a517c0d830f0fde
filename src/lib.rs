//! # SortDir - Sorted Flattening Copy
//!
//! SortDir recursively scans a source directory, collects every regular file
//! at any depth, orders the files by name or by size, and copies them into a
//! single destination directory. The subdirectory structure is dropped and
//! name collisions are resolved with `" (N)"` suffixes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sortdir::core::{flatten_copy, SortKey};
//! use std::path::Path;
//!
//! let result = flatten_copy(
//!     Path::new("/source"),
//!     Path::new("/destination"),
//!     SortKey::BySize,
//! ).unwrap();
//!
//! println!("Copied {} files ({} bytes)", result.files_copied, result.bytes_copied);
//! ```
//!
//! ## Building Blocks
//!
//! ```no_run
//! use sortdir::core::{FlatCopier, SortKey, SortedFileCollector};
//! use sortdir::fs::{CopyOptions, DirectoryWalker};
//! use sortdir::progress::Diagnostics;
//! use std::path::Path;
//!
//! let diagnostics = Diagnostics::new("sortdir");
//! let mut collector = SortedFileCollector::new(SortKey::ByName);
//!
//! DirectoryWalker::new(&diagnostics)
//!     .walk(Path::new("/source"), &mut collector)
//!     .unwrap();
//!
//! let pass = FlatCopier::new(CopyOptions::default(), &diagnostics)
//!     .copy_all(collector.records(), Path::new("/destination"));
//! println!("{} copied, {} failed", pass.copied.len(), pass.failures.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod fs;
pub mod progress;

// Re-export commonly used types
pub use crate::config::{CopyConfig, OutputFormat};
pub use crate::core::{CopyEngine, CopyResult, SortKey};
pub use crate::error::{Result, SortDirError};
pub use crate::progress::{Diagnostics, ProgressReporter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use sortdir::prelude::*;
    //! ```

    pub use crate::config::{CopyConfig, OutputFormat};
    pub use crate::core::{flatten_copy, ByName, BySize, CopyEngine, CopyResult, FileComparator, FlatCopier, SortKey, SortedFileCollector};
    pub use crate::error::{Result, SortDirError};
    pub use crate::fs::{classify, CopyOptions, DirectoryWalker, EntryKind, FileCopier, FileRecord};
    pub use crate::progress::{Diagnostics, ProgressReporter};
}
