//! Core copy pipeline module
//!
//! File ordering, the sorted collector, and the engine that walks the source
//! tree and then copies every file flat into the destination.

mod copier;
mod ordering;

pub use copier::*;
pub use ordering::*;
