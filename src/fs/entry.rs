//! Entry classification and the discovered-file record

use crate::error::{IoResultExt, Result};
use crate::fs::path::{is_pseudo_entry, join_path};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// What a directory entry turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory to descend into
    Directory,
    /// A regular file with its byte length at classification time
    RegularFile {
        /// File size in bytes
        size: u64,
    },
    /// Symlink, device, socket, fifo, or a pseudo-entry
    Other,
}

/// Classify `name` inside `parent` without following symlinks.
///
/// `.` and `..` come back as [`EntryKind::Other`] with no I/O. A failed status
/// query (permission denied, entry vanished) is returned as an error for the
/// caller to report.
pub fn classify(parent: &Path, name: &OsStr) -> Result<EntryKind> {
    if is_pseudo_entry(name) {
        return Ok(EntryKind::Other);
    }

    let path = join_path(parent, name);
    let metadata = std::fs::symlink_metadata(&path).with_path(&path)?;
    let file_type = metadata.file_type();

    let kind = if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::RegularFile {
            size: metadata.len(),
        }
    } else {
        EntryKind::Other
    };

    tracing::trace!("classified {} as {:?}", path.display(), kind);
    Ok(kind)
}

/// One regular file found during the walk.
///
/// A snapshot: `size` is what the status query reported at discovery and is
/// not re-read when the file is copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Directory containing the file
    parent_path: PathBuf,
    /// Base name within `parent_path`
    #[serde(serialize_with = "serialize_os_str")]
    name: OsString,
    /// File size in bytes
    size: u64,
}

impl FileRecord {
    /// Create a record
    pub fn new(parent_path: impl Into<PathBuf>, name: impl Into<OsString>, size: u64) -> Self {
        Self {
            parent_path: parent_path.into(),
            name: name.into(),
            size,
        }
    }

    /// Directory containing the file
    pub fn parent_path(&self) -> &Path {
        &self.parent_path
    }

    /// Base name of the file
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// Base name as text, with invalid UTF-8 replaced
    pub fn name_lossy(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }

    /// Size in bytes at discovery
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Full path of the source file
    pub fn path(&self) -> PathBuf {
        join_path(&self.parent_path, &self.name)
    }
}

fn serialize_os_str<S: Serializer>(name: &OsString, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&name.to_string_lossy())
}
