//! Recursive directory walker
//!
//! Depth-first, single pass. Every entry is classified with a
//! symlink-non-following status query; directories are descended into and
//! regular files are handed to the collector. Problems below the root are
//! reported and the affected entry or subtree is skipped.

use crate::core::{FileComparator, SortedFileCollector};
use crate::error::{IoResultExt, Result};
use crate::fs::entry::{classify, EntryKind, FileRecord};
use crate::fs::path::{is_pseudo_entry, join_path};
use crate::progress::Diagnostics;
use serde::Serialize;
use std::ffi::OsStr;
use std::path::Path;
use std::time::{Duration, Instant};

/// Counters from one walk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalkSummary {
    /// Regular files handed to the collector
    pub files: u64,
    /// Directories listed, including the root
    pub directories: u64,
    /// Entries that were neither directory nor regular file
    pub skipped: u64,
    /// Entries or subtrees dropped because of an error
    pub errors: u64,
    /// Walk duration
    #[serde(skip)]
    pub duration: Duration,
}

/// Status query used to classify each `(parent, name)` entry
pub type Classifier = fn(&Path, &OsStr) -> Result<EntryKind>;

/// Walks a tree and feeds regular files into a collector
pub struct DirectoryWalker<'a> {
    diagnostics: &'a Diagnostics,
    classifier: Classifier,
}

impl<'a> DirectoryWalker<'a> {
    /// Create a walker reporting through `diagnostics`
    pub fn new(diagnostics: &'a Diagnostics) -> Self {
        Self {
            diagnostics,
            classifier: classify,
        }
    }

    /// Replace the status query, [`classify`] by default
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Walk `root`, inserting every regular file into `collector`.
    ///
    /// Failing to open `root` itself is returned as an error. Failures further
    /// down are reported and counted in the summary.
    pub fn walk<C: FileComparator>(
        &self,
        root: &Path,
        collector: &mut SortedFileCollector<C>,
    ) -> Result<WalkSummary> {
        let start = Instant::now();
        let mut summary = WalkSummary::default();

        let listing = std::fs::read_dir(root).with_path(root)?;
        self.visit_listing(root, listing, collector, &mut summary);

        summary.duration = start.elapsed();
        tracing::info!(
            "walked {}: {} files in {} directories ({} skipped, {} errors) in {:.2?}",
            root.display(),
            summary.files,
            summary.directories,
            summary.skipped,
            summary.errors,
            summary.duration
        );
        Ok(summary)
    }

    /// Open a subdirectory and visit it; failures skip the subtree
    fn visit_dir<C: FileComparator>(
        &self,
        dir: &Path,
        collector: &mut SortedFileCollector<C>,
        summary: &mut WalkSummary,
    ) {
        match std::fs::read_dir(dir).with_path(dir) {
            Ok(listing) => self.visit_listing(dir, listing, collector, summary),
            Err(e) => {
                self.diagnostics.report_error(&e, dir);
                summary.errors += 1;
            }
        }
    }

    /// Process one open listing. The `ReadDir` handle is dropped on return.
    fn visit_listing<C: FileComparator>(
        &self,
        dir: &Path,
        listing: std::fs::ReadDir,
        collector: &mut SortedFileCollector<C>,
        summary: &mut WalkSummary,
    ) {
        summary.directories += 1;
        tracing::debug!("entering {}", dir.display());

        for entry in listing {
            let entry = match entry.with_path(dir) {
                Ok(entry) => entry,
                Err(e) => {
                    self.diagnostics.report_error(&e, dir);
                    summary.errors += 1;
                    continue;
                }
            };

            let name = entry.file_name();
            if is_pseudo_entry(&name) {
                continue;
            }

            match (self.classifier)(dir, &name) {
                Ok(EntryKind::Directory) => {
                    self.visit_dir(&join_path(dir, &name), collector, summary);
                }
                Ok(EntryKind::RegularFile { size }) => {
                    collector.insert(FileRecord::new(dir, name, size));
                    summary.files += 1;
                }
                Ok(EntryKind::Other) => {
                    tracing::debug!("skipping non-regular entry {}", join_path(dir, &name).display());
                    summary.skipped += 1;
                }
                Err(e) => {
                    self.diagnostics.report_error(&e, &join_path(dir, &name));
                    summary.errors += 1;
                }
            }
        }
    }
}
