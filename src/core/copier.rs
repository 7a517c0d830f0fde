//! Main copy engine
//!
//! Two strictly sequential passes: walk the whole source tree into a sorted
//! collector, then copy every collected file, in order, flat into the
//! destination directory.

use crate::config::CopyConfig;
use crate::core::{SortKey, SortedFileCollector};
use crate::error::Result;
use crate::fs::{prepare_destination, resolve_source, CopyOptions, DirectoryWalker, FileCopier, FileRecord, WalkSummary};
use crate::progress::{Diagnostics, ProgressReporter};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// One file that made it into the destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedFile {
    /// Source file
    pub source: PathBuf,
    /// Destination file
    pub destination: PathBuf,
    /// Bytes written
    pub bytes: u64,
    /// Whether a collision suffix was needed
    pub renamed: bool,
}

/// Result of the copy pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct CopyPassResult {
    /// Files copied, in creation order
    pub copied: Vec<CopiedFile>,
    /// Failed files as (path, error)
    pub failures: Vec<(String, String)>,
}

impl CopyPassResult {
    /// Total bytes copied
    pub fn bytes_copied(&self) -> u64 {
        self.copied.iter().map(|c| c.bytes).sum()
    }

    /// Files that needed a collision suffix
    pub fn renamed(&self) -> usize {
        self.copied.iter().filter(|c| c.renamed).count()
    }
}

/// Copies an ordered sequence of files into one directory
pub struct FlatCopier<'a> {
    copier: FileCopier,
    diagnostics: &'a Diagnostics,
    progress: Option<&'a ProgressReporter>,
}

impl<'a> FlatCopier<'a> {
    /// Create a flat copier
    pub fn new(options: CopyOptions, diagnostics: &'a Diagnostics) -> Self {
        Self {
            copier: FileCopier::new(options),
            diagnostics,
            progress: None,
        }
    }

    /// Set progress reporter
    pub fn with_progress(mut self, progress: &'a ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Copy `records` in order into `dest_dir`, using only each base name.
    ///
    /// A file that fails is reported and skipped; earlier copies are kept.
    pub fn copy_all(&self, records: &[FileRecord], dest_dir: &Path) -> CopyPassResult {
        let mut result = CopyPassResult::default();

        for record in records {
            let source = record.path();
            if let Some(progress) = self.progress {
                progress.set_current_file(&record.name_lossy());
            }

            match self.copier.copy_into(&source, dest_dir, record.name()) {
                Ok(stats) => {
                    tracing::debug!(
                        "copied {} -> {} ({} bytes)",
                        source.display(),
                        stats.destination.display(),
                        stats.bytes_copied
                    );
                    if let Some(progress) = self.progress {
                        progress.increment_bytes(stats.bytes_copied);
                    }
                    result.copied.push(CopiedFile {
                        source,
                        destination: stats.destination,
                        bytes: stats.bytes_copied,
                        renamed: stats.collision_suffix.is_some(),
                    });
                }
                Err(e) => {
                    self.diagnostics.report_error(&e, &source);
                    result
                        .failures
                        .push((source.to_string_lossy().into_owned(), e.description()));
                }
            }

            if let Some(progress) = self.progress {
                progress.increment_files(1);
            }
        }

        result
    }
}

/// Copy operation result
#[derive(Debug, Clone, Serialize)]
pub struct CopyResult {
    /// Canonical source directory
    pub source: PathBuf,
    /// Canonical destination directory
    pub destination: PathBuf,
    /// Ordering used
    pub sort_key: SortKey,
    /// Walk counters
    pub walk: WalkSummary,
    /// Files copied
    pub files_copied: u64,
    /// Bytes copied
    pub bytes_copied: u64,
    /// Files written under a collision suffix
    pub files_renamed: u64,
    /// Copy failures as (path, error)
    pub failures: Vec<(String, String)>,
    /// Files in creation order
    pub copied: Vec<CopiedFile>,
    /// Total duration, setup and walk included
    #[serde(with = "duration_secs")]
    pub duration: Duration,
    /// Time spent in the copy pass alone
    #[serde(with = "duration_secs")]
    pub copy_duration: Duration,
    /// Copy pass throughput in bytes/second
    pub throughput: f64,
}

impl CopyResult {
    /// True when no file failed and no entry was dropped
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.walk.errors == 0
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        println!("\n=== Copy Summary ===");
        println!("Source:          {}", self.source.display());
        println!("Destination:     {}", self.destination.display());
        println!("Ordering:        {:?}", self.sort_key);
        println!("Files found:     {}", self.walk.files);
        println!("Directories:     {}", self.walk.directories);
        println!("Skipped entries: {}", self.walk.skipped);
        println!("Files copied:    {}", self.files_copied);
        println!("Renamed:         {}", self.files_renamed);
        println!("Bytes copied:    {}", humansize::format_size(self.bytes_copied, humansize::BINARY));
        println!("Duration:        {:.2?} (copy {:.2?})", self.duration, self.copy_duration);
        println!("Throughput:      {}/s", humansize::format_size(self.throughput as u64, humansize::BINARY));

        if self.walk.errors > 0 {
            println!("\nWalk errors: {}", self.walk.errors);
        }

        if !self.failures.is_empty() {
            println!("\nFailures: {}", self.failures.len());
            for (path, error) in &self.failures {
                println!("  {} - {}", path, error);
            }
        }
    }

    /// Summary as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| crate::error::SortDirError::config(e.to_string()))
    }
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }
}

/// Walk-then-copy pipeline
pub struct CopyEngine<'a> {
    /// Configuration
    config: CopyConfig,
    /// Diagnostic context
    diagnostics: &'a Diagnostics,
    /// Progress reporter
    progress: Option<ProgressReporter>,
}

impl<'a> CopyEngine<'a> {
    /// Create a new copy engine
    pub fn new(config: CopyConfig, diagnostics: &'a Diagnostics) -> Self {
        Self {
            config,
            diagnostics,
            progress: None,
        }
    }

    /// Set progress reporter
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Validate both directories, walk the source, then copy.
    ///
    /// Errors returned here are fatal. Per-entry and per-file problems go
    /// through the diagnostics and show up in the result instead.
    pub fn execute(&self) -> Result<CopyResult> {
        let start_time = Instant::now();

        if let Some(progress) = &self.progress {
            self.diagnostics.attach_progress(progress.multi());
        }

        let outcome = self.run_passes();

        self.diagnostics.detach_progress();
        if let Some(progress) = &self.progress {
            match &outcome {
                Ok(_) => progress.finish("Done"),
                Err(_) => progress.abandon("Failed"),
            }
        }

        let passes = outcome?;
        let duration = start_time.elapsed();
        let bytes_copied = passes.copy.bytes_copied();
        let throughput = if passes.copy_duration.as_secs_f64() > 0.0 {
            bytes_copied as f64 / passes.copy_duration.as_secs_f64()
        } else {
            0.0
        };

        Ok(CopyResult {
            source: passes.source,
            destination: passes.destination,
            sort_key: self.config.sort_key,
            walk: passes.walk,
            files_copied: passes.copy.copied.len() as u64,
            bytes_copied,
            files_renamed: passes.copy.renamed() as u64,
            failures: passes.copy.failures,
            copied: passes.copy.copied,
            duration,
            copy_duration: passes.copy_duration,
            throughput,
        })
    }

    fn run_passes(&self) -> Result<Passes> {
        let source = resolve_source(&self.config.source)?;
        let destination = prepare_destination(&self.config.destination)?;
        tracing::info!(
            "sorting {} by {:?} into {}",
            source.display(),
            self.config.sort_key,
            destination.display()
        );

        if let Some(progress) = &self.progress {
            progress.set_status("Scanning source directory...");
        }

        let mut collector = SortedFileCollector::new(self.config.sort_key);
        let walk = DirectoryWalker::new(self.diagnostics).walk(&source, &mut collector)?;

        if let Some(progress) = &self.progress {
            progress.set_total_files(collector.len() as u64);
            progress.set_total_bytes(collector.total_size());
        }

        let records = collector.into_records();
        let options = CopyOptions {
            chunk_size: self.config.chunk_size,
            ..Default::default()
        };
        let mut flat = FlatCopier::new(options, self.diagnostics);
        if let Some(progress) = &self.progress {
            flat = flat.with_progress(progress);
        }

        let copy_start = Instant::now();
        let copy = flat.copy_all(&records, &destination);
        let copy_duration = copy_start.elapsed();

        Ok(Passes {
            source,
            destination,
            walk,
            copy,
            copy_duration,
        })
    }
}

/// What the walk and copy passes produced
struct Passes {
    source: PathBuf,
    destination: PathBuf,
    walk: WalkSummary,
    copy: CopyPassResult,
    copy_duration: Duration,
}

/// Run a sort-and-flatten copy with default options and silent diagnostics
pub fn flatten_copy(source: &Path, dest: &Path, sort_key: SortKey) -> Result<CopyResult> {
    let config = CopyConfig {
        source: source.to_path_buf(),
        destination: dest.to_path_buf(),
        sort_key,
        ..Default::default()
    };

    let diagnostics = Diagnostics::silent(crate::progress::DEFAULT_PROGRAM_NAME);
    CopyEngine::new(config, &diagnostics).execute()
}
