//! Configuration settings for SortDir
//!
//! Defines the command-line surface, the runtime configuration, and their
//! defaults.

use crate::core::SortKey;
use crate::error::{Result, SortDirError};
use crate::fs::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SortDir - collect every file in a tree, sort, and copy flat into one directory
#[derive(Parser, Debug, Clone)]
#[command(name = "sortdir")]
#[command(author = "SortDir Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Copy every file in a directory tree, sorted by name or size, into one flat directory")]
#[command(long_about = r#"
SortDir walks SOURCE recursively, collects every regular file (symlinks and
special files are skipped), orders them by the chosen key and copies them into
DESTINATION without any subdirectories. When two files share a name the later
one is written as "name (1)", "name (2)", and so on.

Sort keys:
  1  ascending size, ties by name
  2  name: letters and digits only, case-insensitive

Examples:
  sortdir ./photos 1 ./flat          # smallest files first
  sortdir ./docs 2 /tmp/out -p       # by name, with progress
  sortdir ./src 2 ./out --summary json
"#)]
pub struct CliArgs {
    /// Source directory to scan
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Sort key: 1 = size, 2 = name
    #[arg(value_name = "SORT_KEY", allow_negative_numbers = true)]
    pub sort_key: String,

    /// Destination directory (created with mode 0700 if missing)
    #[arg(value_name = "DESTINATION")]
    pub destination: PathBuf,

    /// Copy chunk size (e.g., 512, 4K, 1M)
    #[arg(long, default_value = "512", value_name = "SIZE")]
    pub chunk_size: String,

    /// Show progress during the copy pass
    #[arg(short = 'p', long)]
    pub progress: bool,

    /// Print a run summary after completion
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub summary: Option<OutputFormat>,

    /// Verbose logging (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Output format for the run summary
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyConfig {
    /// Source directory
    pub source: PathBuf,
    /// Destination directory
    pub destination: PathBuf,
    /// Ordering for the whole run
    pub sort_key: SortKey,
    /// Copy chunk size in bytes
    pub chunk_size: usize,
    /// Show progress bars
    pub progress: bool,
    /// Summary to print after the run
    pub summary: Option<OutputFormat>,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            sort_key: SortKey::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            progress: false,
            summary: None,
        }
    }
}

/// Parse human-readable size string to bytes
pub fn parse_size(size: &str) -> std::result::Result<u64, String> {
    let size = size.trim().to_uppercase();

    if size.is_empty() {
        return Err("Empty size string".to_string());
    }

    let (num_str, multiplier) = if size.ends_with("GB") || size.ends_with('G') {
        (size.trim_end_matches(|c| c == 'G' || c == 'B'), 1024u64 * 1024 * 1024)
    } else if size.ends_with("MB") || size.ends_with('M') {
        (size.trim_end_matches(|c| c == 'M' || c == 'B'), 1024u64 * 1024)
    } else if size.ends_with("KB") || size.ends_with('K') {
        (size.trim_end_matches(|c| c == 'K' || c == 'B'), 1024u64)
    } else if size.ends_with('B') {
        (size.trim_end_matches('B'), 1u64)
    } else {
        // Assume bytes if no suffix
        (size.as_str(), 1u64)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {}", num_str))?;

    if !num.is_finite() || num < 0.0 {
        return Err(format!("Invalid number: {}", num_str));
    }

    Ok((num * multiplier as f64) as u64)
}

impl CopyConfig {
    /// Create config from CLI arguments.
    ///
    /// Only validates; touches no files, so a bad sort key never creates the
    /// destination.
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let sort_key: SortKey = args.sort_key.parse()?;

        let chunk_size = parse_size(&args.chunk_size)
            .map_err(|e| SortDirError::config(format!("Invalid chunk size: {}", e)))?;
        if chunk_size == 0 {
            return Err(SortDirError::config("Chunk size must be at least 1 byte"));
        }
        let chunk_size = usize::try_from(chunk_size)
            .ok()
            .filter(|&size| size <= MAX_CHUNK_SIZE)
            .ok_or_else(|| {
                SortDirError::config(format!(
                    "Chunk size {} exceeds the {} byte limit",
                    args.chunk_size, MAX_CHUNK_SIZE
                ))
            })?;

        Ok(Self {
            source: args.source.clone(),
            destination: args.destination.clone(),
            sort_key,
            chunk_size,
            progress: args.progress,
            summary: args.summary,
        })
    }
}
