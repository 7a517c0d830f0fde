//! Diagnostic context for recoverable errors
//!
//! Carries the program name used as the line prefix and remembers every
//! report, so the run summary can list failures. Passed by reference to the
//! walker, copier and engine instead of living in process-wide state.

use crate::error::SortDirError;
use indicatif::MultiProgress;
use std::cell::RefCell;
use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default program name when argv[0] is unavailable
pub const DEFAULT_PROGRAM_NAME: &str = "sortdir";

/// A single reported problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Error description
    pub description: String,
    /// Offending path
    pub path: PathBuf,
}

/// Where diagnostic lines go
enum Sink {
    Stderr,
    Silent,
}

/// Diagnostic reporter threaded through the pipeline
pub struct Diagnostics {
    program: String,
    sink: Sink,
    /// Active progress bars; lines are printed above them instead of over them
    progress: RefCell<Option<MultiProgress>>,
    reported: RefCell<Vec<Diagnostic>>,
}

impl Diagnostics {
    /// Create a reporter writing to stderr
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            sink: Sink::Stderr,
            progress: RefCell::new(None),
            reported: RefCell::new(Vec::new()),
        }
    }

    /// Create a reporter that only records (for tests and embedding)
    pub fn silent(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            sink: Sink::Silent,
            progress: RefCell::new(None),
            reported: RefCell::new(Vec::new()),
        }
    }

    /// Derive the program name from argv[0]
    pub fn program_name_from(arg0: Option<&std::ffi::OsStr>) -> String {
        arg0.map(Path::new)
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_PROGRAM_NAME.to_string())
    }

    /// Route lines through `multi` while its bars are drawn
    pub fn attach_progress(&self, multi: MultiProgress) {
        *self.progress.borrow_mut() = Some(multi);
    }

    /// Go back to writing lines straight to stderr
    pub fn detach_progress(&self) {
        self.progress.borrow_mut().take();
    }

    /// Whether lines currently go through progress bars
    pub fn has_progress(&self) -> bool {
        self.progress.borrow().is_some()
    }

    /// Program name used as line prefix
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Report a problem as `<program>: <description> <path>`
    pub fn report(&self, description: impl Display, path: &Path) {
        let diagnostic = Diagnostic {
            description: description.to_string(),
            path: path.to_path_buf(),
        };

        if let Sink::Stderr = self.sink {
            let line = self.format_line(&diagnostic);
            // Nothing sensible to do if stderr itself is gone
            match self.progress.borrow().as_ref() {
                Some(multi) => {
                    let _ = multi.println(&line);
                }
                None => {
                    let _ = writeln!(std::io::stderr().lock(), "{}", line);
                }
            }
        }

        tracing::debug!(path = %diagnostic.path.display(), "{}", diagnostic.description);
        self.reported.borrow_mut().push(diagnostic);
    }

    /// Report an error, using its own path when it has one
    pub fn report_error(&self, error: &SortDirError, fallback_path: &Path) {
        let path = error.path().map(PathBuf::as_path).unwrap_or(fallback_path);
        self.report(error.description(), path);
    }

    /// Format a fatal error line, `<program>: <error>`
    pub fn fatal_line(&self, error: &SortDirError) -> String {
        format!("{}: {}", self.program, error)
    }

    /// Format a diagnostic the way it is written to stderr
    pub fn format_line(&self, diagnostic: &Diagnostic) -> String {
        format!("{}: {} {}", self.program, diagnostic.description, diagnostic.path.display())
    }

    /// Number of reports so far
    pub fn count(&self) -> usize {
        self.reported.borrow().len()
    }

    /// Copy of everything reported so far
    pub fn reported(&self) -> Vec<Diagnostic> {
        self.reported.borrow().clone()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM_NAME)
    }
}
