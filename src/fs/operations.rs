//! File operations
//!
//! Setup checks for the source and destination directories, and the
//! single-file copy used by the flat copy pass: exclusive create with
//! `" (N)"` collision suffixes, then a fixed-size chunked byte copy.

use crate::error::{IoResultExt, Result, SortDirError};
use crate::fs::path::{join_path, suffixed_name};
use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// Chunk size for the byte copy
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Largest chunk size accepted, since the buffer is allocated up front
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Collision suffixes tried before giving up on a file
pub const DEFAULT_MAX_COLLISIONS: u32 = 10_000;

/// Options for single-file copies
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Bytes read and written per chunk
    pub chunk_size: usize,
    /// Highest `N` tried for `" (N)"` suffixes
    pub max_collisions: u32,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_collisions: DEFAULT_MAX_COLLISIONS,
        }
    }
}

/// Outcome of one file copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyStats {
    /// Where the bytes ended up
    pub destination: PathBuf,
    /// Bytes copied
    pub bytes_copied: u64,
    /// Collision suffix used, if the plain name was taken
    pub collision_suffix: Option<u32>,
}

/// Copies single files into a flat destination directory
#[derive(Debug, Clone, Default)]
pub struct FileCopier {
    options: CopyOptions,
}

impl FileCopier {
    /// Create a copier with the given options
    pub fn new(options: CopyOptions) -> Self {
        Self { options }
    }

    /// Copy `source` into `dest_dir` under `name`, or the first free
    /// `"name (N)"` if that is taken.
    ///
    /// Nothing is rolled back on a mid-copy failure: bytes already written
    /// stay in the destination file.
    pub fn copy_into(&self, source: &Path, dest_dir: &Path, name: &OsStr) -> Result<CopyStats> {
        let mut input = File::open(source).with_path(source)?;
        let (mut output, destination, collision_suffix) = self.create_exclusive(dest_dir, name)?;

        let bytes_copied = self.copy_chunks(&mut input, source, &mut output, &destination)?;

        Ok(CopyStats {
            destination,
            bytes_copied,
            collision_suffix,
        })
    }

    /// Create a new file that did not exist before, trying suffixes on collision
    pub fn create_exclusive(&self, dest_dir: &Path, name: &OsStr) -> Result<(File, PathBuf, Option<u32>)> {
        let mut attempt = 0u32;

        loop {
            let candidate = if attempt == 0 {
                join_path(dest_dir, name)
            } else {
                join_path(dest_dir, &suffixed_name(name, attempt))
            };

            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(file) => {
                    if attempt > 0 {
                        tracing::debug!("name collision, using {}", candidate.display());
                    }
                    return Ok((file, candidate, (attempt > 0).then_some(attempt)));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if attempt >= self.options.max_collisions {
                        return Err(SortDirError::CollisionLimit {
                            path: join_path(dest_dir, name),
                            attempts: attempt,
                        });
                    }
                    attempt += 1;
                }
                Err(e) => return Err(SortDirError::io(candidate, e)),
            }
        }
    }

    /// Move bytes chunk by chunk until the reader is exhausted
    fn copy_chunks(
        &self,
        input: &mut impl Read,
        source: &Path,
        output: &mut impl Write,
        destination: &Path,
    ) -> Result<u64> {
        let mut buffer = vec![0u8; self.options.chunk_size.max(1)];
        let mut total = 0u64;

        loop {
            let read = match input.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(SortDirError::ReadFailed {
                        path: source.to_path_buf(),
                        source: e,
                    })
                }
            };

            output
                .write_all(&buffer[..read])
                .map_err(|e| SortDirError::WriteFailed {
                    path: destination.to_path_buf(),
                    source: e,
                })?;
            total += read as u64;
        }

        output.flush().map_err(|e| SortDirError::WriteFailed {
            path: destination.to_path_buf(),
            source: e,
        })?;

        Ok(total)
    }
}

/// Check the source directory and resolve it to a canonical absolute path
pub fn resolve_source(source: &Path) -> Result<PathBuf> {
    let metadata = std::fs::metadata(source).with_path(source)?;
    if !metadata.is_dir() {
        return Err(SortDirError::SourceNotDirectory(source.to_path_buf()));
    }

    // Opening for listing up front keeps an unreadable source from
    // creating the destination
    drop(std::fs::read_dir(source).with_path(source)?);

    source.canonicalize().with_path(source)
}

/// Make sure the destination is a writable directory, creating it with
/// owner-only permissions if absent, and resolve it to a canonical path
pub fn prepare_destination(destination: &Path) -> Result<PathBuf> {
    match std::fs::metadata(destination) {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(SortDirError::DestinationNotDirectory(destination.to_path_buf()));
            }
            check_writable(destination)?;
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            create_private_dir(destination)?;
            tracing::info!("created destination {}", destination.display());
        }
        Err(e) => return Err(SortDirError::io(destination, e)),
    }

    destination.canonicalize().with_path(destination)
}

#[cfg(unix)]
fn create_private_dir(path: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    std::fs::DirBuilder::new().mode(0o700).create(path).with_path(path)
}

#[cfg(not(unix))]
fn create_private_dir(path: &Path) -> Result<()> {
    std::fs::create_dir(path).with_path(path)
}

#[cfg(unix)]
fn check_writable(path: &Path) -> Result<()> {
    use nix::unistd::{access, AccessFlags};

    access(path, AccessFlags::W_OK | AccessFlags::X_OK)
        .map_err(|_| SortDirError::DestinationNotWritable(path.to_path_buf()))
}

#[cfg(not(unix))]
fn check_writable(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).with_path(path)?;
    if metadata.permissions().readonly() {
        return Err(SortDirError::DestinationNotWritable(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Reader that hands out some bytes, then fails
    struct FailingReader {
        remaining: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.remaining == 0 {
                return Err(std::io::Error::new(ErrorKind::Other, "disk on fire"));
            }
            let n = buf.len().min(self.remaining);
            buf[..n].fill(0xAA);
            self.remaining -= n;
            Ok(n)
        }
    }

    /// Writer that accepts a fixed number of bytes, then fails
    struct FailingWriter {
        accepted: Vec<u8>,
        capacity: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let room = self.capacity - self.accepted.len();
            if room == 0 {
                return Err(std::io::Error::new(ErrorKind::Other, "no space left"));
            }
            let n = buf.len().min(room);
            self.accepted.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_copy_into_plain_name() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let data: Vec<u8> = (0..2000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(src.path().join("data.bin"), &data).unwrap();

        let copier = FileCopier::default();
        let stats = copier
            .copy_into(&src.path().join("data.bin"), dst.path(), OsStr::new("data.bin"))
            .unwrap();

        assert_eq!(stats.bytes_copied, 2000);
        assert_eq!(stats.collision_suffix, None);
        assert_eq!(std::fs::read(dst.path().join("data.bin")).unwrap(), data);
    }

    #[test]
    fn test_collision_suffixes_use_base_name() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        std::fs::write(src.path().join("x.txt"), b"new").unwrap();
        std::fs::write(dst.path().join("x.txt"), b"old").unwrap();
        std::fs::write(dst.path().join("x.txt (1)"), b"old1").unwrap();

        let copier = FileCopier::default();
        let stats = copier
            .copy_into(&src.path().join("x.txt"), dst.path(), OsStr::new("x.txt"))
            .unwrap();

        assert_eq!(stats.collision_suffix, Some(2));
        assert_eq!(stats.destination, dst.path().join("x.txt (2)"));
        assert_eq!(std::fs::read(dst.path().join("x.txt")).unwrap(), b"old");
        assert_eq!(std::fs::read(dst.path().join("x.txt (2)")).unwrap(), b"new");
        assert!(!dst.path().join("x.txt (1) (1)").exists());
    }

    #[test]
    fn test_collision_limit() {
        let dst = TempDir::new().unwrap();
        std::fs::write(dst.path().join("f"), b"").unwrap();
        std::fs::write(dst.path().join("f (1)"), b"").unwrap();
        std::fs::write(dst.path().join("f (2)"), b"").unwrap();

        let copier = FileCopier::new(CopyOptions {
            max_collisions: 2,
            ..Default::default()
        });
        let err = copier.create_exclusive(dst.path(), OsStr::new("f")).unwrap_err();

        assert!(matches!(err, SortDirError::CollisionLimit { attempts: 2, .. }));
    }

    #[test]
    fn test_missing_source_creates_nothing() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();

        let err = FileCopier::default()
            .copy_into(&src.path().join("gone"), dst.path(), OsStr::new("gone"))
            .unwrap_err();

        assert_eq!(err.path().unwrap(), &src.path().join("gone"));
        assert!(!dst.path().join("gone").exists());
    }

    #[test]
    fn test_read_failure_keeps_partial_output() {
        let dst = TempDir::new().unwrap();
        let target = dst.path().join("partial");
        let mut output = File::create(&target).unwrap();
        let mut input = FailingReader { remaining: 1024 };

        let copier = FileCopier::default();
        let err = copier
            .copy_chunks(&mut input, Path::new("/src/partial"), &mut output, &target)
            .unwrap_err();
        drop(output);

        assert!(matches!(err, SortDirError::ReadFailed { .. }));
        assert_eq!(std::fs::metadata(&target).unwrap().len(), 1024);
    }

    #[test]
    fn test_write_failure_keeps_partial_output() {
        let mut input = std::io::Cursor::new(vec![7u8; 4096]);
        let mut output = FailingWriter {
            accepted: Vec::new(),
            capacity: 1000,
        };

        let err = FileCopier::default()
            .copy_chunks(&mut input, Path::new("/src/big"), &mut output, Path::new("/dst/big"))
            .unwrap_err();

        assert!(matches!(err, SortDirError::WriteFailed { ref path, .. } if path == Path::new("/dst/big")));
        assert_eq!(output.accepted.len(), 1000);
        assert!(output.accepted.iter().all(|&b| b == 7));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_to_full_device_fails() {
        let mut input = std::io::Cursor::new(vec![1u8; 2048]);
        let mut output = OpenOptions::new().write(true).open("/dev/full").unwrap();

        let err = FileCopier::default()
            .copy_chunks(&mut input, Path::new("/src/f"), &mut output, Path::new("/dev/full"))
            .unwrap_err();

        assert!(matches!(err, SortDirError::WriteFailed { .. }));
        assert_eq!(err.path().unwrap(), Path::new("/dev/full"));
    }

    #[test]
    fn test_empty_file_copy() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        std::fs::write(src.path().join("empty"), b"").unwrap();

        let stats = FileCopier::default()
            .copy_into(&src.path().join("empty"), dst.path(), OsStr::new("empty"))
            .unwrap();

        assert_eq!(stats.bytes_copied, 0);
        assert!(dst.path().join("empty").exists());
    }

    #[test]
    fn test_prepare_destination_creates_missing() {
        let base = TempDir::new().unwrap();
        let dest = base.path().join("out");

        let resolved = prepare_destination(&dest).unwrap();

        assert!(resolved.is_absolute());
        assert!(dest.is_dir());
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&dest).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o700);
        }
    }

    #[test]
    fn test_prepare_destination_rejects_file() {
        let base = TempDir::new().unwrap();
        let file = base.path().join("plain");
        std::fs::write(&file, b"x").unwrap();

        let err = prepare_destination(&file).unwrap_err();
        assert!(matches!(err, SortDirError::DestinationNotDirectory(_)));
    }

    #[test]
    fn test_prepare_destination_accepts_existing_dir() {
        let base = TempDir::new().unwrap();
        let resolved = prepare_destination(base.path()).unwrap();
        assert_eq!(resolved, base.path().canonicalize().unwrap());
    }

    #[test]
    fn test_resolve_source() {
        let base = TempDir::new().unwrap();
        assert!(resolve_source(base.path()).unwrap().is_absolute());

        let file = base.path().join("f");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(resolve_source(&file), Err(SortDirError::SourceNotDirectory(_))));
        assert!(resolve_source(&base.path().join("missing")).is_err());
    }
}
