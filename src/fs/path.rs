//! Path building helpers
//!
//! Pure functions, no I/O. Paths are owned and grow as needed, so there is
//! no maximum path length to guard against.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Join a parent directory and a child entry name
pub fn join_path(parent: &Path, name: &OsStr) -> PathBuf {
    let mut path = PathBuf::with_capacity(parent.as_os_str().len() + name.len() + 1);
    path.push(parent);
    path.push(name);
    path
}

/// Build the `"<name> (N)"` form used to dodge a name collision.
///
/// The suffix always goes on the original base name, never on an already
/// suffixed one, so attempt 2 is `"a.txt (2)"` and not `"a.txt (1) (2)"`.
pub fn suffixed_name(name: &OsStr, attempt: u32) -> OsString {
    let suffix = format!(" ({})", attempt);
    let mut out = OsString::with_capacity(name.len() + suffix.len());
    out.push(name);
    out.push(suffix);
    out
}

/// Check for the `.` and `..` pseudo-entries
pub fn is_pseudo_entry(name: &OsStr) -> bool {
    name == OsStr::new(".") || name == OsStr::new("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        let joined = join_path(Path::new("/src/sub"), OsStr::new("file.txt"));
        assert_eq!(joined, PathBuf::from("/src/sub/file.txt"));

        let relative = join_path(Path::new("rel"), OsStr::new("x"));
        assert_eq!(relative, PathBuf::from("rel/x"));
    }

    #[test]
    fn test_join_long_path() {
        let deep: PathBuf = (0..200).map(|i| format!("level{}", i)).collect();
        let joined = join_path(&deep, OsStr::new("leaf"));
        assert!(joined.as_os_str().len() > 1000);
        assert!(joined.ends_with("leaf"));
    }

    #[test]
    fn test_suffixed_name() {
        assert_eq!(suffixed_name(OsStr::new("x.txt"), 1), OsString::from("x.txt (1)"));
        assert_eq!(suffixed_name(OsStr::new("x.txt"), 12), OsString::from("x.txt (12)"));
        assert_eq!(suffixed_name(OsStr::new("noext"), 3), OsString::from("noext (3)"));
    }

    #[test]
    fn test_pseudo_entries() {
        assert!(is_pseudo_entry(OsStr::new(".")));
        assert!(is_pseudo_entry(OsStr::new("..")));
        assert!(!is_pseudo_entry(OsStr::new("...")));
        assert!(!is_pseudo_entry(OsStr::new(".hidden")));
    }
}
