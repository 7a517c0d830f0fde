//! File ordering
//!
//! Two comparators over [`FileRecord`] and the collector that keeps discovered
//! files in comparator order as they arrive.

use crate::error::SortDirError;
use crate::fs::FileRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// A pure ascending ordering over file records
pub trait FileComparator {
    /// Compare two records
    fn compare(&self, a: &FileRecord, b: &FileRecord) -> Ordering;
}

/// Case-insensitive comparison of the letters and digits in the base name.
///
/// Non-alphanumeric characters are skipped. When one filtered stream runs out
/// first, or both run out together, the name with fewer raw characters sorts
/// first; equal raw lengths compare equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByName;

/// Ascending size, ties broken by [`ByName`]
#[derive(Debug, Clone, Copy, Default)]
pub struct BySize;

/// Compare two names the way [`ByName`] does
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase);
    let mut right = b.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase);

    loop {
        match (left.next(), right.next()) {
            (Some(l), Some(r)) if l != r => return l.cmp(&r),
            (Some(_), Some(_)) => continue,
            // Either stream exhausted: raw length decides
            _ => return a.chars().count().cmp(&b.chars().count()),
        }
    }
}

impl FileComparator for ByName {
    fn compare(&self, a: &FileRecord, b: &FileRecord) -> Ordering {
        compare_names(&a.name_lossy(), &b.name_lossy())
    }
}

impl FileComparator for BySize {
    fn compare(&self, a: &FileRecord, b: &FileRecord) -> Ordering {
        a.size()
            .cmp(&b.size())
            .then_with(|| ByName.compare(a, b))
    }
}

/// Which comparator a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Ascending size (command-line key "1")
    BySize,
    /// Alphanumeric name order (command-line key "2")
    #[default]
    ByName,
}

impl FromStr for SortKey {
    type Err = SortDirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Self::BySize),
            "2" => Ok(Self::ByName),
            other => Err(SortDirError::InvalidSortKey(other.to_string())),
        }
    }
}

impl FileComparator for SortKey {
    fn compare(&self, a: &FileRecord, b: &FileRecord) -> Ordering {
        match self {
            Self::BySize => BySize.compare(a, b),
            Self::ByName => ByName.compare(a, b),
        }
    }
}

/// Accumulates records in comparator order.
///
/// Each insert scans linearly for the first existing record that compares
/// strictly greater and places the new one just before it, so records that
/// compare equal keep their discovery order. O(n) per insert, O(n^2) overall.
#[derive(Debug, Clone)]
pub struct SortedFileCollector<C = SortKey> {
    comparator: C,
    records: Vec<FileRecord>,
}

impl<C: FileComparator> SortedFileCollector<C> {
    /// Create an empty collector
    pub fn new(comparator: C) -> Self {
        Self {
            comparator,
            records: Vec::new(),
        }
    }

    /// Insert a record at its ordered position
    pub fn insert(&mut self, record: FileRecord) {
        let position = self
            .records
            .iter()
            .position(|existing| self.comparator.compare(&record, existing) == Ordering::Less)
            .unwrap_or(self.records.len());
        self.records.insert(position, record);
    }

    /// Records in their current order
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Number of collected records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing has been collected
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of recorded sizes
    pub fn total_size(&self) -> u64 {
        self.records.iter().map(FileRecord::size).sum()
    }

    /// Hand over the final sequence
    pub fn into_records(self) -> Vec<FileRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rec(parent: &str, name: &str, size: u64) -> FileRecord {
        FileRecord::new(parent, name, size)
    }

    fn names(collector: &SortedFileCollector<impl FileComparator>) -> Vec<String> {
        collector.records().iter().map(|r| r.name_lossy().into_owned()).collect()
    }

    #[test]
    fn test_compare_names_case_insensitive() {
        assert_eq!(compare_names("Apple", "apple"), Ordering::Equal);
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("Zed", "alpha"), Ordering::Greater);
    }

    #[test]
    fn test_compare_names_skips_punctuation() {
        assert_eq!(compare_names("a_b.txt", "ab-txt!"), Ordering::Equal);
        assert_eq!(compare_names("a.c", "ab"), Ordering::Greater);
        assert_eq!(compare_names("_z", "b"), Ordering::Greater);
    }

    #[test]
    fn test_compare_names_raw_length_tiebreak() {
        // Same filtered prefix, shorter raw name first
        assert_eq!(compare_names("ab", "abc"), Ordering::Less);
        assert_eq!(compare_names("a.b", "ab"), Ordering::Greater);
        // Raw lengths decide even when the filtered stream is the longer one
        assert_eq!(compare_names("a--b", "abc"), Ordering::Greater);
        assert_eq!(compare_names("", ""), Ordering::Equal);
    }

    #[test]
    fn test_compare_names_digits() {
        assert_eq!(compare_names("file1", "file2"), Ordering::Less);
        assert_eq!(compare_names("file10", "file2"), Ordering::Less);
    }

    #[test]
    fn test_by_size_tiebreak_by_name() {
        let small = rec("/a", "zeta", 1);
        let big = rec("/a", "alpha", 100);
        assert_eq!(BySize.compare(&small, &big), Ordering::Less);

        let b = rec("/a", "beta", 10);
        let a = rec("/b", "Alpha", 10);
        assert_eq!(BySize.compare(&a, &b), Ordering::Less);
        assert_eq!(BySize.compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("1".parse::<SortKey>().unwrap(), SortKey::BySize);
        assert_eq!("2".parse::<SortKey>().unwrap(), SortKey::ByName);
        assert!(matches!("3".parse::<SortKey>(), Err(SortDirError::InvalidSortKey(k)) if k == "3"));
        assert!("".parse::<SortKey>().is_err());
        assert!("-1".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_collector_orders_by_name() {
        let mut collector = SortedFileCollector::new(SortKey::ByName);
        for name in ["delta", "Bravo", "alpha", "charlie"] {
            collector.insert(rec("/src", name, 0));
        }
        assert_eq!(names(&collector), vec!["alpha", "Bravo", "charlie", "delta"]);
    }

    #[test]
    fn test_collector_orders_by_size() {
        let mut collector = SortedFileCollector::new(SortKey::BySize);
        collector.insert(rec("/a", "x.txt", 5));
        collector.insert(rec("/b", "x.txt", 2));
        collector.insert(rec("/c", "big", 500));
        collector.insert(rec("/c", "empty", 0));

        let sizes: Vec<u64> = collector.records().iter().map(FileRecord::size).collect();
        assert_eq!(sizes, vec![0, 2, 5, 500]);
        assert_eq!(collector.total_size(), 507);
        assert_eq!(collector.len(), 4);
    }

    #[test]
    fn test_collector_equal_records_keep_discovery_order() {
        let mut collector = SortedFileCollector::new(ByName);
        collector.insert(rec("/first", "same.txt", 1));
        collector.insert(rec("/second", "same.txt", 1));
        collector.insert(rec("/third", "SAME.txt", 1));

        let parents: Vec<_> = collector
            .records()
            .iter()
            .map(|r| r.parent_path().to_string_lossy().into_owned())
            .collect();
        assert_eq!(parents, vec!["/first", "/second", "/third"]);
    }

    #[test]
    fn test_collector_empty() {
        let collector = SortedFileCollector::new(SortKey::default());
        assert!(collector.is_empty());
        assert!(collector.into_records().is_empty());
    }

    proptest! {
        #[test]
        fn prop_compare_names_antisymmetric(a in "[a-zA-Z0-9._ -]{0,12}", b in "[a-zA-Z0-9._ -]{0,12}") {
            prop_assert_eq!(compare_names(&a, &b), compare_names(&b, &a).reverse());
        }

        #[test]
        fn prop_compare_names_reflexive(a in "\\PC{0,16}") {
            prop_assert_eq!(compare_names(&a, &a), Ordering::Equal);
        }

        #[test]
        fn prop_by_size_collector_sizes_ascending(
            files in proptest::collection::vec(("[a-z]{1,6}", 0u64..64), 0..40)
        ) {
            let mut collector = SortedFileCollector::new(SortKey::BySize);
            for (name, size) in &files {
                collector.insert(FileRecord::new("/p", name.as_str(), *size));
            }
            prop_assert_eq!(collector.len(), files.len());
            for pair in collector.records().windows(2) {
                prop_assert!(pair[0].size() <= pair[1].size());
            }
        }

        #[test]
        fn prop_by_name_collector_adjacent_not_descending(
            files in proptest::collection::vec("[a-zA-Z0-9]{1,8}", 0..40)
        ) {
            let mut collector = SortedFileCollector::new(ByName);
            for name in &files {
                collector.insert(FileRecord::new("/p", name.as_str(), 0));
            }
            for pair in collector.records().windows(2) {
                prop_assert_ne!(ByName.compare(&pair[0], &pair[1]), Ordering::Greater);
            }
        }
    }
}
