//! Entry, range, and listing types shared by every backend.

use serde::{Deserialize, Serialize};
use skv_types::{PhysicalKey, Versionstamp};

/// Default number of entries fetched per scan page.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// A stored entry as returned by reads and scans.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    /// The physical key.
    pub key: PhysicalKey,
    /// The stored bytes, uninterpreted.
    pub value: Vec<u8>,
    /// Stamp of the commit that last wrote this entry.
    pub versionstamp: Versionstamp,
}

/// A half-open interval `[start, end)` over physical keys.
///
/// `end: None` means the range is unbounded above.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyRange {
    pub start: PhysicalKey,
    pub end: Option<PhysicalKey>,
}

impl KeyRange {
    /// The range `[start, end)`.
    pub fn new(start: PhysicalKey, end: PhysicalKey) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Every key in the store.
    pub fn all() -> Self {
        Self {
            start: PhysicalKey::default(),
            end: None,
        }
    }

    /// `prefix` itself and every key that extends it segment-wise.
    ///
    /// The upper bound appends a NUL byte to the last segment: nothing sorts
    /// strictly between a string and that string followed by `\0`, so every
    /// extension of `prefix` falls below it and nothing else does.
    pub fn prefix(prefix: PhysicalKey) -> Self {
        let mut segments = prefix.clone().into_segments();
        match segments.last_mut() {
            Some(last) => {
                last.push('\0');
                Self {
                    start: prefix,
                    end: Some(PhysicalKey::from(segments)),
                }
            }
            None => Self::all(),
        }
    }

    /// Returns `true` if `key` falls inside the range.
    pub fn contains(&self, key: &PhysicalKey) -> bool {
        key >= &self.start && self.end.as_ref().map_or(true, |end| key < end)
    }

    /// Returns `true` if no key can fall inside the range.
    pub fn is_empty(&self) -> bool {
        self.end.as_ref().is_some_and(|end| end <= &self.start)
    }
}

/// Options controlling a [`list`](crate::OrderedStore::list) call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Maximum number of entries to yield in total.
    pub limit: Option<usize>,
    /// Yield entries in descending key order.
    pub reverse: bool,
    /// Entries fetched per underlying scan page.
    pub batch_size: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: None,
            reverse: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ListOptions {
    /// Cap the total number of entries.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Iterate in descending key order.
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Set the page size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// One page of a range scan.
#[derive(Clone, Debug, Default)]
pub struct ScanPage {
    /// Entries in scan order.
    pub entries: Vec<RawEntry>,
    /// Whether further entries remain in the range after this page.
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(parts: &[&str]) -> PhysicalKey {
        PhysicalKey::new(parts.iter().copied())
    }

    #[test]
    fn prefix_range_covers_key_and_extensions() {
        let range = KeyRange::prefix(key(&["SYSTEM", "A"]));
        assert!(range.contains(&key(&["SYSTEM", "A"])));
        assert!(range.contains(&key(&["SYSTEM", "A", "B"])));
        assert!(range.contains(&key(&["SYSTEM", "A", "B", "C"])));
        assert!(!range.contains(&key(&["SYSTEM", "AB"])));
        assert!(!range.contains(&key(&["SYSTEM", "A\0"])));
        assert!(!range.contains(&key(&["SYSTEM"])));
        assert!(!range.contains(&key(&["SYSTEM", "B"])));
    }

    #[test]
    fn empty_prefix_is_everything() {
        let range = KeyRange::prefix(PhysicalKey::default());
        assert_eq!(range, KeyRange::all());
        assert!(range.contains(&key(&["DATA"])));
        assert!(range.contains(&key(&[])));
    }

    #[test]
    fn inverted_range_is_empty() {
        let range = KeyRange::new(key(&["b"]), key(&["a"]));
        assert!(range.is_empty());
        assert!(!KeyRange::new(key(&["a"]), key(&["b"])).is_empty());
    }

    #[test]
    fn default_list_options() {
        let opts = ListOptions::default();
        assert_eq!(opts.limit, None);
        assert!(!opts.reverse);
        assert_eq!(opts.batch_size, DEFAULT_BATCH_SIZE);

        let opts = ListOptions::default().with_limit(3).reversed().with_batch_size(2);
        assert_eq!(opts.limit, Some(3));
        assert!(opts.reverse);
        assert_eq!(opts.batch_size, 2);
    }
}
