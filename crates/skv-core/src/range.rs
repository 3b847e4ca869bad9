//! Logical range selection over the data namespace.
//!
//! A [`ListSelector`] names a set of logical keys; [`ListSelector::to_range`]
//! turns it into the physical [`KeyRange`] to scan. [`Entries`] walks that
//! scan lazily and decodes each entry. Both range endpoints live under the
//! `DATA` tag, so child counters are never visible here.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use skv_store::{KeyRange, ListIterator, ListOptions, OrderedStore};
use skv_types::{KeyPath, PhysicalKey};

use crate::codec::{decorate_data_key, unwrap_leaf, DATA_TAG, LEAF_OPEN};
use crate::entry::Entry;
use crate::error::SkvResult;

/// Which logical keys a listing covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListSelector {
    /// Physical range `[data(start), data(end))`.
    ///
    /// `start: ["A", "B", ""]`, `end: ["A", "B", "~"]` selects the children
    /// of `A/B` whose leaves sort inside that interval; `A/B` itself and
    /// deeper descendants fall outside.
    Range { start: KeyPath, end: KeyPath },
    /// Exactly the direct children of `prefix`, whatever their names.
    Children { prefix: Vec<String> },
}

impl ListSelector {
    pub fn range(start: KeyPath, end: KeyPath) -> Self {
        Self::Range { start, end }
    }

    pub fn children<I, S>(prefix: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Children {
            prefix: prefix.into_iter().map(Into::into).collect(),
        }
    }

    /// The physical range to scan.
    pub fn to_range(&self) -> KeyRange {
        match self {
            ListSelector::Range { start, end } => {
                KeyRange::new(decorate_data_key(start), decorate_data_key(end))
            }
            ListSelector::Children { prefix } => {
                let mut base = PhysicalKey::new([DATA_TAG]);
                for segment in prefix {
                    base.push(segment.as_str());
                }
                // Every wrapped leaf starts with "v~"; '\u{7f}' follows '~'.
                KeyRange::new(base.child(LEAF_OPEN), base.child("v\u{7f}"))
            }
        }
    }

    /// Whether a scanned key belongs to the selection. Range scans of
    /// children also sweep up deeper keys whose next segment happens to
    /// start with the leaf marker.
    fn admits(&self, key: &PhysicalKey) -> bool {
        match self {
            ListSelector::Range { .. } => true,
            ListSelector::Children { prefix } => {
                key.len() == prefix.len() + 2
                    && key
                        .segments()
                        .last()
                        .is_some_and(|leaf| unwrap_leaf(leaf).is_some())
            }
        }
    }
}

/// Lazy, single-pass iterator of decoded entries.
///
/// Tied to the borrow of the store it scans. Stops at the end of the range,
/// at the limit, or after the first error.
pub struct Entries<'a, S: OrderedStore + ?Sized, T = serde_json::Value> {
    inner: ListIterator<'a, S>,
    selector: ListSelector,
    limit: Option<usize>,
    yielded: usize,
    failed: bool,
    _value: PhantomData<fn() -> T>,
}

impl<'a, S: OrderedStore + ?Sized, T> Entries<'a, S, T> {
    /// Start listing `selector` on `store`.
    pub fn new(store: &'a S, selector: ListSelector, options: ListOptions) -> Self {
        // The limit counts admitted entries, not scanned ones.
        let limit = options.limit;
        let scan_options = ListOptions {
            limit: None,
            ..options
        };
        Self {
            inner: ListIterator::new(store, selector.to_range(), scan_options),
            selector,
            limit,
            yielded: 0,
            failed: false,
            _value: PhantomData,
        }
    }
}

impl<S: OrderedStore + ?Sized, T: DeserializeOwned> Iterator for Entries<'_, S, T> {
    type Item = SkvResult<Entry<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.limit.is_some_and(|limit| self.yielded >= limit) {
            return None;
        }
        loop {
            let raw = match self.inner.next()? {
                Ok(raw) => raw,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            };
            if !self.selector.admits(&raw.key) {
                continue;
            }
            let decoded = Entry::decode(raw);
            if decoded.is_err() {
                self.failed = true;
            } else {
                self.yielded += 1;
            }
            return Some(decoded);
        }
    }
}
