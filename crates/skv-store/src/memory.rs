//! In-memory ordered store for tests and embedding.
//!
//! [`InMemoryStore`] keeps every entry in a `BTreeMap` behind a `RwLock`.
//! Commits take the write lock for their whole check-then-apply span, which
//! is what makes them atomic. Data is lost when the store is dropped.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use skv_types::{PhysicalKey, Versionstamp};
use tracing::debug;

use crate::atomic::{AtomicOperation, CommitResult, Mutation};
use crate::error::{StoreError, StoreResult};
use crate::traits::OrderedStore;
use crate::types::{KeyRange, RawEntry, ScanPage};

#[derive(Clone, Debug)]
struct StoredValue {
    value: Vec<u8>,
    versionstamp: Versionstamp,
}

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<PhysicalKey, StoredValue>,
    /// Sequence number of the last applied commit.
    sequence: u64,
}

/// An in-memory implementation of [`OrderedStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read_inner(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write_inner(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_inner()?.entries.len())
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read_inner()?.entries.is_empty())
    }

    /// Every entry, in ascending key order.
    pub fn snapshot(&self) -> StoreResult<Vec<RawEntry>> {
        let inner = self.read_inner()?;
        Ok(inner
            .entries
            .iter()
            .map(|(key, stored)| to_entry(key, stored))
            .collect())
    }
}

fn to_entry(key: &PhysicalKey, stored: &StoredValue) -> RawEntry {
    RawEntry {
        key: key.clone(),
        value: stored.value.clone(),
        versionstamp: stored.versionstamp,
    }
}

/// Narrow `range` by the resume point of a paged scan.
fn scan_bounds(
    range: &KeyRange,
    after: Option<&PhysicalKey>,
    reverse: bool,
) -> (Bound<PhysicalKey>, Bound<PhysicalKey>) {
    let mut lower = Bound::Included(range.start.clone());
    let mut upper = match &range.end {
        Some(end) => Bound::Excluded(end.clone()),
        None => Bound::Unbounded,
    };

    if let Some(after) = after {
        if reverse {
            let tighter = match &range.end {
                Some(end) => after < end,
                None => true,
            };
            if tighter {
                upper = Bound::Excluded(after.clone());
            }
        } else if after >= &range.start {
            lower = Bound::Excluded(after.clone());
        }
    }
    (lower, upper)
}

fn bounds_are_empty(lower: &Bound<PhysicalKey>, upper: &Bound<PhysicalKey>) -> bool {
    match (lower, upper) {
        (Bound::Included(lo), Bound::Excluded(hi)) => lo >= hi,
        (Bound::Excluded(lo), Bound::Excluded(hi)) => lo >= hi,
        _ => false,
    }
}

fn collect_page<'a>(
    matched: impl Iterator<Item = (&'a PhysicalKey, &'a StoredValue)>,
    limit: usize,
) -> ScanPage {
    let mut entries = Vec::with_capacity(limit.min(64));
    let mut has_more = false;
    for (key, stored) in matched {
        if entries.len() >= limit {
            has_more = true;
            break;
        }
        entries.push(to_entry(key, stored));
    }
    ScanPage { entries, has_more }
}

impl OrderedStore for InMemoryStore {
    fn get(&self, key: &PhysicalKey) -> StoreResult<Option<RawEntry>> {
        let inner = self.read_inner()?;
        Ok(inner.entries.get(key).map(|stored| to_entry(key, stored)))
    }

    fn scan(
        &self,
        range: &KeyRange,
        after: Option<&PhysicalKey>,
        limit: usize,
        reverse: bool,
    ) -> StoreResult<ScanPage> {
        let (lower, upper) = scan_bounds(range, after, reverse);
        // BTreeMap::range panics on inverted bounds.
        if bounds_are_empty(&lower, &upper) {
            return Ok(ScanPage::default());
        }

        let inner = self.read_inner()?;
        let matched = inner.entries.range((lower, upper));
        if reverse {
            Ok(collect_page(matched.rev(), limit))
        } else {
            Ok(collect_page(matched, limit))
        }
    }

    fn commit(&self, op: AtomicOperation) -> StoreResult<CommitResult> {
        let (checks, mutations) = op.into_parts();
        if checks.iter().any(|c| c.key.is_empty()) || mutations.iter().any(|m| m.key().is_empty())
        {
            return Err(StoreError::EmptyKey);
        }

        let mut inner = self.write_inner()?;

        for check in &checks {
            let current = inner.entries.get(&check.key).map(|s| s.versionstamp);
            if current != check.versionstamp {
                debug!(
                    key = %check.key,
                    expected = ?check.versionstamp,
                    actual = ?current,
                    "commit check failed"
                );
                return Ok(CommitResult::CheckFailed {
                    key: check.key.clone(),
                });
            }
        }

        inner.sequence += 1;
        let versionstamp = Versionstamp::from_sequence(inner.sequence);
        let applied = mutations.len();
        for mutation in mutations {
            match mutation {
                Mutation::Set { key, value } => {
                    inner.entries.insert(
                        key,
                        StoredValue {
                            value,
                            versionstamp,
                        },
                    );
                }
                Mutation::Delete { key } => {
                    inner.entries.remove(&key);
                }
            }
        }

        debug!(%versionstamp, checks = checks.len(), mutations = applied, "commit applied");
        Ok(CommitResult::Committed { versionstamp })
    }
}
