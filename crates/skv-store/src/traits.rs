use skv_types::PhysicalKey;

use crate::atomic::{AtomicOperation, CommitResult};
use crate::cursor::ListIterator;
use crate::error::StoreResult;
use crate::types::{KeyRange, ListOptions, RawEntry, ScanPage};

/// A lexicographically ordered key-value store with optimistic atomic
/// commits.
///
/// All implementations must satisfy these invariants:
/// - Keys order segment by segment, byte-wise within a segment, and a key
///   sorts before all of its extensions.
/// - A commit either applies every mutation or none. A failed check is
///   reported as [`CommitResult::CheckFailed`], not as an error.
/// - Each applied commit stamps its writes with a versionstamp strictly
///   greater than every earlier one.
/// - Backend failures are propagated, never silently ignored.
pub trait OrderedStore: Send + Sync {
    /// Read a single entry.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &PhysicalKey) -> StoreResult<Option<RawEntry>>;

    /// Fetch one page of `range`.
    ///
    /// `after` resumes a scan: only keys strictly after it (strictly before
    /// it, when `reverse`) are returned. At most `limit` entries come back.
    fn scan(
        &self,
        range: &KeyRange,
        after: Option<&PhysicalKey>,
        limit: usize,
        reverse: bool,
    ) -> StoreResult<ScanPage>;

    /// Evaluate the checks of `op` and, if all hold, apply its mutations.
    fn commit(&self, op: AtomicOperation) -> StoreResult<CommitResult>;

    /// Lazily iterate over `range`, one page at a time.
    fn list(&self, range: KeyRange, options: ListOptions) -> ListIterator<'_, Self>
    where
        Self: Sized,
    {
        ListIterator::new(self, range, options)
    }
}

impl<S: OrderedStore + ?Sized> OrderedStore for &S {
    fn get(&self, key: &PhysicalKey) -> StoreResult<Option<RawEntry>> {
        (**self).get(key)
    }

    fn scan(
        &self,
        range: &KeyRange,
        after: Option<&PhysicalKey>,
        limit: usize,
        reverse: bool,
    ) -> StoreResult<ScanPage> {
        (**self).scan(range, after, limit, reverse)
    }

    fn commit(&self, op: AtomicOperation) -> StoreResult<CommitResult> {
        (**self).commit(op)
    }
}

impl<S: OrderedStore + ?Sized> OrderedStore for std::sync::Arc<S> {
    fn get(&self, key: &PhysicalKey) -> StoreResult<Option<RawEntry>> {
        (**self).get(key)
    }

    fn scan(
        &self,
        range: &KeyRange,
        after: Option<&PhysicalKey>,
        limit: usize,
        reverse: bool,
    ) -> StoreResult<ScanPage> {
        (**self).scan(range, after, limit, reverse)
    }

    fn commit(&self, op: AtomicOperation) -> StoreResult<CommitResult> {
        (**self).commit(op)
    }
}
