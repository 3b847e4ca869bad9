//! The [`StructuredKv`] facade and its counter protocol.
//!
//! Every mutating call is one or more plain reads followed by one atomic
//! commit. Commits are conditioned on the versionstamps those reads
//! observed: the data key (absent for an insert, unchanged for an overwrite
//! or delete) and the parent's counter. If anything moved in between, the
//! commit fails without side effects and the whole cycle runs again, up to
//! [`StructuredKvConfig::max_commit_attempts`] times. That keeps each
//! counter equal to the number of live direct children under any
//! interleaving of callers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use skv_store::{AtomicOperation, CommitResult, KeyRange, ListIterator, ListOptions, OrderedStore};
use skv_types::{KeyPath, PhysicalKey, Versionstamp};
use tracing::{debug, warn};

use crate::codec::{
    decode_count, decorate_data_key, decorate_system_key, encode_count, system_key_for_prefix,
};
use crate::config::StructuredKvConfig;
use crate::entry::{Entry, SetOutcome};
use crate::error::{SkvError, SkvResult};
use crate::range::{Entries, ListSelector};
use crate::structure::StructureNode;

/// A hierarchical namespace over an [`OrderedStore`].
#[derive(Debug)]
pub struct StructuredKv<S> {
    store: S,
    config: StructuredKvConfig,
}

impl<S: OrderedStore> StructuredKv<S> {
    /// Wrap `store` with the default configuration.
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: StructuredKvConfig::default(),
        }
    }

    /// Wrap `store` with an explicit configuration.
    pub fn with_config(store: S, config: StructuredKvConfig) -> SkvResult<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &StructuredKvConfig {
        &self.config
    }

    /// Release the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Default list options using the configured page size.
    pub fn list_options(&self) -> ListOptions {
        ListOptions::default().with_batch_size(self.config.list_batch_size)
    }

    // ---- Reads ----

    /// Read the value stored at `key`.
    ///
    /// Returns `Ok(None)` if the key was never set or has been deleted.
    pub fn get<T: DeserializeOwned>(&self, key: &KeyPath) -> SkvResult<Option<Entry<T>>> {
        self.store
            .get(&decorate_data_key(key))?
            .map(Entry::decode)
            .transpose()
    }

    /// Lazily list the entries covered by `selector`.
    pub fn list<T: DeserializeOwned>(
        &self,
        selector: ListSelector,
        options: ListOptions,
    ) -> Entries<'_, S, T> {
        Entries::new(&self.store, selector, options)
    }

    /// Number of live direct children of the node at `prefix`.
    ///
    /// The empty prefix addresses the root, whose children are the
    /// single-segment keys.
    pub fn child_count<P: AsRef<str>>(&self, prefix: &[P]) -> SkvResult<u64> {
        Ok(self
            .read_counter(&system_key_for_prefix(prefix))?
            .map_or(0, |(count, _)| count))
    }

    /// Rebuild the tree of child counts under `prefix`.
    ///
    /// The result is rooted at the top of the namespace: paths in it are
    /// full paths, `prefix` only limits which counters are scanned. The
    /// counter of `prefix` itself is included. An unknown prefix yields an
    /// empty tree.
    pub fn structure<P: AsRef<str>>(&self, prefix: &[P]) -> SkvResult<StructureNode> {
        let range = KeyRange::prefix(system_key_for_prefix(prefix));
        let scan = ListIterator::new(&self.store, range, self.list_options());
        StructureNode::from_counters(scan.map(|entry| entry.map_err(SkvError::from)))
    }

    // ---- Writes ----

    /// Store `value` at `key`.
    ///
    /// A new key bumps its parent's child count in the same commit as the
    /// value write. An existing key is overwritten and the count is left
    /// alone.
    pub fn set<V: Serialize + ?Sized>(&self, key: &KeyPath, value: &V) -> SkvResult<SetOutcome> {
        let system_key = decorate_system_key(key);
        let data_key = decorate_data_key(key);
        let bytes = serde_json::to_vec(value)?;

        for attempt in 1..=self.config.max_commit_attempts {
            let (count, counter_stamp) = self
                .read_counter(&system_key)?
                .map_or((0, None), |(count, stamp)| (count, Some(stamp)));

            let insert = AtomicOperation::new()
                .check(data_key.clone(), None)
                .check(system_key.clone(), counter_stamp)
                .set(system_key.clone(), encode_count(count + 1))
                .set(data_key.clone(), bytes.clone());

            match self.store.commit(insert)? {
                CommitResult::Committed { versionstamp } => {
                    debug!(%key, children = count + 1, attempt, "inserted");
                    return Ok(SetOutcome::Inserted { versionstamp });
                }
                CommitResult::CheckFailed { key: failed } if failed == system_key => {
                    debug!(%key, attempt, "child counter moved; retrying insert");
                    continue;
                }
                CommitResult::CheckFailed { .. } => {}
            }

            // The data key exists: overwrite it, as long as it still does.
            let Some(existing) = self.store.get(&data_key)? else {
                debug!(%key, attempt, "value vanished before overwrite; retrying");
                continue;
            };
            let overwrite = AtomicOperation::new()
                .check(data_key.clone(), Some(existing.versionstamp))
                .set(data_key.clone(), bytes.clone());

            if let CommitResult::Committed { versionstamp } = self.store.commit(overwrite)? {
                debug!(%key, attempt, "overwritten");
                return Ok(SetOutcome::Overwritten { versionstamp });
            }
            debug!(%key, attempt, "value changed during overwrite; retrying");
        }

        Err(self.contention(key))
    }

    /// Remove `key`.
    ///
    /// Returns `Ok(true)` if a live value was removed and `Ok(false)` if
    /// there was nothing to remove; the latter touches no counter. The parent
    /// counter is decremented in the same commit, and deleted outright when
    /// it would reach zero.
    pub fn delete(&self, key: &KeyPath) -> SkvResult<bool> {
        let system_key = decorate_system_key(key);
        let data_key = decorate_data_key(key);

        for attempt in 1..=self.config.max_commit_attempts {
            let Some(existing) = self.store.get(&data_key)? else {
                debug!(%key, "delete of absent key");
                return Ok(false);
            };

            let op = AtomicOperation::new().check(data_key.clone(), Some(existing.versionstamp));
            let op = match self.read_counter(&system_key)? {
                None => {
                    warn!(%key, counter = %system_key, "live value without a child counter");
                    op.check(system_key.clone(), None)
                }
                Some((count, stamp)) if count <= 1 => op
                    .check(system_key.clone(), Some(stamp))
                    .delete(system_key.clone()),
                Some((count, stamp)) => op
                    .check(system_key.clone(), Some(stamp))
                    .set(system_key.clone(), encode_count(count - 1)),
            };
            let op = op.delete(data_key.clone());

            match self.store.commit(op)? {
                CommitResult::Committed { .. } => {
                    debug!(%key, attempt, "deleted");
                    return Ok(true);
                }
                CommitResult::CheckFailed { key: failed } => {
                    debug!(%key, %failed, attempt, "delete raced a concurrent writer; retrying");
                }
            }
        }

        Err(self.contention(key))
    }

    // ---- Internals ----

    fn read_counter(&self, system_key: &PhysicalKey) -> SkvResult<Option<(u64, Versionstamp)>> {
        match self.store.get(system_key)? {
            Some(entry) => Ok(Some((
                decode_count(system_key, &entry.value)?,
                entry.versionstamp,
            ))),
            None => Ok(None),
        }
    }

    fn contention(&self, key: &KeyPath) -> SkvError {
        let attempts = self.config.max_commit_attempts;
        warn!(%key, attempts, "giving up after repeated commit conflicts");
        SkvError::Conflict {
            key: key.clone(),
            attempts,
        }
    }
}
