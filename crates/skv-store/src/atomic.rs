//! Atomic operation builder.
//!
//! An [`AtomicOperation`] collects versionstamp checks and mutations. The
//! store evaluates every check and, only if all of them hold, applies every
//! mutation under a single commit.

use skv_types::{PhysicalKey, Versionstamp};

/// An optimistic precondition on a single key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Check {
    pub key: PhysicalKey,
    /// The stamp the key must currently carry; `None` means the key must be
    /// absent.
    pub versionstamp: Option<Versionstamp>,
}

/// A write applied by a successful commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Set { key: PhysicalKey, value: Vec<u8> },
    Delete { key: PhysicalKey },
}

impl Mutation {
    /// The key this mutation touches.
    pub fn key(&self) -> &PhysicalKey {
        match self {
            Mutation::Set { key, .. } => key,
            Mutation::Delete { key } => key,
        }
    }
}

/// Outcome of a commit that reached the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitResult {
    /// All checks held and every mutation was applied.
    Committed { versionstamp: Versionstamp },
    /// The check on `key` did not hold; nothing was written.
    CheckFailed { key: PhysicalKey },
}

impl CommitResult {
    /// Returns `true` if the commit was applied.
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitResult::Committed { .. })
    }

    /// The commit's versionstamp, if it was applied.
    pub fn versionstamp(&self) -> Option<Versionstamp> {
        match self {
            CommitResult::Committed { versionstamp } => Some(*versionstamp),
            CommitResult::CheckFailed { .. } => None,
        }
    }
}

/// A batch of checks and mutations committed together.
///
/// Mutations apply in insertion order, so a later mutation on the same key
/// wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AtomicOperation {
    checks: Vec<Check>,
    mutations: Vec<Mutation>,
}

impl AtomicOperation {
    /// Create an empty operation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `key` to carry `versionstamp` (or be absent, for `None`).
    pub fn check(mut self, key: PhysicalKey, versionstamp: Option<Versionstamp>) -> Self {
        self.checks.push(Check { key, versionstamp });
        self
    }

    /// Write `value` at `key`.
    pub fn set(mut self, key: PhysicalKey, value: Vec<u8>) -> Self {
        self.mutations.push(Mutation::Set { key, value });
        self
    }

    /// Remove `key`. Deleting an absent key is a no-op.
    pub fn delete(mut self, key: PhysicalKey) -> Self {
        self.mutations.push(Mutation::Delete { key });
        self
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Consume the operation, returning its parts.
    pub fn into_parts(self) -> (Vec<Check>, Vec<Mutation>) {
        (self.checks, self.mutations)
    }
}
