//! Ordered key-value store contract for structured KV.
//!
//! The structured layer never talks to a storage engine directly. It needs
//! exactly three primitives from whatever sits underneath, captured by the
//! [`OrderedStore`] trait:
//!
//! - point reads returning the value and its [`Versionstamp`]
//! - ordered range scans over half-open [`KeyRange`]s
//! - atomic commits of an [`AtomicOperation`]: versionstamp checks plus sets
//!   and deletes that apply together or not at all
//!
//! # Storage Backends
//!
//! - [`InMemoryStore`] -- `BTreeMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. A commit whose checks fail has no side effects.
//! 2. Every successful commit gets a fresh, strictly larger versionstamp.
//! 3. Scans are paged; [`ListIterator`] pulls pages lazily and may be dropped
//!    at any point to abandon the scan.
//! 4. The store never interprets keys or values beyond ordering.
//!
//! [`Versionstamp`]: skv_types::Versionstamp

pub mod atomic;
pub mod cursor;
pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use atomic::{AtomicOperation, Check, CommitResult, Mutation};
pub use cursor::ListIterator;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use traits::OrderedStore;
pub use types::{KeyRange, ListOptions, RawEntry, ScanPage, DEFAULT_BATCH_SIZE};
