//! Hierarchical namespaces over a flat ordered key-value store.
//!
//! The store underneath only knows ordered sequences of string segments. This
//! crate layers directories on top of it: every value lives under a data key,
//! and every node that has children carries a counter of its direct children
//! under a separate system key. Counters are maintained in the same atomic
//! commit as the value they account for, so the shape of the whole namespace
//! can be rebuilt from a scan of the counters alone.
//!
//! ```
//! use skv_core::{ListSelector, StructuredKv};
//! use skv_store::{InMemoryStore, ListOptions};
//! use skv_types::KeyPath;
//!
//! let kv = StructuredKv::new(InMemoryStore::new());
//! kv.set(&KeyPath::new(["docs", "readme"]).unwrap(), "hello").unwrap();
//! kv.set(&KeyPath::new(["docs", "guide"]).unwrap(), "world").unwrap();
//!
//! assert_eq!(kv.child_count(&["docs"]).unwrap(), 2);
//! let tree = kv.structure::<&str>(&[]).unwrap();
//! assert_eq!(tree["docs"].count(), Some(2));
//!
//! let names: Vec<String> = kv
//!     .list::<String>(ListSelector::children(["docs"]), ListOptions::default())
//!     .map(|entry| entry.unwrap().key.leaf().to_string())
//!     .collect();
//! assert_eq!(names, ["guide", "readme"]);
//! ```
//!
//! # Modules
//!
//! - [`codec`] — Physical key layout for data and system keys
//! - [`range`] — Logical range selection and lazy decoded listing
//! - [`kv`] — The [`StructuredKv`] facade and its counter protocol
//! - [`structure`] — Tree reconstruction from counters
//! - [`config`] — [`StructuredKvConfig`]
//! - [`error`] — [`SkvError`]

pub mod codec;
pub mod config;
pub mod entry;
pub mod error;
pub mod kv;
pub mod range;
pub mod structure;

pub use config::StructuredKvConfig;
pub use entry::{Entry, SetOutcome};
pub use error::{SkvError, SkvResult};
pub use kv::StructuredKv;
pub use range::{Entries, ListSelector};
pub use structure::StructureNode;
