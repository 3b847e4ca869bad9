//! Foundation types for structured KV.
//!
//! This crate provides the key and version types shared by the store contract
//! (`skv-store`) and the hierarchical layer built on top of it (`skv-core`).
//!
//! # Key Types
//!
//! - [`KeyPath`] — Logical hierarchical key: a non-empty sequence of segments
//! - [`PhysicalKey`] — Key as persisted in the ordered store, compared segment by segment
//! - [`Versionstamp`] — Per-commit stamp used for optimistic checks

pub mod error;
pub mod key;
pub mod versionstamp;

pub use error::TypeError;
pub use key::{KeyPath, PhysicalKey};
pub use versionstamp::Versionstamp;
