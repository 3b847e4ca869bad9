//! Decoded entries and operation outcomes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use skv_store::RawEntry;
use skv_types::{KeyPath, Versionstamp};

use crate::codec::undecorate_data_key;
use crate::error::SkvResult;

/// A user value read back through the structured layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<T> {
    /// The logical key.
    pub key: KeyPath,
    /// The decoded value.
    pub value: T,
    /// Stamp of the commit that last wrote this value.
    pub versionstamp: Versionstamp,
}

impl<T: DeserializeOwned> Entry<T> {
    /// Decode a raw entry from the data namespace.
    pub fn decode(raw: RawEntry) -> SkvResult<Self> {
        Ok(Self {
            key: undecorate_data_key(&raw.key)?,
            value: serde_json::from_slice(&raw.value)?,
            versionstamp: raw.versionstamp,
        })
    }
}

/// What a successful `set` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    /// The key was new; its parent's child count went up by one.
    Inserted { versionstamp: Versionstamp },
    /// The key already existed; only the value changed.
    Overwritten { versionstamp: Versionstamp },
}

impl SetOutcome {
    pub fn versionstamp(&self) -> Versionstamp {
        match self {
            SetOutcome::Inserted { versionstamp } | SetOutcome::Overwritten { versionstamp } => {
                *versionstamp
            }
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, SetOutcome::Inserted { .. })
    }
}
