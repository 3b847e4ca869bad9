//! Tree reconstruction from child counters.
//!
//! The system namespace holds one counter per node that has children. Scanning
//! it in key order and walking each counter key segment by segment rebuilds
//! the shape of the namespace as an owned trie.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use skv_store::RawEntry;

use crate::codec::{decode_count, SYSTEM_TAG};
use crate::error::{SkvError, SkvResult};

/// One node of a reconstructed namespace tree.
///
/// Serializes to the nested-object form `{"A": {"_v": 1, "B": {...}}}`,
/// where `_v` is the node's direct-child count. A child literally named
/// `_v` cannot be represented in that form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureNode {
    #[serde(rename = "_v", default, skip_serializing_if = "Option::is_none")]
    count: Option<u64>,
    #[serde(flatten)]
    children: BTreeMap<String, StructureNode>,
}

impl StructureNode {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of direct children recorded for this node, if it has a counter.
    pub fn count(&self) -> Option<u64> {
        self.count
    }

    /// The child named `name`.
    pub fn child(&self, name: &str) -> Option<&StructureNode> {
        self.children.get(name)
    }

    /// Follow `path` from this node.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&StructureNode> {
        path.iter()
            .try_fold(self, |node, segment| node.child(segment.as_ref()))
    }

    /// Children in ascending name order.
    pub fn children(&self) -> btree_map::Iter<'_, String, StructureNode> {
        self.children.iter()
    }

    /// Returns `true` if the node has neither a counter nor children.
    pub fn is_empty(&self) -> bool {
        self.count.is_none() && self.children.is_empty()
    }

    /// Record `count` at the node reached by walking `path`, creating
    /// intermediate nodes on the way.
    pub fn insert<S: AsRef<str>>(&mut self, path: &[S], count: u64) {
        let node = path.iter().fold(self, |node, segment| {
            node.children.entry(segment.as_ref().to_string()).or_default()
        });
        node.count = Some(count);
    }

    /// Fold scanned system entries into a tree rooted at the system tag.
    pub fn from_counters<I>(entries: I) -> SkvResult<Self>
    where
        I: IntoIterator<Item = SkvResult<RawEntry>>,
    {
        let mut root = Self::new();
        for entry in entries {
            let entry = entry?;
            let (tag, path) = entry
                .key
                .segments()
                .split_first()
                .ok_or_else(|| SkvError::MalformedKey {
                    key: entry.key.clone(),
                    reason: "empty system key".into(),
                })?;
            if tag != SYSTEM_TAG {
                return Err(SkvError::MalformedKey {
                    key: entry.key.clone(),
                    reason: "missing SYSTEM tag".into(),
                });
            }
            let count = decode_count(&entry.key, &entry.value)?;
            root.insert(path, count);
        }
        Ok(root)
    }
}

impl Index<&str> for StructureNode {
    type Output = StructureNode;

    /// # Panics
    ///
    /// Panics if there is no child named `name`.
    fn index(&self, name: &str) -> &Self::Output {
        self.child(name)
            .unwrap_or_else(|| panic!("no child named {name:?} in structure"))
    }
}
