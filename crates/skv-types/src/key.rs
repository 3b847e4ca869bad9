//! Logical and physical key types.
//!
//! A [`KeyPath`] is what callers address: `["users", "alice", "email"]`. A
//! [`PhysicalKey`] is what the ordered store persists after the structured
//! layer has tagged and wrapped it. Both are plain sequences of string
//! segments; only their meaning differs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A logical hierarchical key.
///
/// Always holds at least one segment. The *prefix* is every segment but the
/// last; the *leaf* is the last segment. Segments may be any string,
/// including the empty string.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Build a key path from its segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use skv_types::KeyPath;
    ///
    /// let key = KeyPath::new(["A", "B"]).unwrap();
    /// assert_eq!(key.leaf(), "B");
    /// assert_eq!(key.prefix(), ["A".to_string()]);
    /// assert!(KeyPath::new(Vec::<String>::new()).is_err());
    /// ```
    pub fn new<I, S>(segments: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(TypeError::EmptyKey);
        }
        Ok(Self(segments))
    }

    /// All segments except the last.
    pub fn prefix(&self) -> &[String] {
        &self.0[..self.0.len() - 1]
    }

    /// The last segment.
    pub fn leaf(&self) -> &str {
        &self.0[self.0.len() - 1]
    }

    /// All segments in order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments (always at least one).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Consume the path, returning its segments.
    pub fn into_segments(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Debug for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeyPath").field(&self.0).finish()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

impl TryFrom<Vec<String>> for KeyPath {
    type Error = TypeError;

    fn try_from(segments: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(segments)
    }
}

impl TryFrom<&[&str]> for KeyPath {
    type Error = TypeError;

    fn try_from(segments: &[&str]) -> Result<Self, Self::Error> {
        Self::new(segments.iter().copied())
    }
}

impl From<KeyPath> for Vec<String> {
    fn from(key: KeyPath) -> Self {
        key.0
    }
}

/// A key as stored in the underlying ordered store.
///
/// Ordering is segment by segment, each segment compared byte-wise, and a
/// key sorts before every key it is a strict prefix of. This is the ordering
/// range scans are defined over.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhysicalKey(Vec<String>);

impl PhysicalKey {
    /// Build a physical key from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Append a segment.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    /// Return a copy of this key with one more segment appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut key = self.clone();
        key.push(segment);
        key
    }

    /// All segments in order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the key has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if `prefix` is a segment-wise prefix of this key
    /// (including equality).
    pub fn starts_with(&self, prefix: &PhysicalKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Consume the key, returning its segments.
    pub fn into_segments(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Debug for PhysicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for PhysicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

impl From<Vec<String>> for PhysicalKey {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl<S: Into<String>> FromIterator<S> for PhysicalKey {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}
