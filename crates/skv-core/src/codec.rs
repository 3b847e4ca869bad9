//! Physical key layout.
//!
//! Every logical key maps to two physical keys in disjoint namespaces:
//!
//! ```text
//! logical   ["A", "B", "C"]
//! data      ["DATA", "A", "B", "v~C!v"]   holds the value
//! system    ["SYSTEM", "A", "B"]          counts direct children of A/B
//! ```
//!
//! Wrapping the leaf keeps a node's own value key from interleaving with the
//! keys of its descendants: under `["DATA", "A", "B"]`, wrapped leaves all
//! start with `v~` while deeper paths continue with their raw next segment.
//! The tags and markers are persisted and must never change.

use skv_types::{KeyPath, PhysicalKey};

use crate::error::{SkvError, SkvResult};

/// Tag of the namespace holding child counters.
pub const SYSTEM_TAG: &str = "SYSTEM";
/// Tag of the namespace holding user values.
pub const DATA_TAG: &str = "DATA";
/// Opening marker around a data key's leaf segment.
pub const LEAF_OPEN: &str = "v~";
/// Closing marker around a data key's leaf segment.
pub const LEAF_CLOSE: &str = "!v";

/// Wrap a leaf segment in the leaf markers.
pub fn wrap_leaf(leaf: &str) -> String {
    format!("{LEAF_OPEN}{leaf}{LEAF_CLOSE}")
}

/// Strip exactly one pair of leaf markers, or `None` if `segment` is not a
/// wrapped leaf.
pub fn unwrap_leaf(segment: &str) -> Option<&str> {
    segment.strip_prefix(LEAF_OPEN)?.strip_suffix(LEAF_CLOSE)
}

/// The counter key for the node whose segments are `prefix`.
pub fn system_key_for_prefix<S: AsRef<str>>(prefix: &[S]) -> PhysicalKey {
    let mut key = PhysicalKey::new([SYSTEM_TAG]);
    for segment in prefix {
        key.push(segment.as_ref());
    }
    key
}

/// The counter key tracking `key`'s parent: `SYSTEM` followed by the prefix.
///
/// ```
/// use skv_core::codec::decorate_system_key;
/// use skv_types::{KeyPath, PhysicalKey};
///
/// let key = KeyPath::new(["A", "B", "C"]).unwrap();
/// assert_eq!(decorate_system_key(&key), PhysicalKey::new(["SYSTEM", "A", "B"]));
/// ```
pub fn decorate_system_key(key: &KeyPath) -> PhysicalKey {
    system_key_for_prefix(key.prefix())
}

/// The key holding `key`'s value: `DATA`, the prefix, then the wrapped leaf.
pub fn decorate_data_key(key: &KeyPath) -> PhysicalKey {
    let mut physical = PhysicalKey::new([DATA_TAG]);
    for segment in key.prefix() {
        physical.push(segment.as_str());
    }
    physical.push(wrap_leaf(key.leaf()));
    physical
}

/// Recover the logical key from a data key.
///
/// Works segment by segment: the tag is verified and dropped, the final
/// segment is unwrapped, every other segment is kept verbatim. Segments may
/// contain anything, including the markers themselves.
pub fn undecorate_data_key(physical: &PhysicalKey) -> SkvResult<KeyPath> {
    let malformed = |reason: &str| SkvError::MalformedKey {
        key: physical.clone(),
        reason: reason.to_string(),
    };

    let (tag, rest) = physical
        .segments()
        .split_first()
        .ok_or_else(|| malformed("empty key"))?;
    if tag != DATA_TAG {
        return Err(malformed("missing DATA tag"));
    }
    let (wrapped, prefix) = rest
        .split_last()
        .ok_or_else(|| malformed("no leaf segment"))?;
    let leaf = unwrap_leaf(wrapped).ok_or_else(|| malformed("leaf segment is not wrapped"))?;

    let mut segments = prefix.to_vec();
    segments.push(leaf.to_string());
    Ok(KeyPath::new(segments)?)
}

/// Encode a child count as stored under a system key.
pub fn encode_count(count: u64) -> Vec<u8> {
    count.to_le_bytes().to_vec()
}

/// Decode a child count read from the system key `key`.
pub fn decode_count(key: &PhysicalKey, bytes: &[u8]) -> SkvResult<u64> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| SkvError::CorruptCounter {
        key: key.clone(),
        len: bytes.len(),
    })?;
    Ok(u64::from_le_bytes(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn path(parts: &[&str]) -> KeyPath {
        KeyPath::new(parts.iter().copied()).unwrap()
    }

    fn phys(parts: &[&str]) -> PhysicalKey {
        PhysicalKey::new(parts.iter().copied())
    }

    #[test]
    fn system_key_drops_leaf() {
        assert_eq!(decorate_system_key(&path(&["A", "B"])), phys(&["SYSTEM", "A"]));
        assert_eq!(
            decorate_system_key(&path(&["A", "B", "C"])),
            phys(&["SYSTEM", "A", "B"])
        );
        assert_eq!(decorate_system_key(&path(&["A"])), phys(&["SYSTEM"]));
    }

    #[test]
    fn data_key_wraps_leaf() {
        assert_eq!(decorate_data_key(&path(&["A", "B"])), phys(&["DATA", "A", "v~B!v"]));
        assert_eq!(
            decorate_data_key(&path(&["A", "B", "C"])),
            phys(&["DATA", "A", "B", "v~C!v"])
        );
        assert_eq!(decorate_data_key(&path(&["A"])), phys(&["DATA", "v~A!v"]));
    }

    #[test]
    fn undecorate_known_keys() {
        assert_eq!(
            undecorate_data_key(&phys(&["DATA", "A", "v~B!v"])).unwrap(),
            path(&["A", "B"])
        );
        assert_eq!(
            undecorate_data_key(&phys(&["DATA", "A", "B", "v~C!v"])).unwrap(),
            path(&["A", "B", "C"])
        );
    }

    #[test]
    fn undecorate_keeps_separators_and_markers() {
        let tricky = path(&["a,b", "v~x!v", "!v,v~"]);
        let physical = decorate_data_key(&tricky);
        assert_eq!(physical.segments()[3], "v~!v,v~!v");
        assert_eq!(undecorate_data_key(&physical).unwrap(), tricky);
    }

    #[test]
    fn undecorate_rejects_foreign_keys() {
        for bad in [
            phys(&[]),
            phys(&["DATA"]),
            phys(&["SYSTEM", "A"]),
            phys(&["DATA", "A", "B"]),
            phys(&["DATA", "v~A"]),
        ] {
            let err = undecorate_data_key(&bad).unwrap_err();
            assert!(matches!(err, SkvError::MalformedKey { .. }), "{bad}: {err}");
        }
    }

    #[test]
    fn own_value_sorts_apart_from_children() {
        // ["A","B"] is stored at DATA/A/v~B!v, its children under DATA/A/B/...
        let own = decorate_data_key(&path(&["A", "B"]));
        let child = decorate_data_key(&path(&["A", "B", "C"]));
        let sibling = decorate_data_key(&path(&["A", "C"]));
        assert!(child < own);
        assert!(!child.starts_with(&own));
        assert!(sibling > child);
    }

    #[test]
    fn count_roundtrip_and_corruption() {
        let key = phys(&["SYSTEM", "A"]);
        assert_eq!(decode_count(&key, &encode_count(3)).unwrap(), 3);
        let err = decode_count(&key, b"3").unwrap_err();
        assert!(matches!(err, SkvError::CorruptCounter { len: 1, .. }));
    }

    proptest! {
        #[test]
        fn data_key_roundtrips_any_segments(
            segments in proptest::collection::vec(".*", 1..6)
        ) {
            let key = KeyPath::new(segments).unwrap();
            let decoded = undecorate_data_key(&decorate_data_key(&key)).unwrap();
            prop_assert_eq!(decoded, key);
        }
    }
}
