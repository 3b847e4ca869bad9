use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length of a versionstamp in bytes.
pub const VERSIONSTAMP_LEN: usize = 10;

/// A 10-byte stamp assigned to every successful commit.
///
/// Every entry written by a commit carries that commit's stamp. Stamps are
/// totally ordered and strictly increase across commits to one store, so an
/// optimistic check can compare "the stamp I read" against "the stamp that is
/// there now".
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Versionstamp([u8; VERSIONSTAMP_LEN]);

impl Versionstamp {
    /// Build a stamp from a commit sequence number.
    ///
    /// The sequence is stored big-endian in the first eight bytes so byte
    /// order and numeric order agree; the trailing two bytes are zero.
    pub fn from_sequence(seq: u64) -> Self {
        let mut bytes = [0u8; VERSIONSTAMP_LEN];
        bytes[..8].copy_from_slice(&seq.to_be_bytes());
        Self(bytes)
    }

    /// Create a stamp from raw bytes.
    pub const fn from_raw(bytes: [u8; VERSIONSTAMP_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; VERSIONSTAMP_LEN] {
        &self.0
    }

    /// The commit sequence encoded in the first eight bytes.
    pub fn sequence(&self) -> u64 {
        let mut seq = [0u8; 8];
        seq.copy_from_slice(&self.0[..8]);
        u64::from_be_bytes(seq)
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != VERSIONSTAMP_LEN {
            return Err(TypeError::InvalidLength {
                expected: VERSIONSTAMP_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; VERSIONSTAMP_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Versionstamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Versionstamp({})", self.to_hex())
    }
}

impl fmt::Display for Versionstamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sequence_roundtrip() {
        let stamp = Versionstamp::from_sequence(42);
        assert_eq!(stamp.sequence(), 42);
        assert_eq!(stamp.to_hex(), "000000000000002a0000");
    }

    #[test]
    fn hex_roundtrip() {
        let stamp = Versionstamp::from_sequence(7);
        let parsed = Versionstamp::from_hex(&stamp.to_hex()).unwrap();
        assert_eq!(stamp, parsed);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        let err = Versionstamp::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: VERSIONSTAMP_LEN,
                actual: 2
            }
        );
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(matches!(
            Versionstamp::from_hex("not hex at all!!!!!!"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    proptest! {
        #[test]
        fn byte_order_matches_sequence_order(a in any::<u64>(), b in any::<u64>()) {
            let sa = Versionstamp::from_sequence(a);
            let sb = Versionstamp::from_sequence(b);
            prop_assert_eq!(a.cmp(&b), sa.cmp(&sb));
        }
    }
}
