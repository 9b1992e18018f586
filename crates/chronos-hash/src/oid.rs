use std::fmt;
use std::str::FromStr;

use crate::hex::{hex_decode, hex_to_string};
use crate::HashError;

/// Length of a raw SHA-1 digest in bytes.
pub const OID_LEN: usize = 20;
/// Length of a rendered object id in hex digits.
pub const OID_HEX_LEN: usize = OID_LEN * 2;

/// The identity of a stored object: the SHA-1 of its framed bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; OID_LEN]);

impl ObjectId {
    /// The all-zero id.
    pub const NULL: Self = Self([0u8; OID_LEN]);

    /// Build an id from exactly 20 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashError> {
        let arr: [u8; OID_LEN] = bytes.try_into().map_err(|_| HashError::InvalidHashLength {
            expected: OID_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Parse a full 40-digit hex id.
    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        let mut bytes = [0u8; OID_LEN];
        hex_decode(hex, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex_to_string(&self.0)
    }

    /// The first seven hex digits, as printed in log output.
    pub fn short_hex(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(7);
        hex
    }

    /// Path of the object relative to the objects directory: `"xx/xxxx..."`.
    pub fn loose_path(&self) -> String {
        let hex = self.to_hex();
        format!("{}/{}", &hex[..2], &hex[2..])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", &self.to_hex()[..8])
    }
}

impl FromStr for ObjectId {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const EMPTY_SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    #[test]
    fn display_roundtrip() {
        let oid = ObjectId::from_hex(EMPTY_SHA1).unwrap();
        assert_eq!(oid.to_string(), EMPTY_SHA1);
        let parsed: ObjectId = oid.to_string().parse().unwrap();
        assert_eq!(parsed, oid);
    }

    #[test]
    fn debug_shows_short_hash() {
        let oid = ObjectId::from_hex(EMPTY_SHA1).unwrap();
        assert_eq!(format!("{:?}", oid), "ObjectId(da39a3ee)");
    }

    #[test]
    fn ordering_follows_bytes() {
        let a = ObjectId::from_hex("0000000000000000000000000000000000000001").unwrap();
        let b = ObjectId::from_hex("0000000000000000000000000000000000000002").unwrap();
        assert!(a < b);
    }

    #[test]
    fn usable_as_map_key() {
        let oid = ObjectId::from_hex(EMPTY_SHA1).unwrap();
        let mut map = HashMap::new();
        map.insert(oid, "value");
        assert_eq!(map.get(&oid), Some(&"value"));
    }

    #[test]
    fn null_oid_is_all_zero() {
        assert_eq!(ObjectId::NULL.as_bytes(), &[0u8; OID_LEN]);
        assert_eq!(ObjectId::NULL.to_hex(), "0".repeat(OID_HEX_LEN));
    }

    #[test]
    fn from_bytes_wrong_length() {
        let err = ObjectId::from_bytes(&[0; 10]).unwrap_err();
        assert!(matches!(
            err,
            HashError::InvalidHashLength {
                expected: 20,
                actual: 10
            }
        ));
    }

    #[test]
    fn short_hex_is_seven_digits() {
        let oid = ObjectId::from_hex(EMPTY_SHA1).unwrap();
        assert_eq!(oid.short_hex(), "da39a3e");
    }

    #[test]
    fn loose_path_splits_after_two_digits() {
        let oid = ObjectId::from_hex(EMPTY_SHA1).unwrap();
        assert_eq!(oid.loose_path(), format!("da/{}", &EMPTY_SHA1[2..]));
    }

    #[test]
    fn short_hex_string_rejected() {
        let err = ObjectId::from_hex("abcd").unwrap_err();
        assert!(matches!(err, HashError::InvalidHexLength { .. }));
    }
}
