use chronos_hash::hex::{hex_decode, hex_to_string, is_hex_prefix};
use chronos_hash::ObjectId;
use proptest::prelude::*;

proptest! {
    #[test]
    fn hex_encode_decode_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        let hex = hex_to_string(&bytes);
        let mut buf = vec![0u8; bytes.len()];
        hex_decode(&hex, &mut buf).unwrap();
        prop_assert_eq!(buf, bytes);
    }

    #[test]
    fn hex_is_always_lowercase(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
        let hex = hex_to_string(&bytes);
        prop_assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        prop_assert_eq!(hex.len(), bytes.len() * 2);
    }

    #[test]
    fn oid_hex_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 20..=20)) {
        let oid = ObjectId::from_bytes(&bytes).unwrap();
        let parsed: ObjectId = oid.to_hex().parse().unwrap();
        prop_assert_eq!(oid, parsed);
    }

    #[test]
    fn oid_hex_slices_are_prefixes(bytes in proptest::collection::vec(any::<u8>(), 20..=20), len in 4usize..=40) {
        let oid = ObjectId::from_bytes(&bytes).unwrap();
        let hex = oid.to_hex();
        prop_assert!(is_hex_prefix(&hex[..len], 4, 40));
        prop_assert!(is_hex_prefix(&hex[..len].to_ascii_uppercase(), 4, 40));
    }
}
