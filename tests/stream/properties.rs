//! Property Tests
//!
//! proptest coverage for round-trip fidelity, digest determinism, and
//! decoder robustness against arbitrary and truncated input.

use crate::common::{fixture_registry, AtomParams, ResidueTemplate};
use proptest::prelude::*;
use stele::{
    deserialize_from_slice, magic_of, peek_header, serialize_to_vec, MagicId, StreamHeader,
};

fn arb_atom() -> impl Strategy<Value = AtomParams> {
    (
        "[A-Za-z0-9 ]{0,24}",
        proptest::num::f64::NORMAL | proptest::num::f64::ZERO,
        0.0f64..10.0,
        0.0f64..5.0,
    )
        .prop_map(|(name, charge, lj_sigma, lj_epsilon)| AtomParams {
            name,
            charge,
            lj_sigma,
            lj_epsilon,
        })
}

fn arb_residue() -> impl Strategy<Value = ResidueTemplate> {
    ("[A-Z]{0,8}", proptest::collection::vec(arb_atom(), 0..8))
        .prop_map(|(name, atoms)| ResidueTemplate { name, atoms })
}

proptest! {
    #[test]
    fn atom_roundtrip(atom in arb_atom()) {
        let registry = fixture_registry();
        let bytes = serialize_to_vec(&registry, &atom).unwrap();
        let read: AtomParams = deserialize_from_slice(&registry, &bytes).unwrap();
        prop_assert_eq!(read, atom);
    }

    #[test]
    fn residue_roundtrip(residue in arb_residue()) {
        let registry = fixture_registry();
        let bytes = serialize_to_vec(&registry, &residue).unwrap();
        let read: ResidueTemplate = deserialize_from_slice(&registry, &bytes).unwrap();
        prop_assert_eq!(read, residue);
    }

    #[test]
    fn digest_is_a_pure_function(name in ".{0,64}") {
        prop_assert_eq!(magic_of(&name), magic_of(&name));
    }

    #[test]
    fn header_bytes_roundtrip(raw_magic in any::<u32>(), version in any::<u32>()) {
        let header = StreamHeader::new(MagicId::new(raw_magic), version);
        prop_assert_eq!(StreamHeader::from_bytes(&header.to_bytes()), header);
        prop_assert_eq!(peek_header(&header.to_bytes()).unwrap(), header);
    }

    #[test]
    fn truncated_streams_never_decode(residue in arb_residue(), cut in 0usize..512) {
        let registry = fixture_registry();
        let bytes = serialize_to_vec(&registry, &residue).unwrap();
        prop_assume!(cut < bytes.len());
        let result = deserialize_from_slice::<ResidueTemplate>(&registry, &bytes[..cut]);
        prop_assert!(result.is_err());
    }

    #[test]
    fn arbitrary_garbage_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let registry = fixture_registry();
        // Err or Ok are both fine; a panic would fail the test harness.
        let _ = deserialize_from_slice::<AtomParams>(&registry, &bytes);
        let _ = stele::identify(&registry, &bytes);
    }
}
