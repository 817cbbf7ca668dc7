//! Every opening of every tree verifies against its root; no opening verifies
//! against a different leaf.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use fibstark_crypto::{Blake3Hash, Sha3Hash};
use fibstark_merkle::{root, MerkleTree};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn openings_verify(
        leaves in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..12), 1..40),
        pick in any::<prop::sample::Index>(),
    ) {
        let t = MerkleTree::<Sha3Hash>::new(&leaves).unwrap();
        prop_assert_eq!(root::<Sha3Hash, _>(&leaves).unwrap(), t.root());
        let i = pick.index(leaves.len());
        let path = t.prove(i).unwrap();
        prop_assert!(MerkleTree::<Sha3Hash>::verify(&t.root(), &leaves[i], &path));

        let mut forged = leaves[i].clone();
        forged.push(0xa5);
        prop_assert!(!MerkleTree::<Sha3Hash>::verify(&t.root(), &forged, &path));
    }
}

#[test]
fn big_endian_field_leaves() {
    // Minimal big-endian encodings, zero as the empty string.
    let leaves: Vec<Vec<u8>> = vec![vec![], vec![1], vec![0x0b, 0xb8], vec![0x8b, 0x66, 0xe0, 0x11]];
    let t = MerkleTree::<Blake3Hash>::new(&leaves).unwrap();
    for (i, l) in leaves.iter().enumerate() {
        let p = t.prove(i).unwrap();
        assert_eq!(p.len(), 2);
        assert!(MerkleTree::<Blake3Hash>::verify(&t.root(), l, &p));
    }
}
