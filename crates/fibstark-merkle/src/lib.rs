//! Merkle commitments over ordered byte-string leaves.
//!
//! - leaf digest: `H(0x00 ∥ leaf)`
//! - parent: `H(0x01 ∥ left ∥ right)`
//! - an unpaired node on an odd-sized level is promoted unchanged
//!
//! All levels are kept, so [`MerkleTree::prove`] is `O(log n)`.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

use core::marker::PhantomData;

use fibstark_crypto::{Blake3Hash, Digest32, HashFunction};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Merkle construction/opening errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// No leaves to commit to.
    #[error("cannot build a Merkle tree over zero leaves")]
    Empty,
    /// Opening requested past the last leaf.
    #[error("leaf index {index} out of range for {len} leaves")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of leaves.
        len: usize,
    },
}

/// Position of the sibling relative to the running node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Sibling is the left child: parent = `H(0x01 ∥ sibling ∥ node)`.
    Left,
    /// Sibling is the right child: parent = `H(0x01 ∥ node ∥ sibling)`.
    Right,
}

impl Side {
    /// Byte tag used in transcript serialization.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// One step of an audit path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Sibling digest.
    pub sibling: Digest32,
    /// Where the sibling sits.
    pub side: Side,
}

/// Siblings from leaf to root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditPath {
    /// Steps, bottom to top.
    pub steps: Vec<PathStep>,
}

impl AuditPath {
    /// Transcript encoding: per step, the side byte then the 32-byte sibling.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.steps.len() * 33);
        for s in &self.steps {
            out.push(s.side.as_byte());
            out.extend_from_slice(&s.sibling);
        }
        out
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the path is empty (single-leaf tree).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

const LEAF_TAG: u8 = 0x00;
const NODE_TAG: u8 = 0x01;

/// Digest of one leaf.
#[must_use]
pub fn hash_leaf<H: HashFunction>(leaf: &[u8]) -> Digest32 {
    H::hash_parts(&[core::slice::from_ref(&LEAF_TAG), leaf])
}

/// Digest of an inner node.
#[must_use]
pub fn hash_node<H: HashFunction>(left: &Digest32, right: &Digest32) -> Digest32 {
    H::hash_parts(&[core::slice::from_ref(&NODE_TAG), left.as_slice(), right.as_slice()])
}

/// Merkle tree over hash `H`.
#[derive(Clone, Debug)]
pub struct MerkleTree<H: HashFunction = Blake3Hash> {
    // levels[0] = leaf digests, levels.last() = [root]
    levels: Vec<Vec<Digest32>>,
    _hash: PhantomData<H>,
}

impl<H: HashFunction> MerkleTree<H> {
    /// Build a tree over `leaves`.
    pub fn new<L: AsRef<[u8]>>(leaves: &[L]) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::Empty);
        }
        let mut lvl: Vec<Digest32> = leaves.iter().map(|l| hash_leaf::<H>(l.as_ref())).collect();
        let mut levels = Vec::new();
        while lvl.len() > 1 {
            let next = lvl
                .chunks(2)
                .map(|pair| match pair {
                    [l, r] => hash_node::<H>(l, r),
                    _ => pair[0],
                })
                .collect();
            levels.push(lvl);
            lvl = next;
        }
        levels.push(lvl);
        Ok(Self {
            levels,
            _hash: PhantomData,
        })
    }

    /// Root digest.
    #[must_use]
    pub fn root(&self) -> Digest32 {
        self.levels
            .last()
            .and_then(|l| l.first())
            .copied()
            .unwrap_or_default()
    }

    /// Number of committed leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Always false: construction rejects empty leaf sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Audit path for leaf `index`.
    pub fn prove(&self, index: usize) -> Result<AuditPath, MerkleError> {
        let len = self.len();
        if index >= len {
            return Err(MerkleError::IndexOutOfRange { index, len });
        }
        let mut idx = index;
        let mut steps = Vec::with_capacity(self.levels.len());
        for lvl in &self.levels[..self.levels.len() - 1] {
            let sib = idx ^ 1;
            if sib < lvl.len() {
                let side = if idx & 1 == 0 { Side::Right } else { Side::Left };
                steps.push(PathStep {
                    sibling: lvl[sib],
                    side,
                });
            }
            idx >>= 1;
        }
        Ok(AuditPath { steps })
    }

    /// Recompute the root from `leaf` and `path` and compare.
    #[must_use]
    pub fn verify(root: &Digest32, leaf: &[u8], path: &AuditPath) -> bool {
        let cur = path.steps.iter().fold(hash_leaf::<H>(leaf), |cur, s| match s.side {
            Side::Left => hash_node::<H>(&s.sibling, &cur),
            Side::Right => hash_node::<H>(&cur, &s.sibling),
        });
        &cur == root
    }
}

/// Root of `leaves` without keeping the tree.
pub fn root<H: HashFunction, L: AsRef<[u8]>>(leaves: &[L]) -> Result<Digest32, MerkleError> {
    MerkleTree::<H>::new(leaves).map(|t| t.root())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibstark_crypto::Sha3Hash;

    fn leaves(n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|i| (i as u32).to_be_bytes().to_vec()).collect()
    }

    #[test]
    fn empty_is_rejected() {
        let none: [&[u8]; 0] = [];
        assert_eq!(MerkleTree::<Blake3Hash>::new(&none).unwrap_err(), MerkleError::Empty);
    }

    #[test]
    fn two_leaf_root_by_hand() {
        let ls = leaves(2);
        let t = MerkleTree::<Sha3Hash>::new(&ls).unwrap();
        let leaf = |b: &[u8]| Sha3Hash::hash_parts(&[&[0x00], b]);
        let (l, r) = (leaf(&ls[0]), leaf(&ls[1]));
        let want = Sha3Hash::hash_parts(&[&[0x01], l.as_slice(), r.as_slice()]);
        assert_eq!(t.root(), want);
    }

    #[test]
    fn inner_node_cannot_pose_as_a_leaf() {
        // A 64-byte "leaf" equal to two child digests must not hash to their parent.
        let ls = leaves(2);
        let t = MerkleTree::<Blake3Hash>::new(&ls).unwrap();
        let (l, r) = (hash_leaf::<Blake3Hash>(&ls[0]), hash_leaf::<Blake3Hash>(&ls[1]));
        let mut glued = l.to_vec();
        glued.extend_from_slice(&r);
        assert_ne!(hash_leaf::<Blake3Hash>(&glued), t.root());
        assert_ne!(Blake3Hash::hash(&glued), t.root());
        assert!(!MerkleTree::<Blake3Hash>::verify(&t.root(), &glued, &AuditPath::default()));
    }

    #[test]
    fn every_leaf_verifies_power_of_two_and_odd() {
        for n in [1usize, 2, 5, 8, 13] {
            let ls = leaves(n);
            let t = MerkleTree::<Blake3Hash>::new(&ls).unwrap();
            for (i, l) in ls.iter().enumerate() {
                let p = t.prove(i).unwrap();
                assert!(MerkleTree::<Blake3Hash>::verify(&t.root(), l, &p), "n={n} i={i}");
            }
        }
    }

    #[test]
    fn wrong_leaf_fails_and_index_checked() {
        let ls = leaves(8);
        let t = MerkleTree::<Blake3Hash>::new(&ls).unwrap();
        let p = t.prove(3).unwrap();
        assert_eq!(p.len(), 3);
        assert!(!MerkleTree::<Blake3Hash>::verify(&t.root(), &ls[4], &p));
        assert_eq!(
            t.prove(8).unwrap_err(),
            MerkleError::IndexOutOfRange { index: 8, len: 8 }
        );
    }

    #[test]
    fn path_bytes_layout() {
        let ls = leaves(4);
        let t = MerkleTree::<Blake3Hash>::new(&ls).unwrap();
        let p = t.prove(1).unwrap();
        let b = p.to_bytes();
        assert_eq!(b.len(), 2 * 33);
        assert_eq!(b[0], Side::Left.as_byte());
        assert_eq!(&b[1..33], &hash_leaf::<Blake3Hash>(&ls[0]));
        assert_eq!(b[33], Side::Right.as_byte());
    }
}
