//! Hash primitives.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

/// 32-byte digest.
pub type Digest32 = [u8; 32];

/// Fixed-output 256-bit hash used by the channel and the Merkle trees.
pub trait HashFunction: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Short identifier (`"blake3"`, `"sha3"`), recorded in proofs.
    const NAME: &'static str;

    /// Hash the concatenation of `parts`.
    fn hash_parts(parts: &[&[u8]]) -> Digest32;

    /// Hash a single byte string.
    #[inline]
    fn hash(bytes: &[u8]) -> Digest32 {
        Self::hash_parts(&[bytes])
    }
}

/// BLAKE3 (default).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Blake3Hash;

impl HashFunction for Blake3Hash {
    const NAME: &'static str = "blake3";

    fn hash_parts(parts: &[&[u8]]) -> Digest32 {
        let mut h = blake3::Hasher::new();
        for p in parts {
            h.update(p);
        }
        h.finalize().into()
    }
}

/// SHA3-256.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Sha3Hash;

impl HashFunction for Sha3Hash {
    const NAME: &'static str = "sha3";

    fn hash_parts(parts: &[&[u8]]) -> Digest32 {
        let mut h = Sha3_256::new();
        for p in parts {
            h.update(p);
        }
        let out = h.finalize();
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&out);
        arr
    }
}

/// Runtime selector for the hash, used by configuration and the CLI.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashKind {
    /// [`Blake3Hash`].
    #[default]
    Blake3,
    /// [`Sha3Hash`].
    Sha3,
}

impl HashKind {
    /// Canonical name, equal to the matching [`HashFunction::NAME`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blake3 => Blake3Hash::NAME,
            Self::Sha3 => Sha3Hash::NAME,
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blake3" => Ok(Self::Blake3),
            "sha3" | "sha3-256" | "sha3_256" => Ok(Self::Sha3),
            other => Err(format!("unknown hash '{other}' (expected blake3 or sha3)")),
        }
    }
}
