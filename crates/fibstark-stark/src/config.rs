//! Prover configuration (TOML).

use std::fs;
use std::path::Path;

use fibstark_crypto::HashKind;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StarkError};
use crate::params::DEFAULT_NUM_QUERIES;

/// Tunable security knobs.
///
/// ```toml
/// num_queries = 3
/// hash = "blake3"   # or "sha3"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProverConfig {
    /// Independent FRI queries to decommit.
    pub num_queries: usize,
    /// Hash used by the channel and every Merkle tree.
    pub hash: HashKind,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            num_queries: DEFAULT_NUM_QUERIES,
            hash: HashKind::default(),
        }
    }
}

impl ProverConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).map_err(|e| StarkError::Codec(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| StarkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject configurations that cannot produce a proof.
    pub fn validate(&self) -> Result<()> {
        if self.num_queries == 0 {
            return Err(StarkError::InvalidInput(
                "num_queries must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
