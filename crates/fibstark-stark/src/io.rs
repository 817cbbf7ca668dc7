//! Persistence.
//!
//! - [`DomainParametersRecord`]: decimal strings + hex commitment, JSON.
//! - [`StarkProof`]: JSON or CBOR, picked by file extension (`.json` /
//!   `.cbor`, case-insensitive). Unknown extensions are rejected for reads
//!   and default to JSON for writes.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use fibstark_crypto::Digest32;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::DomainParameters;
use crate::error::{Result, StarkError};
use crate::field::{Felt, FeltPoly, FieldContext, FIB_MODULUS};
use crate::proof::StarkProof;

/// Textual record of [`DomainParameters`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainParametersRecord {
    /// Field modulus.
    pub field_modulus: String,
    /// Trace values.
    pub computation_trace: Vec<String>,
    /// Generator of `G`.
    pub g_generator: String,
    /// Elements of `G`.
    pub g_subgroup: Vec<String>,
    /// Generator of `H`.
    pub h_generator: String,
    /// Elements of `H`.
    pub h_subgroup: Vec<String>,
    /// Coset evaluation domain.
    pub evaluation_domain: Vec<String>,
    /// Interpolant coefficients, ascending degree.
    pub interpolant_polynomial: Vec<String>,
    /// Interpolant over the evaluation domain.
    pub polynomial_evaluations: Vec<String>,
    /// Merkle root of the evaluations (hex).
    pub evaluation_commitment: String,
}

fn dec(v: &[Felt]) -> Vec<String> {
    v.iter().map(ToString::to_string).collect()
}

fn parse_one(s: &str, field: &str) -> Result<Felt> {
    s.parse()
        .map_err(|e| StarkError::Codec(format!("{field}: {e}")))
}

fn parse_all(v: &[String], field: &str) -> Result<Vec<Felt>> {
    v.iter().map(|s| parse_one(s, field)).collect()
}

impl From<&DomainParameters> for DomainParametersRecord {
    fn from(p: &DomainParameters) -> Self {
        Self {
            field_modulus: FIB_MODULUS.to_string(),
            computation_trace: dec(&p.trace),
            g_generator: p.g.to_string(),
            g_subgroup: dec(&p.g_subgroup),
            h_generator: p.h.to_string(),
            h_subgroup: dec(&p.h_subgroup),
            evaluation_domain: dec(&p.evaluation_domain),
            interpolant_polynomial: dec(p.trace_polynomial.coeffs()),
            polynomial_evaluations: dec(&p.evaluations),
            evaluation_commitment: hex::encode(p.evaluation_root),
        }
    }
}

impl DomainParametersRecord {
    /// Decode, then re-run the structural domain checks.
    pub fn into_parameters(self, ctx: &FieldContext<FIB_MODULUS>) -> Result<DomainParameters> {
        if self.field_modulus.trim() != FIB_MODULUS.to_string() {
            return Err(StarkError::Codec(format!(
                "field modulus {} does not match {FIB_MODULUS}",
                self.field_modulus
            )));
        }
        let root_bytes = hex::decode(self.evaluation_commitment.trim())
            .map_err(|e| StarkError::Codec(format!("evaluation_commitment: {e}")))?;
        let evaluation_root: Digest32 = root_bytes.as_slice().try_into().map_err(|_| {
            StarkError::Codec(format!(
                "evaluation_commitment has {} bytes, expected 32",
                root_bytes.len()
            ))
        })?;

        let params = DomainParameters {
            trace: parse_all(&self.computation_trace, "computation_trace")?,
            g: parse_one(&self.g_generator, "g_generator")?,
            g_subgroup: parse_all(&self.g_subgroup, "g_subgroup")?,
            h: parse_one(&self.h_generator, "h_generator")?,
            h_subgroup: parse_all(&self.h_subgroup, "h_subgroup")?,
            evaluation_domain: parse_all(&self.evaluation_domain, "evaluation_domain")?,
            trace_polynomial: FeltPoly::new(parse_all(
                &self.interpolant_polynomial,
                "interpolant_polynomial",
            )?),
            evaluations: parse_all(&self.polynomial_evaluations, "polynomial_evaluations")?,
            evaluation_root,
        };
        params.validate(ctx)?;
        Ok(params)
    }
}

/// Ensure the parent directory for a file exists (no-op if none).
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|source| io_err(dir, source))?;
        }
    }
    Ok(())
}

fn io_err(path: &Path, source: std::io::Error) -> StarkError {
    StarkError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn ext_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let f = File::open(path).map_err(|e| io_err(path, e))?;
    serde_json::from_reader(BufReader::new(f))
        .map_err(|e| StarkError::Codec(format!("JSON {}: {e}", path.display())))
}

fn write_json<T: Serialize>(path: &Path, v: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let f = File::create(path).map_err(|e| io_err(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(f), v)
        .map_err(|e| StarkError::Codec(format!("JSON {}: {e}", path.display())))
}

fn read_cbor<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let f = File::open(path).map_err(|e| io_err(path, e))?;
    ciborium::de::from_reader(BufReader::new(f))
        .map_err(|e| StarkError::Codec(format!("CBOR {}: {e}", path.display())))
}

fn write_cbor<T: Serialize>(path: &Path, v: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let f = File::create(path).map_err(|e| io_err(path, e))?;
    ciborium::ser::into_writer(v, BufWriter::new(f))
        .map_err(|e| StarkError::Codec(format!("CBOR {}: {e}", path.display())))
}

/* ------------------------------ Domain params ------------------------------ */

/// Write parameters as a pretty JSON record.
pub fn write_domain_parameters(path: impl AsRef<Path>, params: &DomainParameters) -> Result<()> {
    write_json(path.as_ref(), &DomainParametersRecord::from(params))
}

/// Read and validate a JSON parameters record.
pub fn read_domain_parameters(
    path: impl AsRef<Path>,
    ctx: &FieldContext<FIB_MODULUS>,
) -> Result<DomainParameters> {
    read_json::<DomainParametersRecord>(path.as_ref())?.into_parameters(ctx)
}

/* ---------------------------------- Proofs --------------------------------- */

/// Read a proof, format chosen by extension.
pub fn read_proof_auto(path: impl AsRef<Path>) -> Result<StarkProof> {
    let path = path.as_ref();
    match ext_lower(path).as_deref() {
        Some("json") => read_json(path),
        Some("cbor") => read_cbor(path),
        Some(other) => Err(StarkError::Codec(format!(
            "unsupported proof extension: {other} (supported: .json, .cbor)"
        ))),
        None => Err(StarkError::Codec(
            "path has no extension (expected .json or .cbor)".into(),
        )),
    }
}

/// Write a proof; `.cbor` gives CBOR, anything else JSON.
pub fn write_proof_auto(path: impl AsRef<Path>, proof: &StarkProof) -> Result<()> {
    let path = path.as_ref();
    match ext_lower(path).as_deref() {
        Some("cbor") => write_cbor(path, proof),
        _ => write_json(path, proof),
    }
}

/// In-memory CBOR encoding of a proof.
pub fn proof_to_cbor(proof: &StarkProof) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    ciborium::ser::into_writer(proof, &mut out).map_err(|e| StarkError::Codec(format!("CBOR: {e}")))?;
    Ok(out)
}

/// Inverse of [`proof_to_cbor`].
pub fn proof_from_cbor(bytes: &[u8]) -> Result<StarkProof> {
    ciborium::de::from_reader(bytes).map_err(|e| StarkError::Codec(format!("CBOR: {e}")))
}
