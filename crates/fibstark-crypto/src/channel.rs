//! Fiat-Shamir channel.
//!
//! The channel is a strictly sequential automaton: every `send` folds bytes
//! into a running digest and every draw is a pure function of that digest.
//! Two channels fed the same sends produce the same draws. Not `Clone`.

use core::fmt;
use core::marker::PhantomData;

use fibstark_field::Fp64;
use serde::{Deserialize, Serialize};

use crate::hash::{Blake3Hash, HashFunction};

/// One logged channel operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum TranscriptEntry {
    /// Bytes sent by the prover (hex).
    Send(String),
    /// Integer drawn by the verifier.
    ReceiveRandomInt(u64),
    /// Field element drawn by the verifier.
    ReceiveRandomFieldElement(u64),
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send(h) => write!(f, "send:{h}"),
            Self::ReceiveRandomInt(v) => write!(f, "receive_random_int:{v}"),
            Self::ReceiveRandomFieldElement(v) => write!(f, "receive_random_field_element:{v}"),
        }
    }
}

/// Fiat-Shamir transcript over hash `H`.
#[derive(Debug)]
pub struct Channel<H: HashFunction = Blake3Hash> {
    state: Vec<u8>,
    proof: Vec<TranscriptEntry>,
    _hash: PhantomData<H>,
}

impl<H: HashFunction> Default for Channel<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HashFunction> Channel<H> {
    /// Fresh channel; the initial state is the single byte `0x00`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: vec![0],
            proof: Vec::with_capacity(64),
            _hash: PhantomData,
        }
    }

    /// Prover message: log it and set `state = H(state ∥ bytes)`.
    pub fn send(&mut self, bytes: &[u8]) {
        self.proof.push(TranscriptEntry::Send(hex::encode(bytes)));
        self.state = H::hash_parts(&[self.state.as_slice(), bytes]).to_vec();
    }

    /// Verifier integer in `[min, max]` (bounds are swapped if reversed).
    pub fn receive_random_int(&mut self, min: u64, max: u64) -> u64 {
        let v = self.draw(min, max);
        self.proof.push(TranscriptEntry::ReceiveRandomInt(v));
        v
    }

    /// Verifier field element, drawn as an integer in `[0, P - 2]`.
    pub fn receive_random_field_element<const P: u64>(&mut self) -> Fp64<P> {
        let v = self.draw(0, P.saturating_sub(2));
        self.proof.push(TranscriptEntry::ReceiveRandomFieldElement(v));
        Fp64::from_u64(v)
    }

    /// Current digest.
    #[must_use]
    pub fn state(&self) -> &[u8] {
        &self.state
    }

    /// Current digest, hex encoded.
    #[must_use]
    pub fn state_hex(&self) -> String {
        hex::encode(&self.state)
    }

    /// Every operation so far, in order.
    #[must_use]
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.proof
    }

    /// Consume the channel, keeping its log.
    #[must_use]
    pub fn into_transcript(self) -> Vec<TranscriptEntry> {
        self.proof
    }

    /// `(state mod (max - min + 1)) + min`, then `state = H(state)`.
    fn draw(&mut self, min: u64, max: u64) -> u64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = u128::from(hi - lo) + 1;
        let reduced = be_mod(&self.state, span);
        self.state = H::hash(&self.state).to_vec();
        lo + reduced as u64
    }
}

/// Big-endian byte string interpreted as an unsigned integer, reduced mod `m`.
fn be_mod(bytes: &[u8], m: u128) -> u128 {
    bytes
        .iter()
        .fold(0u128, |acc, &b| ((acc << 8) | u128::from(b)) % m)
}
