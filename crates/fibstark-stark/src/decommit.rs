//! FRI decommit phase: answer channel-drawn queries with authenticated
//! openings of the trace and of every FRI layer.
//!
//! Send order per query:
//!   1. trace value/path at `idx`, `idx + 8`, `idx + 16`
//!   2. per non-final layer: element, path, sibling element, sibling path
//!   3. the last layer's first element

use fibstark_crypto::{Channel, HashFunction};
use fibstark_merkle::MerkleTree;
use tracing::{debug, info_span};

use crate::error::{Result, StarkError};
use crate::field::Felt;
use crate::fri::FriLayers;
use crate::params::{BLOWUP, MAX_QUERY_INDEX};
use crate::proof::{LayerOpening, Opening, QueryDecommitment};

/// Open `values[index]`, send value then path.
fn open_and_send<H: HashFunction>(
    values: &[Felt],
    tree: &MerkleTree<H>,
    index: usize,
    channel: &mut Channel<H>,
) -> Result<Opening> {
    let value = values.get(index).copied().ok_or(StarkError::IndexOutOfRange {
        index,
        offset: 0,
        len: values.len(),
    })?;
    let path = tree.prove(index)?;
    channel.send(&value.to_be_bytes_trimmed());
    channel.send(&path.to_bytes());
    Ok(Opening {
        index,
        value: value.as_u64(),
        path,
    })
}

/// Per-layer openings for query `idx` (all layers but the last), followed
/// by the last layer's element.
pub fn decommit_on_fri_layers<H: HashFunction>(
    idx: usize,
    fri: &FriLayers<H>,
    channel: &mut Channel<H>,
) -> Result<(Vec<LayerOpening>, Felt)> {
    let Some((last, rest)) = fri.layers.split_last() else {
        return Err(StarkError::InvalidInput("empty FRI layer chain".into()));
    };
    let mut openings = Vec::with_capacity(rest.len());
    for (layer, tree) in rest.iter().zip(&fri.trees) {
        let length = layer.len();
        let i = idx % length;
        let sib = (i + length / 2) % length;
        let element = open_and_send(layer, tree, i, channel)?;
        let sibling = open_and_send(layer, tree, sib, channel)?;
        openings.push(LayerOpening { element, sibling });
    }
    let last_element = last
        .first()
        .copied()
        .ok_or_else(|| StarkError::DomainIntegrity("final FRI layer is empty".into()))?;
    channel.send(&last_element.to_be_bytes_trimmed());
    Ok((openings, last_element))
}

/// Open the trace at `idx`, `idx + BLOWUP`, `idx + 2·BLOWUP`, then the FRI
/// layers.
pub fn decommit_on_query<H: HashFunction>(
    idx: usize,
    trace_evaluations: &[Felt],
    trace_tree: &MerkleTree<H>,
    fri: &FriLayers<H>,
    channel: &mut Channel<H>,
) -> Result<QueryDecommitment> {
    let len = trace_evaluations.len();
    if idx + 2 * BLOWUP >= len {
        return Err(StarkError::IndexOutOfRange {
            index: idx,
            offset: 2 * BLOWUP,
            len,
        });
    }
    let trace = [0, BLOWUP, 2 * BLOWUP]
        .into_iter()
        .map(|off| open_and_send(trace_evaluations, trace_tree, idx + off, channel))
        .collect::<Result<Vec<_>>>()?;
    let (layers, last) = decommit_on_fri_layers(idx, fri, channel)?;
    Ok(QueryDecommitment {
        index: idx,
        trace,
        layers,
        last_element: last.as_u64(),
    })
}

/// Draw `num_queries` indices and decommit each.
pub fn decommit_fri<H: HashFunction>(
    num_queries: usize,
    trace_evaluations: &[Felt],
    trace_tree: &MerkleTree<H>,
    fri: &FriLayers<H>,
    channel: &mut Channel<H>,
) -> Result<Vec<QueryDecommitment>> {
    let _span = info_span!("decommit", num_queries).entered();
    (0..num_queries)
        .map(|q| {
            let idx = query_index(channel)?;
            debug!(query = q, idx, "decommitting");
            decommit_on_query(idx, trace_evaluations, trace_tree, fri, channel)
        })
        .collect()
}

/// Draw a query index in `[0, 8191 - 16]`.
pub fn query_index<H: HashFunction>(channel: &mut Channel<H>) -> Result<usize> {
    let raw = channel.receive_random_int(0, MAX_QUERY_INDEX);
    usize::try_from(raw)
        .map_err(|_| StarkError::InvalidInput(format!("query index {raw} does not fit in usize")))
}
