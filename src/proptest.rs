//! Strategies for property-based testing with `proptest`.
use crate::node_array::{NodeArray, NodeSegment};
use ::proptest::collection::vec;
use ::proptest::prelude::*;

/// A batch of segment requests with ids `first_id, first_id + 1, ...`.
pub fn segment_batch(
    first_id: u32,
    max_segments: usize,
    max_width: usize,
) -> impl Strategy<Value = Vec<(u32, NodeSegment)>> {
    vec(0..=max_width, 0..=max_segments).prop_map(move |widths| {
        widths
            .into_iter()
            .enumerate()
            .map(|(i, width)| {
                let id = first_id + i as u32;
                (id, NodeSegment::new(width, format!("segment{id}")))
            })
            .collect()
    })
}

/// Values in a modest range, so that sums of a few of them stay exact enough to compare.
pub fn nodal_value() -> impl Strategy<Value = f64> {
    -10.0..10.0
}

/// A node array with up to `max_nodes` nodes and a single batch of segments filled with
/// arbitrary values. Segment ids start at 1.
pub fn node_array(
    max_nodes: usize,
    max_segments: usize,
    max_width: usize,
) -> impl Strategy<Value = NodeArray<f64>> {
    (0..=max_nodes, segment_batch(1, max_segments, max_width))
        .prop_flat_map(|(num_nodes, batch)| {
            let stride: usize = batch.iter().map(|(_, segment)| segment.width()).sum();
            let values = vec(nodal_value(), num_nodes * stride);
            (Just(num_nodes), Just(batch), values)
        })
        .prop_map(|(num_nodes, batch, values)| {
            let mut node_array = NodeArray::new(num_nodes);
            node_array
                .add_segments_with_values(batch, &values)
                .expect("Generated batch has distinct ids and matching values.");
            node_array
        })
}
