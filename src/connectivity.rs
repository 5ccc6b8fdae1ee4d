//! Element-side collaborator: element arrays whose element segments reference nodes.
use crate::id_set::ObjectIdSet;
use serde::{Deserialize, Serialize};

/// The largest number of nodes a single element may reference.
pub const MAX_NODES_PER_ELEMENT: usize = 256;

/// An array of elements, partitioned into element segments.
///
/// Every element segment assigns each element of the array the same number of node indices.
/// Different segments may describe different connectivity patterns for the same elements
/// (for instance corner nodes versus all nodes of a quadratic element).
pub trait ElementArray {
    fn num_elements(&self) -> usize;

    fn is_segment_id(&self, id: u32) -> bool;

    /// The node indices of element `element_index` in element segment `segment_id`.
    ///
    /// Returns `None` if the segment does not exist or the element index is out of bounds.
    fn element_nodes(&self, segment_id: u32, element_index: usize) -> Option<&[usize]>;
}

/// Connectivity of one element segment, stored contiguously element by element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSegmentConnectivity {
    name: String,
    nodes_per_element: usize,
    node_indices: Vec<usize>,
}

impl ElementSegmentConnectivity {
    /// Constructs segment connectivity from a flat list of node indices.
    ///
    /// # Panics
    ///
    /// Panics if `nodes_per_element` is zero or larger than [`MAX_NODES_PER_ELEMENT`],
    /// or if the number of indices is not a multiple of `nodes_per_element`.
    pub fn from_flat(name: impl Into<String>, nodes_per_element: usize, node_indices: Vec<usize>) -> Self {
        assert!(
            nodes_per_element > 0 && nodes_per_element <= MAX_NODES_PER_ELEMENT,
            "Nodes per element must be in 1 ..= {MAX_NODES_PER_ELEMENT}"
        );
        assert_eq!(
            node_indices.len() % nodes_per_element,
            0,
            "Number of node indices must be divisible by the number of nodes per element."
        );
        Self {
            name: name.into(),
            nodes_per_element,
            node_indices,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes_per_element(&self) -> usize {
        self.nodes_per_element
    }

    pub fn num_elements(&self) -> usize {
        self.node_indices.len() / self.nodes_per_element
    }

    pub fn element_nodes(&self, element_index: usize) -> Option<&[usize]> {
        self.node_indices.chunks_exact(self.nodes_per_element).nth(element_index)
    }
}

/// A simple owned [`ElementArray`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementArrayBuf {
    num_elements: usize,
    segments: ObjectIdSet<ElementSegmentConnectivity>,
}

impl ElementArrayBuf {
    pub fn new(num_elements: usize) -> Self {
        Self {
            num_elements,
            segments: ObjectIdSet::new(),
        }
    }

    /// Adds an element segment and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the segment does not describe exactly `num_elements` elements.
    pub fn add_segment(&mut self, segment: ElementSegmentConnectivity) -> u32 {
        assert_eq!(
            segment.num_elements(),
            self.num_elements,
            "Element segment must describe every element of the array."
        );
        let id = self.segments.free_id();
        self.segments
            .insert(id, segment)
            .expect("Internal error: Free id must be insertable.");
        id
    }

    pub fn segment(&self, id: u32) -> Option<&ElementSegmentConnectivity> {
        self.segments.get(id)
    }

    pub fn segment_ids<'a>(&'a self) -> impl 'a + Iterator<Item = u32> {
        self.segments.ids()
    }
}

impl ElementArray for ElementArrayBuf {
    fn num_elements(&self) -> usize {
        self.num_elements
    }

    fn is_segment_id(&self, id: u32) -> bool {
        self.segments.is_id(id)
    }

    fn element_nodes(&self, segment_id: u32, element_index: usize) -> Option<&[usize]> {
        self.segments.get(segment_id)?.element_nodes(element_index)
    }
}
