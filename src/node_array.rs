//! Interleaved storage of per-node field values.
//!
//! A [`NodeArray`] owns one buffer of `num_nodes * stride` scalars. The buffer is partitioned
//! into node segments: each live segment occupies `width` consecutive scalars of every node
//! block, starting at the segment's offset. For a node array with a displacement segment of
//! width 3 followed by a temperature segment of width 1, the buffer reads
//!
//! ```text
//! [ ux0 uy0 uz0 t0 | ux1 uy1 uz1 t1 | ... ]
//! ```
//!
//! Adding segments re-lays out the whole buffer. Access to segment values goes through
//! [`NodeSegmentView`] and [`NodeSegmentViewMut`], which borrow the node array and therefore
//! can not outlive a structural change.
use crate::connectivity::ElementArray;
use crate::containment::ContainmentRegistry;
use crate::id_set::ObjectIdSet;
use crate::{NodeFieldError, Real};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

mod transfer;
mod view;

pub use view::{NodeSegmentView, NodeSegmentViewMut};

/// Metadata of a node segment: a named slice of fixed width in every node block.
///
/// The offset is assigned by the node array when the segment is admitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSegment {
    width: usize,
    name: String,
    offset: usize,
}

impl NodeSegment {
    pub fn new(width: usize, name: impl Into<String>) -> Self {
        Self {
            width,
            name: name.into(),
            offset: 0,
        }
    }

    /// Number of scalars per node.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Offset of the segment within each node block.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Outcome of a single request in an `add_segments` batch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SegmentAdmission {
    Admitted,
    Duplicate,
}

/// Initial values of newly admitted segments.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SegmentInit<'a, T> {
    Zero,
    /// The same value in every slot of every new segment.
    Value(T),
    /// Values for every node and every new degree of freedom, node by node.
    ///
    /// Within a node, the values of the new segments follow each other in request order.
    Values(&'a [T]),
}

#[derive(Debug, Clone)]
pub struct NodeArray<T> {
    name: String,
    num_nodes: usize,
    stride: usize,
    values: Vec<T>,
    segments: ObjectIdSet<NodeSegment>,
    element_segments: ContainmentRegistry,
    epoch: u64,
}

impl<T: Real> Default for NodeArray<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T: Real> NodeArray<T> {
    /// Creates an empty node array for the given number of nodes.
    ///
    /// A node count of zero denotes a node array whose size is not yet known,
    /// see [`set_num_nodes`](Self::set_num_nodes).
    pub fn new(num_nodes: usize) -> Self {
        Self {
            name: String::new(),
            num_nodes,
            stride: 0,
            values: Vec::new(),
            segments: ObjectIdSet::new(),
            element_segments: ContainmentRegistry::new(),
            epoch: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Changes the number of nodes of a node array without live segments.
    pub fn set_num_nodes(&mut self, num_nodes: usize) -> Result<(), NodeFieldError> {
        if !self.segments.is_empty() {
            warn!(
                "Refusing to resize node array '{}' with {} live segments",
                self.name,
                self.segments.len()
            );
            return Err(NodeFieldError::SegmentsAlive);
        }
        self.num_nodes = num_nodes;
        self.epoch += 1;
        Ok(())
    }

    /// Total number of scalars stored per node, i.e. the sum of the widths of all live segments.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Counter incremented by every structural change of the node array.
    ///
    /// Offsets and strides remembered across calls are only meaningful as long as the epoch
    /// is unchanged.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_current_epoch(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    /// The whole interleaved value buffer.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    pub fn free_segment_id(&self) -> u32 {
        self.segments.free_id()
    }

    pub fn free_segment_ids(&self, count: usize) -> Vec<u32> {
        self.segments.free_ids(count)
    }

    pub fn is_segment_id(&self, id: u32) -> bool {
        self.segments.is_id(id)
    }

    /// Ids of all live segments in ascending order.
    pub fn segment_ids(&self) -> Vec<u32> {
        let mut ids: Vec<_> = self.segments.ids().collect();
        ids.sort_unstable();
        ids
    }

    /// All live segments in layout order.
    pub fn segments<'a>(&'a self) -> impl 'a + Iterator<Item = (u32, &'a NodeSegment)> {
        self.segments.iter()
    }

    pub fn segment_info(&self, id: u32) -> Result<&NodeSegment, NodeFieldError> {
        self.segments.get(id).ok_or(NodeFieldError::UnknownSegment(id))
    }

    pub fn segment(&self, id: u32) -> Result<NodeSegmentView<'_, T>, NodeFieldError> {
        let segment = self.segments.get(id).ok_or(NodeFieldError::UnknownSegment(id))?;
        Ok(NodeSegmentView::new(segment, &self.values, self.stride, self.num_nodes))
    }

    pub fn segment_mut(&mut self, id: u32) -> Result<NodeSegmentViewMut<'_, T>, NodeFieldError> {
        let segment = self.segments.get(id).ok_or(NodeFieldError::UnknownSegment(id))?;
        Ok(NodeSegmentViewMut::new(segment, &mut self.values, self.stride, self.num_nodes))
    }

    /// Element segments referencing this node array.
    pub fn element_segments(&self) -> &ContainmentRegistry {
        &self.element_segments
    }

    pub fn element_segments_mut(&mut self) -> &mut ContainmentRegistry {
        &mut self.element_segments
    }

    /// Admits a batch of segments, initializing their values to zero.
    ///
    /// See [`add_segments_with`](Self::add_segments_with).
    pub fn add_segments(
        &mut self,
        requests: impl IntoIterator<Item = (u32, NodeSegment)>,
    ) -> Result<Vec<SegmentAdmission>, NodeFieldError> {
        self.add_segments_with(requests, SegmentInit::Zero)
    }

    /// Admits a batch of segments, setting every new value to `value`.
    pub fn add_segments_with_value(
        &mut self,
        requests: impl IntoIterator<Item = (u32, NodeSegment)>,
        value: T,
    ) -> Result<Vec<SegmentAdmission>, NodeFieldError> {
        self.add_segments_with(requests, SegmentInit::Value(value))
    }

    /// Admits a batch of segments, taking the new values from `values`.
    ///
    /// See [`SegmentInit::Values`] for the expected layout.
    pub fn add_segments_with_values(
        &mut self,
        requests: impl IntoIterator<Item = (u32, NodeSegment)>,
        values: &[T],
    ) -> Result<Vec<SegmentAdmission>, NodeFieldError> {
        self.add_segments_with(requests, SegmentInit::Values(values))
    }

    /// Admits a batch of segments.
    ///
    /// The batch is all-or-nothing. If any requested id is already live, appears more than
    /// once in the batch or is the reserved id `0`, no segment is admitted and
    /// [`NodeFieldError::DuplicateSegment`] is returned. The layout and values of the node array
    /// are then unchanged.
    ///
    /// On success, the new segments are placed after the existing ones in request order.
    /// Existing segments keep their offsets and values. The returned admissions are all
    /// [`SegmentAdmission::Admitted`].
    pub fn add_segments_with(
        &mut self,
        requests: impl IntoIterator<Item = (u32, NodeSegment)>,
        init: SegmentInit<T>,
    ) -> Result<Vec<SegmentAdmission>, NodeFieldError> {
        let requests: Vec<_> = requests.into_iter().collect();

        let admissions: Vec<_> = requests
            .iter()
            .enumerate()
            .map(|(i, (id, _))| {
                let repeated = requests[..i].iter().any(|(other, _)| other == id);
                if *id == 0 || repeated || self.segments.is_id(*id) {
                    SegmentAdmission::Duplicate
                } else {
                    SegmentAdmission::Admitted
                }
            })
            .collect();
        if let Some(i) = admissions
            .iter()
            .position(|admission| *admission == SegmentAdmission::Duplicate)
        {
            return Err(NodeFieldError::DuplicateSegment {
                id: requests[i].0,
                admissions,
            });
        }

        let old_stride = self.stride;
        let overflow = |stride| NodeFieldError::LayoutOverflow {
            num_nodes: self.num_nodes,
            stride,
        };
        let added_width = requests
            .iter()
            .try_fold(0usize, |sum, (_, segment)| sum.checked_add(segment.width))
            .ok_or_else(|| overflow(usize::MAX))?;
        let new_stride = old_stride
            .checked_add(added_width)
            .ok_or_else(|| overflow(usize::MAX))?;
        let new_len = self
            .num_nodes
            .checked_mul(new_stride)
            .ok_or_else(|| overflow(new_stride))?;

        if let SegmentInit::Values(values) = init {
            // Cannot overflow, since added_width <= new_stride.
            let expected = self.num_nodes * added_width;
            if values.len() != expected {
                warn!(
                    "Rejecting initial values for node array '{}': expected {} values, got {}",
                    self.name,
                    expected,
                    values.len()
                );
                return Err(NodeFieldError::InitialValuesLength {
                    expected,
                    actual: values.len(),
                });
            }
        }

        debug!(
            "Re-laying out node array '{}' with {} nodes from stride {} to {}",
            self.name, self.num_nodes, old_stride, new_stride
        );
        let mut new_values = vec![T::zero(); new_len];
        if new_stride > 0 {
            if old_stride > 0 {
                for (old_block, new_block) in self
                    .values
                    .chunks_exact(old_stride)
                    .zip(new_values.chunks_exact_mut(new_stride))
                {
                    new_block[..old_stride].copy_from_slice(old_block);
                }
            }
            match init {
                SegmentInit::Zero => {}
                SegmentInit::Value(value) => {
                    for new_block in new_values.chunks_exact_mut(new_stride) {
                        new_block[old_stride..].fill(value);
                    }
                }
                SegmentInit::Values(values) if added_width > 0 => {
                    for (new_block, node_values) in new_values
                        .chunks_exact_mut(new_stride)
                        .zip(values.chunks_exact(added_width))
                    {
                        new_block[old_stride..].copy_from_slice(node_values);
                    }
                }
                SegmentInit::Values(_) => {}
            }
        }

        let mut offset = old_stride;
        for (id, mut segment) in requests {
            segment.offset = offset;
            offset += segment.width;
            self.segments
                .insert(id, segment)
                .expect("Internal error: Segment ids were checked to be free.");
        }
        self.values = new_values;
        self.stride = new_stride;
        self.epoch += 1;
        Ok(admissions)
    }

    /// Removes all segments and releases the value buffer.
    pub fn clear_segments(&mut self) {
        self.segments.clear();
        self.values = Vec::new();
        self.stride = 0;
        self.epoch += 1;
    }

    /// Sets local degree of freedom `dof` of segment `id` to `value` for every node referenced by
    /// element segment `element_segment` of `elements`.
    ///
    /// This is the typical way of prescribing Dirichlet boundary values.
    ///
    /// # Panics
    ///
    /// Panics if the element segment references a node index outside the node array.
    pub fn set_value_on_element_segment<E>(
        &mut self,
        elements: &E,
        element_segment: u32,
        id: u32,
        dof: usize,
        value: T,
    ) -> Result<(), NodeFieldError>
    where
        E: ElementArray + ?Sized,
    {
        let segment = self.segments.get(id).ok_or(NodeFieldError::UnknownSegment(id))?;
        if !elements.is_segment_id(element_segment) {
            return Err(NodeFieldError::UnknownElementSegment(element_segment));
        }
        if dof >= segment.width {
            return Err(NodeFieldError::DofOutOfRange {
                dof,
                width: segment.width,
            });
        }

        let local_position = segment.offset + dof;
        for element_index in 0..elements.num_elements() {
            let nodes = elements
                .element_nodes(element_segment, element_index)
                .ok_or(NodeFieldError::UnknownElementSegment(element_segment))?;
            for &node in nodes {
                assert!(node < self.num_nodes, "Node index {node} out of bounds.");
                self.values[node * self.stride + local_position] = value;
            }
        }
        Ok(())
    }

    /// Replaces name, layout and values wholesale. The caller guarantees consistency.
    pub(crate) fn replace_layout(
        &mut self,
        name: String,
        num_nodes: usize,
        segments: Vec<(u32, NodeSegment)>,
        values: Vec<T>,
    ) {
        self.stride = segments.iter().map(|(_, segment)| segment.width).sum();
        debug_assert_eq!(values.len(), num_nodes * self.stride);
        self.name = name;
        self.num_nodes = num_nodes;
        self.segments = segments.into_iter().collect();
        self.values = values;
        self.epoch += 1;
    }
}
