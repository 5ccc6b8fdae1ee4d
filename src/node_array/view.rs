use super::NodeSegment;
use crate::Real;
use num::Complex;
use std::ops::Range;

/// Buffer range of the values of `segment` at `node`.
#[inline]
fn node_range(segment: &NodeSegment, stride: usize, num_nodes: usize, node: usize) -> Range<usize> {
    debug_assert!(node < num_nodes, "Node index {node} out of bounds ({num_nodes} nodes).");
    let begin = node * stride + segment.offset;
    begin..begin + segment.width
}

#[inline]
fn dof_index(segment: &NodeSegment, stride: usize, num_nodes: usize, node: usize, dof: usize) -> usize {
    debug_assert!(node < num_nodes, "Node index {node} out of bounds ({num_nodes} nodes).");
    debug_assert!(dof < segment.width, "Local dof {dof} out of bounds (width {}).", segment.width);
    node * stride + segment.offset + dof
}

fn copy_complex_values<T: Real>(values: &[T], output: &mut [Complex<T>]) {
    debug_assert!(values.len() % 2 == 0, "Complex access requires a segment of even width.");
    debug_assert!(output.len() >= values.len() / 2);
    for (z, pair) in output.iter_mut().zip(values.chunks_exact(2)) {
        *z = Complex::new(pair[0], pair[1]);
    }
}

/// Read-only view of one node segment of a [`NodeArray`](super::NodeArray).
#[derive(Debug, Copy, Clone)]
pub struct NodeSegmentView<'a, T> {
    segment: &'a NodeSegment,
    values: &'a [T],
    stride: usize,
    num_nodes: usize,
}

impl<'a, T: Real> NodeSegmentView<'a, T> {
    pub(crate) fn new(segment: &'a NodeSegment, values: &'a [T], stride: usize, num_nodes: usize) -> Self {
        Self {
            segment,
            values,
            stride,
            num_nodes,
        }
    }

    pub fn info(&self) -> &'a NodeSegment {
        self.segment
    }

    pub fn width(&self) -> usize {
        self.segment.width
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn value(&self, node: usize, dof: usize) -> T {
        self.values[dof_index(self.segment, self.stride, self.num_nodes, node, dof)]
    }

    pub fn node_values(&self, node: usize) -> &'a [T] {
        &self.values[node_range(self.segment, self.stride, self.num_nodes, node)]
    }

    /// Copies the `width` values of `node` into the beginning of `output`.
    pub fn get_value(&self, node: usize, output: &mut [T]) {
        output[..self.width()].copy_from_slice(self.node_values(node));
    }

    /// Copies the values of `node` into `output`, as `width / 2` complex numbers
    /// stored as consecutive real and imaginary parts.
    ///
    /// The segment width must be even.
    pub fn get_complex_value(&self, node: usize, output: &mut [Complex<T>]) {
        copy_complex_values(self.node_values(node), output);
    }

    pub fn iter_nodes(&self) -> impl 'a + Iterator<Item = &'a [T]> {
        let view = *self;
        (0..self.num_nodes).map(move |node| view.node_values(node))
    }
}

/// Mutable view of one node segment of a [`NodeArray`](super::NodeArray).
#[derive(Debug)]
pub struct NodeSegmentViewMut<'a, T> {
    segment: &'a NodeSegment,
    values: &'a mut [T],
    stride: usize,
    num_nodes: usize,
}

impl<'a, T: Real> NodeSegmentViewMut<'a, T> {
    pub(crate) fn new(segment: &'a NodeSegment, values: &'a mut [T], stride: usize, num_nodes: usize) -> Self {
        Self {
            segment,
            values,
            stride,
            num_nodes,
        }
    }

    pub fn as_view(&self) -> NodeSegmentView<'_, T> {
        NodeSegmentView::new(self.segment, self.values, self.stride, self.num_nodes)
    }

    pub fn info(&self) -> &'a NodeSegment {
        self.segment
    }

    pub fn width(&self) -> usize {
        self.segment.width
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn value(&self, node: usize, dof: usize) -> T {
        self.values[dof_index(self.segment, self.stride, self.num_nodes, node, dof)]
    }

    pub fn node_values(&self, node: usize) -> &[T] {
        &self.values[node_range(self.segment, self.stride, self.num_nodes, node)]
    }

    pub fn node_values_mut(&mut self, node: usize) -> &mut [T] {
        &mut self.values[node_range(self.segment, self.stride, self.num_nodes, node)]
    }

    pub fn get_value(&self, node: usize, output: &mut [T]) {
        output[..self.width()].copy_from_slice(self.node_values(node));
    }

    pub fn get_complex_value(&self, node: usize, output: &mut [Complex<T>]) {
        copy_complex_values(self.node_values(node), output);
    }

    pub fn set_value(&mut self, node: usize, dof: usize, value: T) {
        let index = dof_index(self.segment, self.stride, self.num_nodes, node, dof);
        self.values[index] = value;
    }

    pub fn add_value(&mut self, node: usize, dof: usize, value: T) {
        let index = dof_index(self.segment, self.stride, self.num_nodes, node, dof);
        self.values[index] += value;
    }

    /// Sets every value of the segment, across all nodes, to `value`.
    pub fn fill(&mut self, value: T) {
        for node in 0..self.num_nodes {
            self.node_values_mut(node).fill(value);
        }
    }

    pub fn set_zero(&mut self) {
        self.fill(T::zero());
    }
}
