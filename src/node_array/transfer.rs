//! Bulk transfer of segment values to and from dense vectors.
//!
//! A segment of width `w` is flattened node by node, so that local dof `i` of node `n` corresponds
//! to entry `offset + n * w + i` of the vector.
use super::NodeArray;
use crate::{NodeFieldError, Real};
use itertools::izip;
use nalgebra::{DVectorView, DVectorViewMut};
use num::Complex;

/// Buffer positions of a segment in flattened node-major order.
fn flattened_positions(num_nodes: usize, stride: usize, offset: usize, width: usize) -> impl Iterator<Item = usize> {
    (0..num_nodes).flat_map(move |node| {
        let begin = node * stride + offset;
        begin..begin + width
    })
}

fn assert_vector_len(vector_len: usize, offset: usize, segment_len: usize) {
    assert!(
        offset + segment_len <= vector_len,
        "Vector of length {vector_len} can not hold {segment_len} segment values at offset {offset}."
    );
}

impl<T: Real> NodeArray<T> {
    fn segment_positions(&self, id: u32) -> Result<(impl Iterator<Item = usize>, usize), NodeFieldError> {
        let segment = self.segment_info(id)?;
        let positions = flattened_positions(self.num_nodes, self.stride, segment.offset(), segment.width());
        Ok((positions, self.num_nodes * segment.width()))
    }

    /// Copies the values of segment `id` into `vector`, starting at entry `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the vector is too short.
    pub fn copy_segment_to_vector(
        &self,
        id: u32,
        mut vector: DVectorViewMut<T>,
        offset: usize,
    ) -> Result<(), NodeFieldError> {
        let (positions, len) = self.segment_positions(id)?;
        assert_vector_len(vector.len(), offset, len);
        for (position, v) in izip!(positions, vector.iter_mut().skip(offset)) {
            *v = self.values[position];
        }
        Ok(())
    }

    /// Overwrites the values of segment `id` with entries of `vector` starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the vector is too short.
    pub fn copy_vector_to_segment(
        &mut self,
        id: u32,
        vector: DVectorView<T>,
        offset: usize,
    ) -> Result<(), NodeFieldError> {
        let (positions, len) = self.segment_positions(id)?;
        assert_vector_len(vector.len(), offset, len);
        for (position, v) in izip!(positions, vector.iter().skip(offset)) {
            self.values[position] = *v;
        }
        Ok(())
    }

    /// Computes `segment += alpha * vector`, reading `vector` from entry `offset` on.
    ///
    /// # Panics
    ///
    /// Panics if the vector is too short.
    pub fn add_vector_to_segment(
        &mut self,
        id: u32,
        vector: DVectorView<T>,
        alpha: T,
        offset: usize,
    ) -> Result<(), NodeFieldError> {
        let (positions, len) = self.segment_positions(id)?;
        assert_vector_len(vector.len(), offset, len);
        for (position, v) in izip!(positions, vector.iter().skip(offset)) {
            self.values[position] += alpha * *v;
        }
        Ok(())
    }

    /// Computes `vector += alpha * segment`, writing `vector` from entry `offset` on.
    ///
    /// # Panics
    ///
    /// Panics if the vector is too short.
    pub fn add_segment_to_vector(
        &self,
        alpha: T,
        id: u32,
        mut vector: DVectorViewMut<T>,
        offset: usize,
    ) -> Result<(), NodeFieldError> {
        let (positions, len) = self.segment_positions(id)?;
        assert_vector_len(vector.len(), offset, len);
        for (position, v) in izip!(positions, vector.iter_mut().skip(offset)) {
            *v += alpha * self.values[position];
        }
        Ok(())
    }

    /// Copies segment `id` into a complex vector, interpreting consecutive pairs of values as
    /// real and imaginary parts.
    ///
    /// # Panics
    ///
    /// Panics if the segment width is odd or the vector length is not `num_nodes * width / 2`.
    pub fn copy_segment_to_complex_vector(
        &self,
        id: u32,
        mut vector: DVectorViewMut<Complex<T>>,
    ) -> Result<(), NodeFieldError> {
        let positions = self.complex_segment_positions(id, vector.len())?;
        for (pair, z) in izip!(positions.chunks_exact(2), vector.iter_mut()) {
            *z = Complex::new(self.values[pair[0]], self.values[pair[1]]);
        }
        Ok(())
    }

    /// Computes `segment += alpha * vector` for a complex vector, where the segment stores
    /// complex numbers as consecutive real and imaginary parts.
    ///
    /// # Panics
    ///
    /// Panics if the segment width is odd or the vector length is not `num_nodes * width / 2`.
    pub fn add_complex_vector_to_segment(
        &mut self,
        id: u32,
        vector: DVectorView<Complex<T>>,
        alpha: T,
    ) -> Result<(), NodeFieldError> {
        let positions = self.complex_segment_positions(id, vector.len())?;
        for (pair, z) in izip!(positions.chunks_exact(2), vector.iter()) {
            self.values[pair[0]] += alpha * z.re;
            self.values[pair[1]] += alpha * z.im;
        }
        Ok(())
    }

    fn complex_segment_positions(&self, id: u32, vector_len: usize) -> Result<Vec<usize>, NodeFieldError> {
        let width = self.segment_info(id)?.width();
        assert_eq!(width % 2, 0, "Complex transfer requires a segment of even width.");
        let (positions, len) = self.segment_positions(id)?;
        assert_eq!(
            vector_len * 2,
            len,
            "Complex vector length must equal the number of complex segment values."
        );
        Ok(positions.collect())
    }

    /// Computes `segment[to] += alpha * segment[from]` for every node.
    ///
    /// Both segments must have the same width. `to` and `from` may be the same segment.
    pub fn add_segment_to_segment(&mut self, to: u32, from: u32, alpha: T) -> Result<(), NodeFieldError> {
        let to_width = self.segment_info(to)?.width();
        let from_width = self.segment_info(from)?.width();
        if to_width != from_width {
            return Err(NodeFieldError::WidthMismatch {
                expected: to_width,
                actual: from_width,
            });
        }
        let (to_positions, _) = self.segment_positions(to)?;
        let (from_positions, _) = self.segment_positions(from)?;
        for (to_position, from_position) in to_positions.zip(from_positions) {
            let increment = alpha * self.values[from_position];
            self.values[to_position] += increment;
        }
        Ok(())
    }
}
