//! Storage of per-node field values for finite element computations.
//!
//! A [`NodeArray`](node_array::NodeArray) keeps every field ("node segment") of every node in a
//! single interleaved buffer, so that all degrees of freedom of one node are adjacent in memory.
//! Alongside it, a [`ContainmentRegistry`](containment::ContainmentRegistry) records which
//! element segments reference the nodes and how those element segments nest inside each other.
use nalgebra::RealField;

pub mod connectivity;
pub mod containment;
pub mod error;
pub mod id_set;
pub mod io;
pub mod node_array;

#[cfg(feature = "proptest")]
pub mod proptest;

pub extern crate nalgebra;
pub extern crate num;

pub use error::NodeFieldError;

/// Scalar type stored in a node array.
///
/// Used as a trait alias for the traits needed by the numerical routines of this crate.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}
