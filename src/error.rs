//! Error conditions for structural operations on node arrays and containment registries.
use crate::containment::ElementSegmentKey;
use crate::node_array::SegmentAdmission;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeFieldError {
    /// A segment id in an `add_segments` batch is already live, or appears twice in the batch.
    ///
    /// No segment of the batch has been admitted. `admissions` reports, in request order,
    /// which requests collided.
    DuplicateSegment { id: u32, admissions: Vec<SegmentAdmission> },
    /// The node segment id is not live in the node array.
    UnknownSegment(u32),
    /// The element segment id is not known to the element array.
    UnknownElementSegment(u32),
    /// Two node segments were combined whose widths must be equal.
    WidthMismatch { expected: usize, actual: usize },
    /// A local degree of freedom index exceeds the width of its segment.
    DofOutOfRange { dof: usize, width: usize },
    /// The containment key has not been registered.
    InvalidRegistryKey(ElementSegmentKey),
    /// The operation requires a node array without live segments.
    SegmentsAlive,
    /// An initial value vector does not have one entry per node and new degree of freedom.
    InitialValuesLength { expected: usize, actual: usize },
    /// The value buffer of the requested layout would hold more than `usize::MAX` scalars.
    LayoutOverflow { num_nodes: usize, stride: usize },
}

impl fmt::Display for NodeFieldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::DuplicateSegment { id, .. } => write!(f, "node segment {id} is already live"),
            Self::UnknownSegment(id) => write!(f, "node segment {id} is not live"),
            Self::UnknownElementSegment(id) => write!(f, "element segment {id} does not exist"),
            Self::WidthMismatch { expected, actual } => {
                write!(f, "node segment width mismatch (expected {expected}, got {actual})")
            }
            Self::DofOutOfRange { dof, width } => {
                write!(f, "local dof index {dof} out of range for segment of width {width}")
            }
            Self::InvalidRegistryKey(key) => write!(
                f,
                "element segment ({}, {}) is not registered",
                key.element_array, key.element_segment
            ),
            Self::SegmentsAlive => write!(f, "node array still has live segments"),
            Self::InitialValuesLength { expected, actual } => {
                write!(f, "expected {expected} initial values, got {actual}")
            }
            Self::LayoutOverflow { num_nodes, stride } => {
                write!(f, "{num_nodes} nodes with stride {stride} exceed the addressable buffer size")
            }
        }
    }
}

impl Error for NodeFieldError {}
