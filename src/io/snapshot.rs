use crate::node_array::{NodeArray, NodeSegment};
use crate::Real;
use eyre::eyre;
use serde::{Deserialize, Serialize};

/// Serializable record of the full layout and values of a node array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeArraySnapshot<T> {
    pub id: u32,
    pub name: String,
    pub num_nodes: usize,
    pub stride: usize,
    /// Segments in layout order.
    pub segments: Vec<(u32, NodeSegment)>,
    pub values: Vec<T>,
}

/// Serializable record of the values of a node array only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeValueDump<T> {
    pub id: u32,
    pub num_nodes: usize,
    pub stride: usize,
    /// Ids and widths of the segments in layout order.
    pub segments: Vec<(u32, usize)>,
    pub values: Vec<T>,
}

impl<T: Real> NodeArraySnapshot<T> {
    pub fn from_node_array(node_array: &NodeArray<T>, id: u32) -> Self {
        Self {
            id,
            name: node_array.name().to_string(),
            num_nodes: node_array.num_nodes(),
            stride: node_array.stride(),
            segments: node_array
                .segments()
                .map(|(segment_id, segment)| (segment_id, segment.clone()))
                .collect(),
            values: node_array.values().to_vec(),
        }
    }

    /// Checks that the segments tile every node block and the values fill the buffer.
    pub fn validate(&self) -> eyre::Result<()> {
        let mut expected_offset = 0;
        for (id, segment) in &self.segments {
            if *id == 0 {
                return Err(eyre!("snapshot contains the reserved segment id 0"));
            }
            if self.segments.iter().filter(|(other, _)| other == id).count() > 1 {
                return Err(eyre!("snapshot contains segment id {} more than once", id));
            }
            if segment.offset() != expected_offset {
                return Err(eyre!(
                    "segment {} has offset {}, expected {}",
                    id,
                    segment.offset(),
                    expected_offset
                ));
            }
            expected_offset += segment.width();
        }
        if expected_offset != self.stride {
            return Err(eyre!(
                "segment widths sum to {}, but the stride is {}",
                expected_offset,
                self.stride
            ));
        }
        check_values_len(self.values.len(), self.num_nodes, self.stride)
    }

    pub(crate) fn restore_into(self, node_array: &mut NodeArray<T>) -> eyre::Result<()> {
        self.validate()?;
        node_array.replace_layout(self.name, self.num_nodes, self.segments, self.values);
        Ok(())
    }
}

impl<T: Real> NodeValueDump<T> {
    pub fn from_node_array(node_array: &NodeArray<T>, id: u32) -> Self {
        Self {
            id,
            num_nodes: node_array.num_nodes(),
            stride: node_array.stride(),
            segments: segment_widths(node_array),
            values: node_array.values().to_vec(),
        }
    }

    pub(crate) fn restore_into(self, node_array: &mut NodeArray<T>) -> eyre::Result<()> {
        if self.num_nodes != node_array.num_nodes() || self.stride != node_array.stride() {
            return Err(eyre!(
                "value dump has {} nodes with stride {}, node array has {} nodes with stride {}",
                self.num_nodes,
                self.stride,
                node_array.num_nodes(),
                node_array.stride()
            ));
        }
        let layout = segment_widths(node_array);
        if self.segments != layout {
            return Err(eyre!(
                "value dump has segment layout {:?}, node array has {:?}",
                self.segments,
                layout
            ));
        }
        check_values_len(self.values.len(), self.num_nodes, self.stride)?;
        node_array.values_mut().copy_from_slice(&self.values);
        Ok(())
    }
}

fn segment_widths<T: Real>(node_array: &NodeArray<T>) -> Vec<(u32, usize)> {
    node_array
        .segments()
        .map(|(id, segment)| (id, segment.width()))
        .collect()
}

fn check_values_len(len: usize, num_nodes: usize, stride: usize) -> eyre::Result<()> {
    match num_nodes.checked_mul(stride) {
        Some(expected) if expected == len => Ok(()),
        Some(expected) => Err(eyre!(
            "expected {} values for {} nodes with stride {}, found {}",
            expected,
            num_nodes,
            stride,
            len
        )),
        None => Err(eyre!("{} nodes with stride {} overflow the value buffer", num_nodes, stride)),
    }
}
