//! Bookkeeping of element segments referencing a node array, and of how they nest.
//!
//! Several element segments often cover the same nodes; for example the boundary edges of a
//! domain are contained in the element segment of the whole domain. Recording such inclusions
//! lets assembly code visit only the [minimal cover](ContainmentRegistry::minimal_cover)
//! of the registered element segments.
use crate::NodeFieldError;
use log::trace;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Identifies an element segment by the id of its element array and its id within that array.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementSegmentKey {
    pub element_array: u32,
    pub element_segment: u32,
}

impl ElementSegmentKey {
    pub fn new(element_array: u32, element_segment: u32) -> Self {
        Self {
            element_array,
            element_segment,
        }
    }
}

impl From<(u32, u32)> for ElementSegmentKey {
    fn from((element_array, element_segment): (u32, u32)) -> Self {
        Self::new(element_array, element_segment)
    }
}

impl From<ElementSegmentKey> for (u32, u32) {
    fn from(key: ElementSegmentKey) -> Self {
        (key.element_array, key.element_segment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: ElementSegmentKey,
    /// Indices of the entries directly included in this one.
    included: Vec<usize>,
}

/// Append-only registry of element segment keys with a directed "includes" relation.
///
/// Every key is assigned the next sequential index when first registered, and keeps that index
/// for the lifetime of the registry. The inclusion relation is expected to be acyclic; this is
/// not checked.
///
/// The plain methods are lenient: operations mentioning an unregistered key do nothing (or
/// report a negative answer). The `try_` variants surface
/// [`NodeFieldError::InvalidRegistryKey`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContainmentRegistry {
    entries: Vec<Entry>,
    indices: FxHashMap<ElementSegmentKey, usize>,
}

impl ContainmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: impl Into<ElementSegmentKey>) -> bool {
        self.index_of(key.into()).is_some()
    }

    /// All registered keys in registration order.
    pub fn keys<'a>(&'a self) -> impl 'a + ExactSizeIterator<Item = ElementSegmentKey> {
        self.entries.iter().map(|entry| entry.key)
    }

    /// Registers a key and returns its index. Registering a known key returns its existing index.
    pub fn register(&mut self, key: impl Into<ElementSegmentKey>) -> usize {
        let key = key.into();
        if let Some(index) = self.index_of(key) {
            return index;
        }
        let index = self.entries.len();
        self.entries.push(Entry {
            key,
            included: Vec::new(),
        });
        self.indices.insert(key, index);
        index
    }

    /// Records that `outer` includes `inner`.
    ///
    /// Does nothing if either key is unregistered, if the keys are equal or if the inclusion is
    /// already recorded.
    pub fn add_inclusion(&mut self, inner: impl Into<ElementSegmentKey>, outer: impl Into<ElementSegmentKey>) {
        let (inner, outer) = (inner.into(), outer.into());
        if let Err(err) = self.try_add_inclusion(inner, outer) {
            trace!("Ignoring inclusion of {:?} in {:?}: {}", inner, outer, err);
        }
    }

    /// Records that `outer` includes `inner`, returning whether a new inclusion was recorded.
    pub fn try_add_inclusion(
        &mut self,
        inner: impl Into<ElementSegmentKey>,
        outer: impl Into<ElementSegmentKey>,
    ) -> Result<bool, NodeFieldError> {
        let inner_index = self.checked_index_of(inner.into())?;
        let outer_index = self.checked_index_of(outer.into())?;
        if inner_index == outer_index {
            return Ok(false);
        }
        let included = &mut self.entries[outer_index].included;
        if included.contains(&inner_index) {
            Ok(false)
        } else {
            included.push(inner_index);
            Ok(true)
        }
    }

    /// Whether `outer` directly includes `inner`. Inclusion is not followed transitively.
    pub fn is_included(&self, inner: impl Into<ElementSegmentKey>, outer: impl Into<ElementSegmentKey>) -> bool {
        self.try_is_included(inner, outer).unwrap_or(false)
    }

    pub fn try_is_included(
        &self,
        inner: impl Into<ElementSegmentKey>,
        outer: impl Into<ElementSegmentKey>,
    ) -> Result<bool, NodeFieldError> {
        let inner_index = self.checked_index_of(inner.into())?;
        let outer_index = self.checked_index_of(outer.into())?;
        Ok(self.entries[outer_index].included.contains(&inner_index))
    }

    /// The keys directly included in `key`, or `None` if `key` is not registered.
    pub fn inclusions<'a>(&'a self, key: ElementSegmentKey) -> Option<impl 'a + Iterator<Item = ElementSegmentKey>> {
        let index = self.index_of(key)?;
        Some(
            self.entries[index]
                .included
                .iter()
                .map(move |&j| self.entries[j].key),
        )
    }

    /// Returns the registered keys that are not included in any other key, in registration order.
    pub fn minimal_cover(&self) -> Vec<ElementSegmentKey> {
        let mut is_included = vec![false; self.entries.len()];
        for entry in &self.entries {
            for &j in &entry.included {
                is_included[j] = true;
            }
        }
        self.entries
            .iter()
            .zip(is_included)
            .filter(|(_, included)| !included)
            .map(|(entry, _)| entry.key)
            .collect()
    }

    /// Finds the element segment of `element_array` among `key` and the keys it directly includes.
    ///
    /// `key` itself is searched first, then its inclusions in the order they were recorded.
    /// Returns `0` if no match is found or `key` is not registered.
    pub fn resolve_element_segment(&self, key: impl Into<ElementSegmentKey>, element_array: u32) -> u32 {
        self.try_resolve_element_segment(key, element_array)
            .ok()
            .flatten()
            .unwrap_or(0)
    }

    pub fn try_resolve_element_segment(
        &self,
        key: impl Into<ElementSegmentKey>,
        element_array: u32,
    ) -> Result<Option<u32>, NodeFieldError> {
        let index = self.checked_index_of(key.into())?;
        let entry = &self.entries[index];
        let found = std::iter::once(index)
            .chain(entry.included.iter().copied())
            .map(|j| self.entries[j].key)
            .find(|candidate| candidate.element_array == element_array)
            .map(|candidate| candidate.element_segment);
        Ok(found)
    }

    fn index_of(&self, key: ElementSegmentKey) -> Option<usize> {
        self.indices.get(&key).copied()
    }

    fn checked_index_of(&self, key: ElementSegmentKey) -> Result<usize, NodeFieldError> {
        self.index_of(key).ok_or(NodeFieldError::InvalidRegistryKey(key))
    }
}
