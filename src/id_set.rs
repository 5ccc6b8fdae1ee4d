use rustc_hash::FxHashMap;

/// A set of objects keyed by positive integer ids.
///
/// Objects are kept in insertion order, which is also the order returned by [`ObjectIdSet::ids`]
/// and [`ObjectIdSet::iter`]. The id `0` is never issued and never accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectIdSet<T> {
    entries: Vec<(u32, T)>,
    positions: FxHashMap<u32, usize>,
}

impl<T> Default for ObjectIdSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObjectIdSet<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: FxHashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_id(&self, id: u32) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn ids<'a>(&'a self) -> impl 'a + Iterator<Item = u32> {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn iter<'a>(&'a self) -> impl 'a + Iterator<Item = (u32, &'a T)> {
        self.entries.iter().map(|(id, obj)| (*id, obj))
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        let position = *self.positions.get(&id)?;
        Some(&self.entries[position].1)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        let position = *self.positions.get(&id)?;
        Some(&mut self.entries[position].1)
    }

    /// Returns the smallest positive id that is not in use.
    pub fn free_id(&self) -> u32 {
        self.free_ids(1)[0]
    }

    /// Returns the `count` smallest positive ids that are not in use, in ascending order.
    pub fn free_ids(&self, count: usize) -> Vec<u32> {
        (1..=u32::MAX)
            .filter(|id| !self.is_id(*id))
            .take(count)
            .collect()
    }

    /// Inserts an object under the given id.
    ///
    /// Returns the object back if the id is `0` or already in use.
    pub fn insert(&mut self, id: u32, obj: T) -> Result<(), T> {
        if id == 0 || self.is_id(id) {
            return Err(obj);
        }
        self.positions.insert(id, self.entries.len());
        self.entries.push((id, obj));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }
}

impl<T> FromIterator<(u32, T)> for ObjectIdSet<T> {
    /// Collects objects into a set, silently dropping invalid or repeated ids.
    fn from_iter<I: IntoIterator<Item = (u32, T)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (id, obj) in iter {
            let _ = set.insert(id, obj);
        }
        set
    }
}
