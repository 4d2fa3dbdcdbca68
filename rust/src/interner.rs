//! Activity ID interning.
//!
//! Maps string activity IDs to dense integer positions in the activity arena,
//! so the passes index plain vectors instead of hashing strings.

use rustc_hash::FxHashMap;

/// Position of an activity in the input slice (u32 for compact adjacency lists).
pub type ActivityIdx = u32;

/// Bidirectional mapping between activity ID strings and arena positions.
#[derive(Debug, Clone)]
pub struct ActivityIndex {
    to_int: FxHashMap<String, ActivityIdx>,
    from_int: Vec<String>,
}

impl ActivityIndex {
    /// Create a new index with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_int: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_int: Vec::with_capacity(capacity),
        }
    }

    /// Register a new ID at the next position.
    ///
    /// Returns `Err` with the existing position if the ID is already registered.
    pub fn insert_unique(&mut self, s: &str) -> Result<ActivityIdx, ActivityIdx> {
        if let Some(&id) = self.to_int.get(s) {
            return Err(id);
        }
        let id = self.from_int.len() as ActivityIdx;
        self.from_int.push(s.to_string());
        self.to_int.insert(s.to_string(), id);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, s: &str) -> Option<ActivityIdx> {
        self.to_int.get(s).copied()
    }

    #[inline]
    pub fn resolve(&self, id: ActivityIdx) -> Option<&str> {
        self.from_int.get(id as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.from_int.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_int.is_empty()
    }
}

impl Default for ActivityIndex {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
