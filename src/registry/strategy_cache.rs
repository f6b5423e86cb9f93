use std::any::TypeId;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use parking_lot::RwLock;

use super::{CacheStats, StrategyOrigin};

pub(crate) trait CachedStrategy: Clone {
    fn type_name(&self) -> &'static str;

    fn origin(&self) -> StrategyOrigin;
}

/// Grow-only map from type identity to a resolved strategy entry.
///
/// Reads take the shared lock. Insertion takes the exclusive lock and keeps
/// whichever entry got there first.
pub(crate) struct StrategyCache<E> {
    entries: RwLock<HashMap<TypeId, E>>,
}

impl<E: CachedStrategy> StrategyCache<E> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn get(&self, id: TypeId) -> Option<E> {
        self.entries.read().get(&id).cloned()
    }

    /// Returns the cached entry, inserting `entry` only if none exists yet
    pub(crate) fn get_or_insert(&self, id: TypeId, entry: E) -> E {
        self.entries.write().entry(id).or_insert(entry).clone()
    }

    /// Returns false when an entry already exists
    pub(crate) fn insert_new(&self, id: TypeId, entry: E) -> bool {
        match self.entries.write().entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
                true
            }
        }
    }

    pub(crate) fn contains(&self, id: TypeId) -> bool {
        self.entries.read().contains_key(&id)
    }

    pub(crate) fn origin_of(&self, id: TypeId) -> Option<StrategyOrigin> {
        self.entries.read().get(&id).map(CachedStrategy::origin)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub(crate) fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        let mut cached_types: Vec<&'static str> =
            entries.values().map(CachedStrategy::type_name).collect();
        cached_types.sort_unstable();
        CacheStats {
            cached_strategies: entries.len(),
            cached_types,
        }
    }
}
