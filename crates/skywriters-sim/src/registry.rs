//! Capacity-gated registry of live actors, partitioned by class.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

use tracing::warn;

use skywriters_core::config::StageConfig;
use skywriters_core::enums::EntityClass;
use skywriters_core::error::ConfigError;

use crate::error::AdmissionError;

/// Live handles of one class, in insertion order.
#[derive(Debug, Clone)]
pub struct EntityCollection<H> {
    class: EntityClass,
    capacity: usize,
    live: Vec<H>,
}

impl<H: Copy + Eq> EntityCollection<H> {
    fn new(class: EntityClass, capacity: usize) -> Self {
        Self {
            class,
            capacity,
            live: Vec::new(),
        }
    }

    pub fn class(&self) -> EntityClass {
        self.class
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn count(&self) -> usize {
        self.live.len()
    }

    pub fn is_full(&self) -> bool {
        self.live.len() >= self.capacity
    }

    pub fn handles(&self) -> &[H] {
        &self.live
    }

    pub fn contains(&self, handle: H) -> bool {
        self.live.contains(&handle)
    }
}

/// One collection per class, created on first use.
#[derive(Debug, Clone)]
pub struct EntityRegistry<H> {
    capacities: BTreeMap<EntityClass, usize>,
    collections: BTreeMap<EntityClass, EntityCollection<H>>,
    index: HashMap<H, EntityClass>,
}

impl<H: Copy + Eq + Hash + Debug> EntityRegistry<H> {
    /// Every class needs a non-zero capacity.
    pub fn new(capacities: BTreeMap<EntityClass, usize>) -> Result<Self, ConfigError> {
        for class in EntityClass::ALL {
            match capacities.get(&class) {
                None => return Err(ConfigError::MissingCapacity(class)),
                Some(0) => return Err(ConfigError::ZeroCapacity(class)),
                Some(_) => {}
            }
        }
        Ok(Self {
            capacities,
            collections: BTreeMap::new(),
            index: HashMap::new(),
        })
    }

    pub fn from_config(config: &StageConfig) -> Result<Self, ConfigError> {
        Self::new(config.capacity_map()?)
    }

    pub fn capacity(&self, class: EntityClass) -> usize {
        self.capacities.get(&class).copied().unwrap_or(0)
    }

    pub fn collection(&self, class: EntityClass) -> Option<&EntityCollection<H>> {
        self.collections.get(&class)
    }

    pub fn get_or_create_collection(&mut self, class: EntityClass) -> &mut EntityCollection<H> {
        let capacity = self.capacity(class);
        self.collections
            .entry(class)
            .or_insert_with(|| EntityCollection::new(class, capacity))
    }

    /// Collections created so far, in class order.
    pub fn collections(&self) -> impl Iterator<Item = &EntityCollection<H>> {
        self.collections.values()
    }

    pub fn is_full(&self, class: EntityClass) -> bool {
        self.collection_size(class) >= self.capacity(class)
    }

    pub fn collection_size(&self, class: EntityClass) -> usize {
        self.collections.get(&class).map_or(0, EntityCollection::count)
    }

    pub fn total_live(&self) -> usize {
        self.index.len()
    }

    pub fn contains(&self, handle: H) -> bool {
        self.index.contains_key(&handle)
    }

    pub fn class_of(&self, handle: H) -> Option<EntityClass> {
        self.index.get(&handle).copied()
    }

    /// Admit `handle` into its class collection.
    ///
    /// # Panics
    /// If `handle` is already registered in any collection.
    pub fn try_register(&mut self, class: EntityClass, handle: H) -> Result<(), AdmissionError> {
        if let Some(existing) = self.index.get(&handle) {
            panic!("handle {handle:?} is already registered as {existing:?}");
        }
        let collection = self.get_or_create_collection(class);
        if collection.is_full() {
            return Err(AdmissionError::CollectionFull(class));
        }
        collection.live.push(handle);
        self.index.insert(handle, class);
        Ok(())
    }

    /// Remove `handle` wherever it is. Returns the class it was in.
    pub fn unregister(&mut self, handle: H) -> Option<EntityClass> {
        let class = self.index.remove(&handle)?;
        if let Some(collection) = self.collections.get_mut(&class) {
            collection.live.retain(|h| *h != handle);
        }
        Some(class)
    }

    /// Drop every handle for which `is_alive` returns false.
    pub fn sweep(&mut self, mut is_alive: impl FnMut(H) -> bool) -> Vec<H> {
        let mut removed = Vec::new();
        for collection in self.collections.values_mut() {
            collection.live.retain(|handle| {
                let alive = is_alive(*handle);
                if !alive {
                    removed.push(*handle);
                }
                alive
            });
        }
        for handle in &removed {
            self.index.remove(handle);
        }
        if !removed.is_empty() {
            warn!(count = removed.len(), "registry sweep removed stale handles");
        }
        removed
    }
}
