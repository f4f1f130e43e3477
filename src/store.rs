use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Counter {0} already exists")]
    AlreadyExists(String),

    #[error("Counter {0} does not exist")]
    NotFound(String),
}

/// In-memory counters keyed by name.
/// Clones share the same map, so a single store can be injected into every handler.
#[derive(Clone, Default)]
pub struct CounterStore {
    counters: Arc<DashMap<String, u64>>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with value 0.
    pub fn create(&self, name: &str) -> StoreResult<u64> {
        match self.counters.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(name.to_owned())),
            Entry::Vacant(slot) => {
                slot.insert(0);
                Ok(0)
            }
        }
    }

    pub fn read(&self, name: &str) -> StoreResult<u64> {
        self.counters
            .get(name)
            .map(|value| *value)
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))
    }

    /// Increments `name` by one and returns the new value.
    /// The shard stays write-locked for the whole read-modify-write.
    pub fn update(&self, name: &str) -> StoreResult<u64> {
        let mut value = self
            .counters
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))?;
        *value = value.saturating_add(1);
        Ok(*value)
    }

    pub fn delete(&self, name: &str) -> StoreResult<()> {
        self.counters
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
