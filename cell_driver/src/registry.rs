//! Instance registry.
//!
//! Arena of live instances keyed by their unique numeric handle. Removal is
//! by handle, so it always removes the very record that was inserted under
//! that handle, never one that merely looks equal.
//!
//! The registry itself does no locking: every method expects the caller to
//! hold the driver lock (the registry lives inside it).

use crate::handle::CellHandle;
use crate::instance::CellInstance;
use cell_common::error::{CellError, CellResult};
use cell_common::port::AtHandle;
use std::collections::HashMap;

/// Collection of all live cellular instances.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: HashMap<CellHandle, CellInstance>,
}

impl InstanceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            instances: HashMap::new(),
        }
    }

    /// Make room for one more record before it is built.
    ///
    /// # Errors
    /// `NoMemory` if the allocation fails.
    pub fn reserve_one(&mut self) -> CellResult<()> {
        self.instances
            .try_reserve(1)
            .map_err(|_| CellError::NoMemory)
    }

    /// Insert a fully initialised record. No validation is done here.
    pub fn insert(&mut self, instance: CellInstance) {
        self.instances.insert(instance.handle(), instance);
    }

    /// First instance using the given AT channel.
    pub fn find_by_at_handle(&self, at_handle: &AtHandle) -> Option<&CellInstance> {
        self.instances
            .values()
            .find(|inst| inst.at_handle() == at_handle)
    }

    /// Instance with the given numeric handle.
    pub fn get(&self, handle: CellHandle) -> Option<&CellInstance> {
        self.instances.get(&handle)
    }

    /// Mutable instance with the given numeric handle.
    pub fn get_mut(&mut self, handle: CellHandle) -> Option<&mut CellInstance> {
        self.instances.get_mut(&handle)
    }

    /// Whether a handle is live.
    pub fn contains(&self, handle: CellHandle) -> bool {
        self.instances.contains_key(&handle)
    }

    /// Unlink an instance. Its resources are not released here.
    pub fn remove(&mut self, handle: CellHandle) -> Option<CellInstance> {
        self.instances.remove(&handle)
    }

    /// Unlink every instance, for bulk teardown. Resources are not
    /// released here.
    pub fn drain(&mut self) -> impl Iterator<Item = CellInstance> + '_ {
        self.instances.drain().map(|(_, instance)| instance)
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no instance is live.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Live handles, sorted.
    pub fn handles(&self) -> Vec<CellHandle> {
        let mut handles: Vec<CellHandle> = self.instances.keys().copied().collect();
        handles.sort_unstable();
        handles
    }

    /// Iterate over live instances in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &CellInstance> {
        self.instances.values()
    }
}
