use crate::core::BodyHandle;
use crate::error::PhysicsError;
use crate::Result;

/// Arena storage for physics objects, addressed by stable handles.
///
/// Slots are never reused: removing an item leaves a hole, so a handle stays
/// valid for the lifetime of the storage and iteration visits items in
/// registration order.
pub struct BodyStorage<T> {
    slots: Vec<Option<T>>,
}

impl<T> BodyStorage<T> {
    /// Creates a new empty storage
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Adds an item to the storage and returns its handle
    pub fn add(&mut self, item: T) -> BodyHandle {
        let handle = BodyHandle(self.slots.len() as u32);
        self.slots.push(Some(item));
        handle
    }

    /// Gets a reference to an item by its handle
    pub fn get(&self, handle: BodyHandle) -> Option<&T> {
        self.slots.get(handle.0 as usize).and_then(|slot| slot.as_ref())
    }

    /// Gets a mutable reference to an item by its handle
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.0 as usize)
            .and_then(|slot| slot.as_mut())
    }

    /// Removes an item from the storage, returning it intact
    pub fn remove(&mut self, handle: BodyHandle) -> Option<T> {
        self.slots.get_mut(handle.0 as usize).and_then(|slot| slot.take())
    }

    /// Returns the number of items in the storage
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    /// Clears all items from the storage
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Returns all live handles in registration order
    pub fn handles(&self) -> Vec<BodyHandle> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| BodyHandle(i as u32)))
            .collect()
    }

    /// Returns an iterator over all items in registration order
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|item| (BodyHandle(i as u32), item)))
    }

    /// Returns a mutable iterator over all items in registration order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|item| (BodyHandle(i as u32), item)))
    }

    /// Gets a body by its handle, returning an error if not found
    pub fn get_body(&self, handle: BodyHandle) -> Result<&T> {
        self.get(handle).ok_or_else(|| {
            PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle))
        })
    }

    /// Gets a mutable reference to a body by its handle, returning an error
    /// if not found
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut T> {
        self.get_mut(handle).ok_or_else(|| {
            PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle))
        })
    }
}

impl<T> Default for BodyStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}
