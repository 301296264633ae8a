//! Per-slot critical sections for the reservation ledger
//!
//! Bookings for the same (venue, table, date) run one at a time inside this
//! process; bookings for different slots never wait on each other. Entries are
//! dropped from the map once the last holder or waiter releases them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::entities::SlotKey;

type SlotMap = HashMap<SlotKey, Arc<AsyncMutex<()>>>;

/// Keyed async mutex over booking slots
#[derive(Default)]
pub struct SlotLocks {
    slots: Arc<Mutex<SlotMap>>,
}

impl SlotLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until `key` is free and hold it until the guard is dropped
    pub async fn acquire(&self, key: SlotKey) -> SlotGuard {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.entry(key).or_default().clone()
        };
        let guard = slot.lock_owned().await;
        SlotGuard {
            key,
            guard: Some(guard),
            slots: self.slots.clone(),
        }
    }

    /// Number of slots currently held or awaited
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// RAII guard for one held slot
pub struct SlotGuard {
    key: SlotKey,
    guard: Option<OwnedMutexGuard<()>>,
    slots: Arc<Mutex<SlotMap>>,
}

impl SlotGuard {
    #[cfg(test)]
    pub fn key(&self) -> &SlotKey {
        &self.key
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        // Release the async mutex before inspecting the refcount.
        drop(self.guard.take());
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get(&self.key) {
            // Only the map itself still references the mutex: nobody is waiting.
            if Arc::strong_count(slot) == 1 {
                slots.remove(&self.key);
            }
        }
    }
}
