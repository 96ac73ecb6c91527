//! Process-wide handle to the current host context
//!
//! The activity that owns the engine can be recreated, so the slot is
//! replaced on every publish instead of being set once. Readers get an
//! `Arc` and keep using it even if the slot is withdrawn meanwhile.

use parking_lot::RwLock;
use std::sync::Arc;

pub struct ContextSlot<T> {
    current: RwLock<Option<Arc<T>>>,
}

impl<T> ContextSlot<T> {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// Make `value` the current context, replacing any previous one.
    pub fn publish(&self, value: T) -> Arc<T> {
        let value = Arc::new(value);
        if self.current.write().replace(Arc::clone(&value)).is_some() {
            log::info!("host context replaced");
        }
        value
    }

    pub fn current(&self) -> Option<Arc<T>> {
        self.current.read().clone()
    }

    pub fn withdraw(&self) -> Option<Arc<T>> {
        self.current.write().take()
    }
}

impl<T> Default for ContextSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
