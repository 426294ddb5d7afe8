//! Thread-safe cart handle.
//!
//! Mutations are serialized through a mutex so each one, together with its
//! recompute, is observed atomically by every other thread.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{CartState, CartStore};

/// Cheaply cloneable, mutex-guarded [`CartStore`].
#[derive(Debug, Clone, Default)]
pub struct SharedCartStore {
    inner: Arc<Mutex<CartStore>>,
}

impl SharedCartStore {
    #[must_use]
    pub fn new(store: CartStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` with exclusive access to the store.
    ///
    /// A poisoned lock is recovered. Store mutations replace the state in a
    /// single assignment after pricing, so a panic inside `f` cannot leave
    /// lines and totals out of step.
    pub fn with<R>(&self, f: impl FnOnce(&mut CartStore) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    /// An owned copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.lock().snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, CartStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
