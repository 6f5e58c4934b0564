use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Key = (String, String);
type Slots = HashMap<Key, Arc<AsyncMutex<()>>>;

/// In-process async locks keyed by `(user_id, normalized product name)`.
///
/// Calls for the same key run one after another; different keys never wait
/// on each other. Idle keys are dropped from the map when their last guard
/// is released.
#[derive(Clone, Default)]
pub struct KeyedLocks {
    slots: Arc<Mutex<Slots>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, user_id: &str, name: &str) -> KeyGuard {
        let key = (user_id.to_owned(), name.to_owned());
        let slot = {
            let mut slots = self.slots();
            slots.entry(key.clone()).or_default().clone()
        };

        let guard = slot.lock_owned().await;
        tracing::trace!(user_id, product = name, "Acquired product lock");

        KeyGuard {
            key,
            guard: Some(guard),
            slots: self.slots.clone(),
        }
    }

    /// Number of keys currently held or awaited.
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct KeyGuard {
    key: Key,
    guard: Option<OwnedMutexGuard<()>>,
    slots: Arc<Mutex<Slots>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let idle = slots
            .get(&self.key)
            .is_some_and(|slot| Arc::strong_count(slot) == 1);

        if idle {
            slots.remove(&self.key);
        }
    }
}
