use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

type LockMap = Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>;

/// One async mutex per series root.
///
/// Every read-decide-write cycle on a series (expansion, cascade,
/// cancellation, rule edit) runs while holding its series lock, so
/// concurrent paths cannot both decide that the same occurrence is missing.
/// Entries only live while someone holds or waits for them.
#[derive(Debug, Default)]
pub struct SeriesLocks {
    locks: Arc<LockMap>,
}

/// Holds a series lock. Dropping it releases the lock and removes the map
/// entry when nobody else is waiting.
#[derive(Debug)]
pub struct SeriesGuard {
    root: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<LockMap>,
}

impl Drop for SeriesGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(lock) = locks.get(&self.root) {
            if Arc::strong_count(lock) == 1 {
                locks.remove(&self.root);
            }
        }
    }
}

impl SeriesLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, root: Uuid) -> SeriesGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(root).or_default().clone()
        };
        SeriesGuard {
            root,
            guard: Some(lock.lock_owned().await),
            locks: self.locks.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
