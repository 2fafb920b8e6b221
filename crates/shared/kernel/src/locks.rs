//! Key-scoped async mutual exclusion.
//!
//! Writers that read-modify-write a record take the record's key first. Keys are
//! namespaced strings (`student:<id>`, `course:<id>`); when one task needs several,
//! it acquires them in a fixed order: student before course.

use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

const MIN_HIGH_WATER: usize = 256;

#[derive(Debug)]
struct Slots {
    map: FxHashMap<String, Weak<AsyncMutex<()>>>,
    /// Size at which dead entries are swept.
    high_water: usize,
}

impl Default for Slots {
    fn default() -> Self {
        Self { map: FxHashMap::default(), high_water: MIN_HIGH_WATER }
    }
}

/// A table of async mutexes created on demand per key.
///
/// Entries are weak: once no task holds or waits on a key, its mutex is freed and the
/// slot is swept the next time the table grows past its high-water mark.
#[derive(Debug, Clone, Default)]
pub struct KeyedLocks {
    slots: Arc<Mutex<Slots>>,
}

/// Held lock on one key. Released on drop.
#[derive(Debug)]
#[must_use = "The key is unlocked as soon as the guard is dropped"]
pub struct KeyGuard {
    key: String,
    _guard: OwnedMutexGuard<()>,
}

impl KeyGuard {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl KeyedLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`.
    pub async fn lock(&self, key: impl Into<String>) -> KeyGuard {
        let key = key.into();
        let mutex = self.slot(&key);
        let guard = mutex.lock_owned().await;
        KeyGuard { key, _guard: guard }
    }

    pub async fn student(&self, student_id: &str) -> KeyGuard {
        self.lock(format!("student:{student_id}")).await
    }

    pub async fn course(&self, course_id: &str) -> KeyGuard {
        self.lock(format!("course:{course_id}")).await
    }

    /// Number of live slots, swept entries excluded.
    #[must_use]
    pub fn live_keys(&self) -> usize {
        self.slots.lock().map.values().filter(|slot| slot.strong_count() > 0).count()
    }

    fn slot(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut slots = self.slots.lock();
        if let Some(mutex) = slots.map.get(key).and_then(Weak::upgrade) {
            return mutex;
        }

        let mutex = Arc::new(AsyncMutex::new(()));
        slots.map.insert(key.to_owned(), Arc::downgrade(&mutex));

        if slots.map.len() > slots.high_water {
            slots.map.retain(|_, slot| slot.strong_count() > 0);
            let live = slots.map.len();
            slots.high_water = (live * 2).max(MIN_HIGH_WATER);
        }
        mutex
    }
}
