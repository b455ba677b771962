//! Process-wide invocation counters for generated methods.
//!
//! Counters are created once per [`TrackingKey`], start at zero, and only ever
//! grow. Nothing here is persisted; a snapshot reflects the current process.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::types::{DeclarationKind, TrackingError, TrackingKey};

/// Immutable copy of every counter, keyed by rendered tracking key.
pub type Snapshot = BTreeMap<String, u64>;

#[derive(Debug)]
struct Counter {
    key: TrackingKey,
    count: AtomicU64,
}

#[derive(Debug, Default)]
struct Inner {
    counters: HashMap<String, Arc<Counter>>,
    // (owner, method) -> kind, used to reject the same member tracked twice
    members: HashMap<(String, String), DeclarationKind>,
}

/// Mapping from tracking key to invocation counter.
///
/// The map itself is guarded by a read-write lock; increments only take the
/// read side and bump an atomic, so concurrent callers of the same wrapped
/// method never lose updates.
#[derive(Debug, Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry. Created on first use and never reset.
    pub fn global() -> Arc<Registry> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Registry::new())))
    }

    /// Create a zero counter for `key` if absent. Re-initializing an existing
    /// key is a no-op and never resets its count.
    pub fn init(&self, key: &TrackingKey) -> Result<(), TrackingError> {
        let rendered = key.to_string();
        let mut inner = self.inner.write();

        if let Some(existing) = inner.counters.get(&rendered) {
            if existing.key.kind != key.kind {
                return Err(collision(key, existing.key.kind));
            }
            return Ok(());
        }

        let member = (key.owner.clone(), key.method.clone());
        if let Some(kind) = inner.members.get(&member) {
            if *kind != key.kind {
                return Err(collision(key, *kind));
            }
        }

        tracing::debug!(key = %rendered, kind = %key.kind, "tracking counter initialized");
        inner.members.insert(member, key.kind);
        inner.counters.insert(
            rendered,
            Arc::new(Counter {
                key: key.clone(),
                count: AtomicU64::new(0),
            }),
        );
        Ok(())
    }

    /// Bump the counter for a rendered key, returning the new value.
    pub fn increment(&self, key: &str) -> Result<u64, TrackingError> {
        let inner = self.inner.read();
        match inner.counters.get(key) {
            Some(counter) => Ok(counter.count.fetch_add(1, Ordering::SeqCst) + 1),
            None => Err(TrackingError::MissingKey(key.to_string())),
        }
    }

    /// Current value of one counter.
    pub fn get(&self, key: &str) -> Option<u64> {
        self.inner
            .read()
            .counters
            .get(key)
            .map(|c| c.count.load(Ordering::SeqCst))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().counters.contains_key(key)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner
            .read()
            .counters
            .iter()
            .map(|(k, c)| (k.clone(), c.count.load(Ordering::SeqCst)))
            .collect()
    }

    /// Every tracked key with its declaration kind, sorted by rendered key.
    pub fn keys(&self) -> Vec<TrackingKey> {
        let inner = self.inner.read();
        let mut keys: Vec<TrackingKey> = inner.counters.values().map(|c| c.key.clone()).collect();
        keys.sort_by_key(|k| k.to_string());
        keys
    }

    pub fn len(&self) -> usize {
        self.inner.read().counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn collision(key: &TrackingKey, existing: DeclarationKind) -> TrackingError {
    TrackingError::NameCollision {
        owner: key.owner.clone(),
        method: key.method.clone(),
        existing,
        requested: key.kind,
    }
}
