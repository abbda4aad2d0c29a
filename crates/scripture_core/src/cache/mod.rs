//! Time-bounded key/value cache with durable persistence.
//!
//! # Responsibility
//! - Memoize resolver results per composite key with a fixed expiry.
//! - Persist the full entry map under one storage key on every write.
//!
//! # Invariants
//! - An entry is valid only while `0 <= now - timestamp < expiry`.
//! - Stale entries read as absent and are pruned on the next `set`.
//! - A missing or corrupt persisted blob yields an empty cache, never an error.
//! - Persistence failures are logged; in-memory state stays authoritative.
//!
//! # See also
//! - `store` for the durable backends.

pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{CacheStore, MemoryCacheStore, SqliteCacheStore, StoreError, StoreResult};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

/// One persisted cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: Value,
    pub timestamp: i64,
}

/// Named cache instance with its own storage key and expiry.
pub struct Cache<'a> {
    storage_key: String,
    expiry_ms: i64,
    entries: RefCell<BTreeMap<String, CacheEntry>>,
    store: Box<dyn CacheStore + 'a>,
    clock: Rc<dyn Clock>,
}

impl<'a> Cache<'a> {
    /// Opens a cache and loads its persisted map.
    pub fn open(
        storage_key: impl Into<String>,
        expiry: Duration,
        store: Box<dyn CacheStore + 'a>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let storage_key = storage_key.into();
        let entries = load_entries(store.as_ref(), &storage_key);
        debug!(
            "event=cache_load module=cache status=ok storage_key={} entries={}",
            storage_key,
            entries.len()
        );
        Self {
            storage_key,
            expiry_ms: i64::try_from(expiry.as_millis()).unwrap_or(i64::MAX),
            entries: RefCell::new(entries),
            store,
            clock,
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn expiry(&self) -> Duration {
        Duration::from_millis(self.expiry_ms.max(0) as u64)
    }

    /// Returns the fresh value stored under `key`.
    ///
    /// Stale entries and entries that no longer decode as `T` read as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let now = self.clock.now_ms();
        let entries = self.entries.borrow();
        let entry = entries.get(key)?;
        if !self.is_fresh(entry, now) {
            debug!(
                "event=cache_get module=cache status=stale storage_key={} key={}",
                self.storage_key, key
            );
            return None;
        }
        match serde_json::from_value(entry.data.clone()) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    "event=cache_get module=cache status=error storage_key={} key={} error={}",
                    self.storage_key, key, err
                );
                None
            }
        }
    }

    /// Stores `data` under `key`, prunes expired entries and persists the map.
    pub fn set<T: Serialize>(&self, key: &str, data: &T) {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(err) => {
                warn!(
                    "event=cache_set module=cache status=error storage_key={} key={} error={}",
                    self.storage_key, key, err
                );
                return;
            }
        };
        let now = self.clock.now_ms();
        {
            let mut entries = self.entries.borrow_mut();
            entries.retain(|_, entry| is_within(entry.timestamp, now, self.expiry_ms));
            entries.insert(
                key.to_string(),
                CacheEntry {
                    data,
                    timestamp: now,
                },
            );
        }
        self.persist();
    }

    /// Evicts a single entry.
    pub fn remove(&self, key: &str) {
        let removed = self.entries.borrow_mut().remove(key).is_some();
        if removed {
            self.persist();
        }
    }

    /// Drops every entry and the persisted blob.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
        if let Err(err) = self.store.remove(&self.storage_key) {
            warn!(
                "event=cache_clear module=cache status=error storage_key={} error={}",
                self.storage_key, err
            );
        }
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn is_fresh(&self, entry: &CacheEntry, now: i64) -> bool {
        is_within(entry.timestamp, now, self.expiry_ms)
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&*self.entries.borrow()) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    "event=cache_persist module=cache status=error storage_key={} error={}",
                    self.storage_key, err
                );
                return;
            }
        };
        if let Err(err) = self.store.save(&self.storage_key, &payload) {
            warn!(
                "event=cache_persist module=cache status=error storage_key={} error={}",
                self.storage_key, err
            );
        }
    }
}

/// Entry age lies in `[0, expiry_ms)`; timestamps from the future or too far
/// in the past to subtract count as stale.
fn is_within(timestamp: i64, now: i64, expiry_ms: i64) -> bool {
    now.checked_sub(timestamp)
        .is_some_and(|age| (0..expiry_ms).contains(&age))
}

fn load_entries(store: &dyn CacheStore, storage_key: &str) -> BTreeMap<String, CacheEntry> {
    let payload = match store.load(storage_key) {
        Ok(Some(payload)) => payload,
        Ok(None) => return BTreeMap::new(),
        Err(err) => {
            warn!(
                "event=cache_load module=cache status=error storage_key={} error={}",
                storage_key, err
            );
            return BTreeMap::new();
        }
    };
    match serde_json::from_str(&payload) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(
                "event=cache_load module=cache status=corrupt storage_key={} error={}",
                storage_key, err
            );
            BTreeMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cache, CacheStore, ManualClock, MemoryCacheStore};
    use std::rc::Rc;
    use std::time::Duration;

    const MINUTE_MS: i64 = 60 * 1000;

    fn cache_with(store: &MemoryCacheStore, clock: &ManualClock, minutes: u64) -> Cache<'static> {
        Cache::open(
            "scripture_cache.test",
            Duration::from_secs(minutes * 60),
            Box::new(store.clone()),
            Rc::new(clock.clone()),
        )
    }

    #[test]
    fn entry_is_fresh_until_expiry() {
        let store = MemoryCacheStore::new();
        let clock = ManualClock::new(1_000_000);
        let cache = cache_with(&store, &clock, 10);

        cache.set("books_kjv", &vec!["GEN".to_string()]);
        clock.advance_ms(5 * MINUTE_MS);
        assert_eq!(cache.get::<Vec<String>>("books_kjv"), Some(vec!["GEN".to_string()]));

        clock.advance_ms(15 * MINUTE_MS);
        assert_eq!(cache.get::<Vec<String>>("books_kjv"), None);
    }

    #[test]
    fn extreme_persisted_timestamps_read_as_stale() {
        let store = MemoryCacheStore::new();
        store
            .save(
                "scripture_cache.test",
                &format!(
                    r#"{{"old":{{"data":1,"timestamp":{}}},"future":{{"data":2,"timestamp":{}}}}}"#,
                    i64::MIN,
                    i64::MAX
                ),
            )
            .unwrap();
        let clock = ManualClock::new(1_000_000);
        let cache = cache_with(&store, &clock, 10);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get::<i32>("old"), None);
        assert_eq!(cache.get::<i32>("future"), None);

        cache.set("fresh", &3);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get::<i32>("fresh"), Some(3));
    }

    #[test]
    fn entry_expires_exactly_at_expiry() {
        let store = MemoryCacheStore::new();
        let clock = ManualClock::new(0);
        let cache = cache_with(&store, &clock, 1);

        cache.set("k", &1_u32);
        clock.set(MINUTE_MS - 1);
        assert_eq!(cache.get::<u32>("k"), Some(1));
        clock.set(MINUTE_MS);
        assert_eq!(cache.get::<u32>("k"), None);
    }

    #[test]
    fn set_prunes_expired_entries() {
        let store = MemoryCacheStore::new();
        let clock = ManualClock::new(0);
        let cache = cache_with(&store, &clock, 5);

        cache.set("old", &"a");
        clock.advance_ms(6 * MINUTE_MS);
        cache.set("new", &"b");
        assert_eq!(cache.len(), 1);
        let blob = store.blob("scripture_cache.test").unwrap();
        assert!(!blob.contains("\"old\""));
        assert!(blob.contains("\"new\""));
    }

    #[test]
    fn map_survives_reopen() {
        let store = MemoryCacheStore::new();
        let clock = ManualClock::new(0);
        cache_with(&store, &clock, 5).set("all_versions", &vec!["kjv"]);

        let reopened = cache_with(&store, &clock, 5);
        assert_eq!(reopened.get::<Vec<String>>("all_versions"), Some(vec!["kjv".to_string()]));
    }

    #[test]
    fn corrupt_blob_yields_empty_cache() {
        let store = MemoryCacheStore::new();
        store.save("scripture_cache.test", "not json").unwrap();
        let clock = ManualClock::new(0);
        let cache = cache_with(&store, &clock, 5);
        assert!(cache.is_empty());

        cache.set("k", &"v");
        assert_eq!(cache.get::<String>("k"), Some("v".to_string()));
    }

    #[test]
    fn remove_evicts_one_entry_and_clear_drops_blob() {
        let store = MemoryCacheStore::new();
        let clock = ManualClock::new(0);
        let cache = cache_with(&store, &clock, 5);
        cache.set("a", &1);
        cache.set("b", &2);

        cache.remove("a");
        assert_eq!(cache.get::<i32>("a"), None);
        assert_eq!(cache.get::<i32>("b"), Some(2));
        assert!(!store.blob("scripture_cache.test").unwrap().contains("\"a\""));

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(store.blob("scripture_cache.test"), None);
    }

    #[test]
    fn mismatched_type_reads_as_absent() {
        let store = MemoryCacheStore::new();
        let clock = ManualClock::new(0);
        let cache = cache_with(&store, &clock, 5);
        cache.set("k", &"text");
        assert_eq!(cache.get::<u32>("k"), None);
    }
}
