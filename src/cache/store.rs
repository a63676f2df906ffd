//! Cache Store Module
//!
//! HashMap storage with per-entry TTL and a hard capacity bound.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{current_timestamp_ms, CacheEntry, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::CacheError;

// == Cache Store ==
/// In-memory TTL cache.
///
/// Expired entries are never returned: reads drop them lazily and
/// [`cleanup_expired`](Self::cleanup_expired) sweeps the rest.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    max_entries: usize,
}

impl CacheStore {
    /// Creates an empty store holding at most `max_entries` live entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries,
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`, replacing any previous value.
    ///
    /// When the store is full, expired entries are swept first; if it is
    /// still full the write is rejected rather than dropping a live entry.
    pub fn set(&mut self, key: String, value: String, ttl: Duration) -> Result<(), CacheError> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
        }

        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidRequest(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        if ttl.is_zero() {
            return Err(CacheError::InvalidRequest(
                "TTL must be greater than zero".to_string(),
            ));
        }

        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && self.entries.len() >= self.max_entries {
            self.cleanup_expired();
            if self.entries.len() >= self.max_entries {
                return Err(CacheError::CacheFull(format!(
                    "Cache holds {} live entries",
                    self.entries.len()
                )));
            }
        }

        self.entries.insert(key, CacheEntry::new(value, ttl));
        Ok(())
    }

    // == Get ==
    /// Returns the live value under `key`, dropping it if it has expired.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let entry = self.entries.get(key)?;
        if entry.is_expired() {
            self.entries.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    // == Delete ==
    /// Removes `key`. Returns whether a live entry was removed; deleting an
    /// absent key is not an error.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => !entry.is_expired(),
            None => false,
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new(100);

        store
            .set("otp:a@example.com".to_string(), "123456:1".to_string(), TTL)
            .unwrap();

        assert_eq!(store.get("otp:a@example.com").as_deref(), Some("123456:1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = CacheStore::new(100);
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_store_delete_is_idempotent() {
        let mut store = CacheStore::new(100);

        store.set("key".to_string(), "value".to_string(), TTL).unwrap();
        assert!(store.delete("key"));
        assert!(!store.delete("key"));
        assert!(store.get("key").is_none());
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(100);

        store.set("key".to_string(), "first".to_string(), TTL).unwrap();
        store.set("key".to_string(), "second".to_string(), TTL).unwrap();

        assert_eq!(store.get("key").as_deref(), Some("second"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(100);

        store
            .set("key".to_string(), "value".to_string(), Duration::from_millis(50))
            .unwrap();
        assert!(store.get("key").is_some());

        sleep(Duration::from_millis(80));

        assert!(store.get("key").is_none());
        assert!(store.is_empty(), "Expired entry should be dropped on read");
    }

    #[test]
    fn test_store_full_rejects_new_key() {
        let mut store = CacheStore::new(2);

        store.set("a".to_string(), "1".to_string(), TTL).unwrap();
        store.set("b".to_string(), "2".to_string(), TTL).unwrap();

        let result = store.set("c".to_string(), "3".to_string(), TTL);
        assert!(matches!(result, Err(CacheError::CacheFull(_))));

        // Overwriting an existing key still works at capacity
        store.set("a".to_string(), "10".to_string(), TTL).unwrap();
        assert_eq!(store.get("a").as_deref(), Some("10"));
    }

    #[test]
    fn test_store_full_sweeps_expired_before_rejecting() {
        let mut store = CacheStore::new(1);

        store
            .set("old".to_string(), "1".to_string(), Duration::from_millis(30))
            .unwrap();
        sleep(Duration::from_millis(60));

        store.set("new".to_string(), "2".to_string(), TTL).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("new").as_deref(), Some("2"));
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = CacheStore::new(100);

        store
            .set("short".to_string(), "1".to_string(), Duration::from_millis(30))
            .unwrap();
        store.set("long".to_string(), "2".to_string(), TTL).unwrap();

        sleep(Duration::from_millis(60));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").is_some());
    }

    #[test]
    fn test_store_rejects_bad_input() {
        let mut store = CacheStore::new(100);

        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);
        assert!(matches!(
            store.set(long_key, "v".to_string(), TTL),
            Err(CacheError::InvalidRequest(_))
        ));

        let large_value = "x".repeat(MAX_VALUE_SIZE + 1);
        assert!(matches!(
            store.set("k".to_string(), large_value, TTL),
            Err(CacheError::InvalidRequest(_))
        ));

        assert!(matches!(
            store.set(String::new(), "v".to_string(), TTL),
            Err(CacheError::InvalidRequest(_))
        ));

        assert!(matches!(
            store.set("k".to_string(), "v".to_string(), Duration::ZERO),
            Err(CacheError::InvalidRequest(_))
        ));
    }
}
