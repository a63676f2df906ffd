//! Verification store: where pending codes live between issue and verify.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::CacheStore;
use crate::error::StoreError;

/// Namespace for OTP keys in a shared cache.
pub const KEY_PREFIX: &str = "otp:";

/// Key a recipient's pending code is stored under.
pub fn store_key(recipient: &str) -> String {
    format!("{}{}", KEY_PREFIX, recipient)
}

// == Pending OTP ==
/// One outstanding verification challenge.
///
/// Stored as `<code>:<expiry>` where expiry is a Unix timestamp in seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOtp {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl PendingOtp {
    /// Builds a record; `expires_at` is truncated to whole seconds so that it
    /// survives encoding unchanged.
    pub fn new(code: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        let expires_at = DateTime::from_timestamp(expires_at.timestamp(), 0).unwrap_or(expires_at);
        Self {
            code: code.into(),
            expires_at,
        }
    }

    pub fn encode(&self) -> String {
        format!("{}:{}", self.code, self.expires_at.timestamp())
    }

    /// Parses a stored value. Returns `None` unless it is `<digits>:<seconds>`.
    pub fn decode(raw: &str) -> Option<Self> {
        let (code, expiry) = raw.split_once(':')?;
        if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let secs: i64 = expiry.parse().ok()?;
        Some(Self {
            code: code.to_string(),
            expires_at: DateTime::from_timestamp(secs, 0)?,
        })
    }

    /// A code is still accepted at exactly its expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

// == Store Trait ==
/// Single-key put/get/delete with store-enforced expiry.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Writes `pending` for `recipient`, replacing any previous record. The
    /// store drops the record on its own after `ttl`.
    async fn put(
        &self,
        recipient: &str,
        pending: &PendingOtp,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    async fn get(&self, recipient: &str) -> Result<Option<PendingOtp>, StoreError>;

    /// Removes the record. Absent records are not an error.
    async fn delete(&self, recipient: &str) -> Result<(), StoreError>;
}

/// Decodes a raw value read from a store, flagging garbage as corrupt.
pub(crate) fn decode_record(key: String, raw: String) -> Result<PendingOtp, StoreError> {
    PendingOtp::decode(&raw).ok_or(StoreError::Corrupt { key, value: raw })
}

// == Memory Store ==
/// Verification store backed by the embedded TTL cache.
#[derive(Clone)]
pub struct MemoryOtpStore {
    cache: Arc<RwLock<CacheStore>>,
}

impl MemoryOtpStore {
    pub fn new(cache: CacheStore) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Shared handle to the underlying cache, for the sweeper task.
    pub fn cache(&self) -> Arc<RwLock<CacheStore>> {
        self.cache.clone()
    }

    /// Writes a raw value, bypassing encoding.
    pub async fn put_raw(
        &self,
        recipient: &str,
        raw: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        cache.set(store_key(recipient), raw.to_string(), ttl)?;
        Ok(())
    }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn put(
        &self,
        recipient: &str,
        pending: &PendingOtp,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        self.put_raw(recipient, &pending.encode(), ttl).await
    }

    async fn get(&self, recipient: &str) -> Result<Option<PendingOtp>, StoreError> {
        let key = store_key(recipient);
        let raw = self.cache.write().await.get(&key);
        raw.map(|raw| decode_record(key, raw)).transpose()
    }

    async fn delete(&self, recipient: &str) -> Result<(), StoreError> {
        let removed = self.cache.write().await.delete(&store_key(recipient));
        debug!(recipient, removed, "deleted pending OTP");
        Ok(())
    }
}
