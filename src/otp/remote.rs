//! Verification store living in an external HTTP cache server.
//!
//! The server speaks a small REST dialect:
//! - `PUT /set` with `{"key", "value", "ttl"}` (ttl in seconds)
//! - `GET /get/{key}` answering `{"key", "value"}` or 404
//! - `DELETE /del/{key}` answering 2xx or 404

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::otp::store::{decode_record, store_key, OtpStore, PendingOtp};

#[derive(Debug, Serialize)]
struct SetBody<'a> {
    key: &'a str,
    value: &'a str,
    ttl: u64,
}

#[derive(Debug, Deserialize)]
struct GetBody {
    value: String,
}

/// [`OtpStore`] over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteOtpStore {
    client: Client,
    base_url: Url,
}

impl RemoteOtpStore {
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, StoreError> {
        let base_url =
            Url::parse(base_url).map_err(|e| StoreError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// Appends path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Whole seconds, rounded up, never zero.
fn ttl_secs(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1)
}

#[async_trait]
impl OtpStore for RemoteOtpStore {
    async fn put(
        &self,
        recipient: &str,
        pending: &PendingOtp,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let key = store_key(recipient);
        let value = pending.encode();
        let body = SetBody {
            key: &key,
            value: &value,
            ttl: ttl_secs(ttl),
        };

        let response = self
            .client
            .put(self.endpoint(&["set"])?)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "remote store rejected write");
            return Err(StoreError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    async fn get(&self, recipient: &str) -> Result<Option<PendingOtp>, StoreError> {
        let key = store_key(recipient);
        let response = self
            .client
            .get(self.endpoint(&["get", &key])?)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body: GetBody = response.json().await?;
                decode_record(key, body.value).map(Some)
            }
            status => Err(StoreError::Status(status.as_u16())),
        }
    }

    async fn delete(&self, recipient: &str) -> Result<(), StoreError> {
        let key = store_key(recipient);
        let response = self
            .client
            .delete(self.endpoint(&["del", &key])?)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(recipient, "remote delete of absent record");
                Ok(())
            }
            status if status.is_success() => Ok(()),
            status => Err(StoreError::Status(status.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_secs_rounds_up() {
        assert_eq!(ttl_secs(Duration::from_secs(300)), 300);
        assert_eq!(ttl_secs(Duration::from_millis(299_001)), 300);
        assert_eq!(ttl_secs(Duration::ZERO), 1);
    }

    #[test]
    fn test_endpoint_encodes_key() {
        let store = RemoteOtpStore::new("http://cache.local:3000/").unwrap();
        let url = store.endpoint(&["get", "otp:a/b?c@example.com"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://cache.local:3000/get/otp:a%2Fb%3Fc@example.com"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let store = RemoteOtpStore::new("http://cache.local/v1").unwrap();
        let url = store.endpoint(&["set"]).unwrap();
        assert_eq!(url.as_str(), "http://cache.local/v1/set");
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        assert!(matches!(
            RemoteOtpStore::new("not a url"),
            Err(StoreError::InvalidUrl(_))
        ));
        assert!(matches!(
            RemoteOtpStore::new("mailto:cache@example.com"),
            Err(StoreError::InvalidUrl(_))
        ));
    }
}
