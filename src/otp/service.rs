//! Issuance and verification of one-time passwords.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::MAX_KEY_LENGTH;
use crate::error::{OtpError, Result, StoreError};
use crate::otp::clock::Clock;
use crate::otp::generator::{generate_code, DEFAULT_CODE_LENGTH};
use crate::otp::notifier::Notifier;
use crate::otp::store::{store_key, OtpStore, PendingOtp};

/// How long an issued code stays valid unless configured otherwise.
pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(5 * 60);

/// Tunables for code issuance.
#[derive(Debug, Clone)]
pub struct OtpSettings {
    pub code_length: usize,
    pub validity: Duration,
}

impl OtpSettings {
    /// Validity window as a calendar offset, whole seconds.
    pub fn validity_delta(&self) -> chrono::Duration {
        let secs = self.validity.as_secs().min(i32::MAX as u64);
        chrono::Duration::seconds(secs as i64)
    }
}

impl Default for OtpSettings {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            validity: DEFAULT_VALIDITY,
        }
    }
}

/// Drives the OTP lifecycle against injected collaborators.
pub struct OtpService {
    store: Arc<dyn OtpStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    settings: OtpSettings,
}

/// Treats absent and blank values alike.
fn require<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(OtpError::MissingField(field)),
    }
}

/// An email must also fit in a store key.
fn require_email(value: Option<&str>) -> Result<&str> {
    let email = require(value, "email")?;
    if store_key(email).len() > MAX_KEY_LENGTH {
        return Err(OtpError::InvalidField("email"));
    }
    Ok(email)
}

impl OtpService {
    pub fn new(
        store: Arc<dyn OtpStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        settings: OtpSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
            settings,
        }
    }

    // == Issue ==
    /// Generates a fresh code for `email`, stores it and mails it.
    ///
    /// The record is written before delivery, so a delivery failure leaves a
    /// live code behind that expires through the store TTL.
    pub async fn issue(&self, email: Option<&str>) -> Result<()> {
        let email = require_email(email)?;

        let code = generate_code(self.settings.code_length)?;
        let pending = PendingOtp::new(code, self.clock.now() + self.settings.validity_delta());

        self.store
            .put(email, &pending, self.settings.validity)
            .await?;
        debug!(email, expires_at = %pending.expires_at, "stored pending OTP");

        self.notifier.send_code(email, &pending.code).await?;
        info!(email, "OTP issued");
        Ok(())
    }

    // == Verify ==
    /// Accepts `otp` for `email` at most once and never past its expiry.
    ///
    /// A wrong code leaves the record in place so the user can retry.
    pub async fn verify(&self, email: Option<&str>, otp: Option<&str>) -> Result<()> {
        let email = require_email(email)?;
        let otp = require(otp, "otp")?;

        let pending = match self.store.get(email).await {
            Ok(Some(pending)) => pending,
            Ok(None) => return Err(OtpError::NotFound),
            Err(e) => {
                if matches!(e, StoreError::Corrupt { .. }) {
                    warn!(email, "dropping undecodable OTP record");
                    self.store.delete(email).await?;
                }
                return Err(e.into());
            }
        };

        if pending.is_expired_at(self.clock.now()) {
            self.store.delete(email).await?;
            info!(email, "rejected expired OTP");
            return Err(OtpError::Expired);
        }

        if pending.code != otp {
            info!(email, "rejected mismatched OTP");
            return Err(OtpError::InvalidCode);
        }

        self.store.delete(email).await?;
        info!(email, "OTP verified");
        Ok(())
    }
}
