//! OTP Module
//!
//! Email one-time-password lifecycle: generate a code, persist it with an
//! expiry, deliver it, and accept it exactly once before it expires.
//!
//! Collaborators are injected as trait objects so tests can swap in fakes:
//! - [`OtpStore`] - where pending codes live
//! - [`Notifier`] - how codes reach the recipient
//! - [`Clock`] - what time it is

mod clock;
mod generator;
mod notifier;
mod remote;
mod service;
mod store;


pub use clock::{Clock, ManualClock, SystemClock};
pub use generator::{generate_code, DEFAULT_CODE_LENGTH};
pub use notifier::{render_body, Notifier, SmtpNotifier, EMAIL_SUBJECT};
pub use remote::RemoteOtpStore;
pub use service::{OtpService, OtpSettings, DEFAULT_VALIDITY};
pub use store::{store_key, MemoryOtpStore, OtpStore, PendingOtp, KEY_PREFIX};
