//! OTP Gateway - email one-time-password service
//!
//! Issues short numeric codes by email, keeps them in a TTL store and
//! accepts each one once before it expires. Also hosts a small product
//! catalog stub.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod otp;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
