//! Background Tasks Module
//!
//! # Tasks
//! - Store sweep: drops expired OTP records from the embedded cache

mod cleanup;

pub use cleanup::spawn_cleanup_task;
