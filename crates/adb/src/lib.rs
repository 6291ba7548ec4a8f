//! ADB endpoint client.
//!
//! Drives a remote ADB daemon through the local `adb` binary: connect to a
//! `host:port` endpoint, verify it registered, and run shell commands on it.
//! The wire protocol itself stays adb's problem.

pub mod client;
pub mod devices;

// Re-export primary types.
pub use client::{AdbClient, AdbConfig};
pub use devices::{DeviceEntry, DeviceState, parse_devices};

/// Errors for adb operations.
#[derive(Debug, thiserror::Error)]
pub enum AdbError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// adb itself ran but reported failure (non-zero exit).
    #[error("adb failed: {0}")]
    CommandFailed(String),

    /// The remote never registered with the local adb server.
    #[error("connection refused: {0}")]
    Refused(String),

    /// The remote registered but is not usable (offline, unauthorized).
    #[error("device is {state}")]
    DeviceState { state: String },

    #[error("adb call timed out")]
    Timeout,
}
