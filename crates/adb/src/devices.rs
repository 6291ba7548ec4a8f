//! Parsing of `adb devices` output.

use std::fmt;

/// Registration state of a device as reported by `adb devices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceState {
    /// Registered and usable.
    Device,
    /// Registered but not answering.
    Offline,
    /// Registered but the remote has not authorized this host.
    Unauthorized,
    /// Any other state adb may report.
    Other(String),
}

impl DeviceState {
    fn from_token(token: &str) -> Self {
        match token {
            "device" => DeviceState::Device,
            "offline" => DeviceState::Offline,
            "unauthorized" => DeviceState::Unauthorized,
            other => DeviceState::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceState::Device => write!(f, "device"),
            DeviceState::Offline => write!(f, "offline"),
            DeviceState::Unauthorized => write!(f, "unauthorized"),
            DeviceState::Other(state) => f.write_str(state),
        }
    }
}

/// One row of `adb devices` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry {
    /// Serial as adb reports it; `host:port` for TCP endpoints.
    pub serial: String,
    pub state: DeviceState,
}

/// Parses the tabular output of `adb devices`.
///
/// Skips the `List of devices attached` header, blank lines, and the
/// `* daemon ... *` banner adb prints when it starts its server.
pub fn parse_devices(output: &str) -> Vec<DeviceEntry> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty() && !line.starts_with('*') && !line.starts_with("List of devices")
        })
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let serial = parts.next()?;
            let state = parts.next()?;
            Some(DeviceEntry {
                serial: serial.to_string(),
                state: DeviceState::from_token(state),
            })
        })
        .collect()
}
