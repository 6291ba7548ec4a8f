//! ADB client driving the local `adb` binary.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::AdbError;
use crate::devices::{DeviceEntry, DeviceState, parse_devices};

/// Paths and deadlines for adb invocations.
///
/// The deadlines are the client's own timeout policy; callers never wait
/// longer than these for an adb call to return.
#[derive(Debug, Clone)]
pub struct AdbConfig {
    /// Path to the adb binary.
    pub adb_path: PathBuf,
    /// Deadline for `adb connect` and `adb devices`.
    pub connect_timeout: Duration,
    /// Deadline for `adb shell` command execution.
    pub command_timeout: Duration,
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self {
            adb_path: PathBuf::from("adb"),
            connect_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(30),
        }
    }
}

/// Connect/run primitives against a single ADB endpoint.
pub struct AdbClient {
    config: AdbConfig,
}

impl AdbClient {
    /// Creates a client with the given configuration.
    pub fn new(config: AdbConfig) -> Self {
        Self { config }
    }

    /// Connects to the daemon at `addr` and verifies it registered.
    ///
    /// `adb connect` exits zero even when the remote refused, so success is
    /// determined by finding `addr` in `adb devices` afterwards, in the
    /// `device` state.
    pub async fn connect(&self, addr: &str) -> Result<(), AdbError> {
        let output = self
            .exec(&["connect", addr], self.config.connect_timeout)
            .await?;
        // Refusals land on stdout with a zero exit code.
        let connect_msg = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(endpoint = %addr, msg = %connect_msg, "adb connect");

        let devices = self.devices().await?;
        match devices.iter().find(|d| d.serial == addr) {
            Some(entry) if entry.state == DeviceState::Device => Ok(()),
            Some(entry) => Err(AdbError::DeviceState {
                state: entry.state.to_string(),
            }),
            None => Err(AdbError::Refused(connect_msg)),
        }
    }

    /// Lists devices currently registered with the local adb server.
    pub async fn devices(&self) -> Result<Vec<DeviceEntry>, AdbError> {
        let output = self
            .exec(&["devices"], self.config.connect_timeout)
            .await?;
        if !output.status.success() {
            return Err(AdbError::CommandFailed(error_text(&output)));
        }
        Ok(parse_devices(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Runs a shell command on the endpoint at `addr`, returning trimmed
    /// stdout.
    pub async fn run(&self, addr: &str, command: &str) -> Result<String, AdbError> {
        let output = self
            .exec(
                &["-s", addr, "shell", command],
                self.config.command_timeout,
            )
            .await?;
        if !output.status.success() {
            return Err(AdbError::CommandFailed(error_text(&output)));
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .trim_end()
            .to_string())
    }

    /// Runs adb with `args`, killing the child if `deadline` passes.
    async fn exec(&self, args: &[&str], deadline: Duration) -> Result<Output, AdbError> {
        debug!(args = ?args, "running adb");
        let child = Command::new(&self.config.adb_path)
            .args(args)
            .kill_on_drop(true)
            .output();
        match timeout(deadline, child).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(AdbError::Timeout),
        }
    }
}

/// Failure text for a finished adb call: stderr when present, stdout
/// otherwise (adb mixes the two freely).
fn error_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = AdbConfig::default();
        assert_eq!(config.adb_path, PathBuf::from("adb"));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.command_timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn exec_missing_binary_is_io_error() {
        let client = AdbClient::new(AdbConfig {
            adb_path: PathBuf::from("/nonexistent/adb-binary"),
            ..AdbConfig::default()
        });
        let result = client.devices().await;
        assert!(matches!(result, Err(AdbError::Io(_))));
    }

    #[tokio::test]
    async fn exec_times_out() {
        // `sleep 5` stands in for a hung adb call.
        let client = AdbClient::new(AdbConfig {
            adb_path: PathBuf::from("sleep"),
            ..AdbConfig::default()
        });
        let result = client.exec(&["5"], Duration::from_millis(50)).await;
        assert!(matches!(result, Err(AdbError::Timeout)));
    }
}
