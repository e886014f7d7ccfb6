//! Daemon settings
//!
//! Everything about how the daemon runs, as opposed to which pins it
//! controls (that lives in the pin configuration file, see
//! [`crate::roles::directive`]).  Values come from the command line.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adapters::sysfs_gpio::DEFAULT_SYSFS_ROOT;
use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 3141;
pub const DEFAULT_CONF_FILE: &str = "/etc/pinrelay.conf";
pub const DEFAULT_PID_FILE: &str = "/var/run/pinrelay.pid";

/// Which GPIO backend drives the pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Sysfs,
    Sim,
}

/// Core daemon configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    // --- Network ---
    /// Local address to bind
    pub bind_addr: String,
    /// UDP port
    pub port: u16,
    /// Receive timeout; bounds the latency of shutdown/reload (milliseconds)
    pub recv_timeout_ms: u64,
    /// Pause after each reply, 0 = none (milliseconds)
    pub request_interval_ms: u64,
    /// Append a NUL byte to every reply
    pub nul_terminate_replies: bool,

    // --- Files ---
    /// Pin configuration file
    pub conf_file: PathBuf,
    /// PID file, exclusively locked while running
    pub pid_file: Option<PathBuf>,
    /// Log file; stderr when unset
    pub log_file: Option<PathBuf>,

    // --- Hardware ---
    pub backend: Backend,
    /// Root of the sysfs GPIO tree
    pub sysfs_root: PathBuf,

    // --- Privileged ---
    /// Honour `XX50` (restart) and `XX70` (shutdown)
    pub allow_power_commands: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            recv_timeout_ms: 500,
            request_interval_ms: 0,
            nul_terminate_replies: true,

            conf_file: PathBuf::from(DEFAULT_CONF_FILE),
            pid_file: Some(PathBuf::from(DEFAULT_PID_FILE)),
            log_file: None,

            backend: Backend::Sysfs,
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),

            allow_power_commands: false,
        }
    }
}

impl DaemonConfig {
    /// Reject settings the daemon cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be non-zero"));
        }
        if self.recv_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "receive timeout must be non-zero (0 would block forever)",
            ));
        }
        if self.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("bind address is empty"));
        }
        Ok(())
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }

    pub fn request_interval(&self) -> Option<Duration> {
        (self.request_interval_ms > 0).then(|| Duration::from_millis(self.request_interval_ms))
    }
}
