//! Power adapters for the `XX50` / `XX70` side channel.
//!
//! [`SystemPower`] runs host commands and is only wired in when the
//! operator passes `--allow-power-commands`.  Otherwise the daemon uses
//! [`DisabledPower`], which refuses every request.

use std::process::Command;

use log::info;

use crate::app::ports::{PowerError, PowerPort};

/// Refuses every power request.
pub struct DisabledPower;

impl PowerPort for DisabledPower {
    fn restart(&mut self) -> Result<(), PowerError> {
        Err(PowerError::Disabled)
    }

    fn shutdown(&mut self) -> Result<(), PowerError> {
        Err(PowerError::Disabled)
    }
}

/// Runs a configurable program for each action.
pub struct SystemPower {
    restart_cmd: Vec<String>,
    shutdown_cmd: Vec<String>,
}

impl Default for SystemPower {
    fn default() -> Self {
        Self::new(vec!["reboot".into()], vec!["halt".into()])
    }
}

impl SystemPower {
    /// Each command is a program followed by its arguments.
    pub fn new(restart_cmd: Vec<String>, shutdown_cmd: Vec<String>) -> Self {
        Self {
            restart_cmd,
            shutdown_cmd,
        }
    }

    fn run(argv: &[String]) -> Result<(), PowerError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| PowerError::CommandFailed("empty command".into()))?;
        info!("power: running {}", argv.join(" "));
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| PowerError::CommandFailed(format!("{program}: {e}")))?;
        if status.success() {
            Ok(())
        } else {
            Err(PowerError::CommandFailed(format!("{program} exited with {status}")))
        }
    }
}

impl PowerPort for SystemPower {
    fn restart(&mut self) -> Result<(), PowerError> {
        Self::run(&self.restart_cmd)
    }

    fn shutdown(&mut self) -> Result<(), PowerError> {
        Self::run(&self.shutdown_cmd)
    }
}
