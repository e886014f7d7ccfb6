//! File-backed [`ConfigPort`]: re-reads the pin configuration on every load.

use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::ConfigPort;
use crate::error::ConfigError;
use crate::roles::PinRoleTable;
use crate::roles::directive;

pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for ConfigFile {
    fn load_roles(&mut self) -> Result<PinRoleTable, ConfigError> {
        let report = directive::load(&self.path)?;
        info!(
            "config: loaded {} ({} line(s) skipped)",
            self.path.display(),
            report.diagnostics.len()
        );
        Ok(report.table)
    }
}
