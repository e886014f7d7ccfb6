//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events through the
//! `log` facade, which the binary routes to the log file or stderr.

use log::{info, warn};

use crate::app::events::{AppEvent, RoleCounts};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
pub struct LogEventSink;

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn counts(c: &RoleCounts) -> String {
    format!("out={} in={} high={} low={}", c.out, c.input, c.high, c.low)
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { listen } => info!("START | listening on {}", listen),
            AppEvent::RolesApplied(c) => info!("INIT | roles applied ({})", counts(c)),
            AppEvent::ConfigReloaded(c) => info!("RELOAD | roles replaced ({})", counts(c)),
            AppEvent::ConfigReloadFailed(reason) => {
                warn!("RELOAD | failed, keeping previous roles: {}", reason);
            }
            AppEvent::PowerRequested { action, executed } => {
                warn!("POWER | {:?} requested, executed={}", action, executed);
            }
            AppEvent::Stopped { requests } => info!("STOP | {} request(s) served", requests),
        }
    }
}
