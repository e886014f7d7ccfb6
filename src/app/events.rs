//! Outbound application events.
//!
//! The [`GpioService`](super::service::GpioService) and the request loop
//! emit these through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them.

use crate::roles::PinRoleTable;

/// Which privileged power action a request asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Restart,
    Shutdown,
}

/// Structured events emitted by the daemon core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The request loop is about to accept datagrams.
    Started { listen: String },

    /// The role table was applied to the hardware at startup.
    RolesApplied(RoleCounts),

    /// A reload replaced the role table.
    ConfigReloaded(RoleCounts),

    /// A reload failed; the previous table stays in effect.
    ConfigReloadFailed(String),

    /// A power request arrived.  `executed` is false when refused.
    PowerRequested { action: PowerAction, executed: bool },

    /// The request loop stopped after a shutdown request.
    Stopped { requests: u64 },
}

/// Role set sizes, for logging without cloning the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleCounts {
    pub out: usize,
    pub input: usize,
    pub high: usize,
    pub low: usize,
}

impl From<&PinRoleTable> for RoleCounts {
    fn from(table: &PinRoleTable) -> Self {
        Self {
            out: table.out.len(),
            input: table.input.len(),
            high: table.high.len(),
            low: table.low.len(),
        }
    }
}
