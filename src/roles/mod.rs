//! Pin role table — which pins are outputs, inputs, or forced to a level.
//!
//! The table is built by the [`directive`] parser from the configuration
//! file and consulted in two places:
//!
//! - once at startup, when the device initializer applies it to the GPIO
//!   backend (forced levels first, then modes);
//! - on every request, where membership in [`PinRoleTable::out`] is the
//!   only authorization check for writes.
//!
//! The table is a plain owned value.  A reload builds a new table and the
//! service swaps it in with a single assignment.

pub mod directive;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ───────────────────────────────────────────────────────────────
// Role
// ───────────────────────────────────────────────────────────────

/// Which of the four role sets a directive assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Digital output, eligible for write/toggle requests.
    Output,
    /// Digital input.
    Input,
    /// Driven high once at startup, before any mode is set.
    High,
    /// Driven low once at startup, before any mode is set.
    Low,
}

// ───────────────────────────────────────────────────────────────
// RoleSet
// ───────────────────────────────────────────────────────────────

/// Ordered collection of pin identifiers.  Order is application order
/// during initialization; duplicates are kept as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(Vec<u8>);

impl RoleSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, pin: u8) -> bool {
        self.0.contains(&pin)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for RoleSet {
    fn from(pins: Vec<u8>) -> Self {
        Self(pins)
    }
}

impl<const N: usize> From<[u8; N]> for RoleSet {
    fn from(pins: [u8; N]) -> Self {
        Self(pins.to_vec())
    }
}

impl FromIterator<u8> for RoleSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ───────────────────────────────────────────────────────────────
// PinRoleTable
// ───────────────────────────────────────────────────────────────

/// The four role sets.  An empty table configures nothing and
/// authorizes no writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRoleTable {
    pub out: RoleSet,
    #[serde(rename = "in")]
    pub input: RoleSet,
    pub high: RoleSet,
    pub low: RoleSet,
}

impl PinRoleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: Role) -> &RoleSet {
        match role {
            Role::Output => &self.out,
            Role::Input => &self.input,
            Role::High => &self.high,
            Role::Low => &self.low,
        }
    }

    /// Replace one role set wholesale.  Directives never merge.
    pub fn assign(&mut self, role: Role, pins: RoleSet) {
        let slot = match role {
            Role::Output => &mut self.out,
            Role::Input => &mut self.input,
            Role::High => &mut self.high,
            Role::Low => &mut self.low,
        };
        *slot = pins;
    }

    /// Whether `pin` may be written or toggled.
    pub fn is_output(&self, pin: u8) -> bool {
        self.out.contains(pin)
    }

    /// Reject tables that force a pin both high and low.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.high.iter().find(|&pin| self.low.contains(pin)) {
            Some(pin) => Err(ConfigError::ConflictingLevel { pin }),
            None => Ok(()),
        }
    }
}
