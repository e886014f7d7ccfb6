//! Pin directive parser.
//!
//! Configuration format, one directive per line:
//!
//! ```text
//! # comment
//! pins-out  = 4, 17, 21
//! pins-in   = 5
//! pins-high = 17
//! pins-low  = 21
//! ```
//!
//! Each line is scanned once, left to right:
//!
//! - `#` ends the line; spaces and tabs are skipped everywhere.
//! - Characters before `=` form the keyword.  Unknown keywords make the
//!   line a no-op, as do lines without `=`.
//! - After `=`, digits accumulate into the current slot
//!   (`slot = slot * 10 + digit`) and `,` advances to the next slot.
//! - The role set is every slot up to the first empty one, so a trailing
//!   comma is harmless and anything after an interior gap is dropped.
//!
//! A directive replaces its role set; a later line for the same keyword
//! wins.  Lines with characters that cannot be part of a pin list are
//! skipped and reported in [`ParseReport::diagnostics`].

use core::fmt;
use std::fs;
use std::path::Path;

use log::{debug, warn};

use super::{PinRoleTable, Role, RoleSet};
use crate::error::ConfigError;
use crate::pins::PIN_COUNT;

/// Recognized keywords.  The `gpio_pins_*` spellings are accepted for
/// configuration files written for older daemons.
const KEYWORDS: [(&str, Role); 8] = [
    ("pins-out", Role::Output),
    ("pins-in", Role::Input),
    ("pins-high", Role::High),
    ("pins-low", Role::Low),
    ("gpio_pins_out", Role::Output),
    ("gpio_pins_in", Role::Input),
    ("gpio_pins_high", Role::High),
    ("gpio_pins_low", Role::Low),
];

/// Exact-match keyword lookup.
pub fn lookup_keyword(keyword: &str) -> Option<Role> {
    KEYWORDS
        .iter()
        .find(|(name, _)| *name == keyword)
        .map(|&(_, role)| role)
}

// ───────────────────────────────────────────────────────────────
// Results
// ───────────────────────────────────────────────────────────────

/// One recognized directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub role: Role,
    pub pins: RoleSet,
    /// Values followed an empty slot and were dropped.
    pub truncated: bool,
}

/// Why a line was skipped or only partly applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineIssue {
    /// A character that is not a digit, comma, whitespace or `#`.
    UnexpectedChar(char),
    /// A pin number above 31.
    PinOutOfRange,
    /// A second `=` after a recognized keyword.
    ExtraEquals,
    /// Values after an empty slot were ignored (the line still applies).
    ValuesAfterGap,
}

impl fmt::Display for LineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedChar(c) => write!(f, "unexpected character {c:?} in pin list"),
            Self::PinOutOfRange => write!(f, "pin number above {}", PIN_COUNT - 1),
            Self::ExtraEquals => write!(f, "more than one '='"),
            Self::ValuesAfterGap => write!(f, "values after an empty entry were ignored"),
        }
    }
}

/// A problem found on a particular (1-based) line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineDiagnostic {
    pub line: usize,
    pub issue: LineIssue,
}

/// A validated table plus whatever the parser had to skip to build it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    pub table: PinRoleTable,
    pub diagnostics: Vec<LineDiagnostic>,
}

// ───────────────────────────────────────────────────────────────
// Line scanner
// ───────────────────────────────────────────────────────────────

/// Parse a single line.  `Ok(None)` means the line is not a directive.
pub fn parse_line(line: &str) -> Result<Option<Directive>, LineIssue> {
    let mut keyword = String::new();
    let mut role: Option<Role> = None;
    let mut slots: Vec<Option<u8>> = vec![None];

    for ch in line.chars() {
        match ch {
            '#' => break,
            ' ' | '\t' => {}
            '=' => {
                if role.is_some() {
                    return Err(LineIssue::ExtraEquals);
                }
                match lookup_keyword(&keyword) {
                    Some(r) => role = Some(r),
                    None => return Ok(None),
                }
            }
            _ if role.is_none() => keyword.push(ch),
            ',' => slots.push(None),
            '0'..='9' => {
                let digit = ch as u8 - b'0';
                // `slots` starts with one entry and only grows.
                let slot = slots.last_mut().ok_or(LineIssue::UnexpectedChar(ch))?;
                let value = slot.unwrap_or(0) as u32 * 10 + digit as u32;
                if value >= PIN_COUNT as u32 {
                    return Err(LineIssue::PinOutOfRange);
                }
                *slot = Some(value as u8);
            }
            other => return Err(LineIssue::UnexpectedChar(other)),
        }
    }

    let Some(role) = role else {
        return Ok(None);
    };

    let filled = slots.iter().take_while(|slot| slot.is_some()).count();
    let truncated = slots[filled..].iter().any(Option::is_some);
    let pins = slots[..filled].iter().flatten().copied().collect();

    Ok(Some(Directive {
        role,
        pins,
        truncated,
    }))
}

// ───────────────────────────────────────────────────────────────
// Whole-source parsing
// ───────────────────────────────────────────────────────────────

/// Parse configuration text into a validated table.
///
/// Malformed lines are skipped; the only hard failure is a pin forced
/// both high and low.
pub fn parse(text: &str) -> Result<ParseReport, ConfigError> {
    let mut table = PinRoleTable::new();
    let mut diagnostics = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        match parse_line(line) {
            Ok(Some(directive)) => {
                if directive.truncated {
                    warn!("config line {}: {}", line_no, LineIssue::ValuesAfterGap);
                    diagnostics.push(LineDiagnostic {
                        line: line_no,
                        issue: LineIssue::ValuesAfterGap,
                    });
                }
                debug!(
                    "config line {}: {:?} = {:?}",
                    line_no,
                    directive.role,
                    directive.pins.as_slice()
                );
                table.assign(directive.role, directive.pins);
            }
            Ok(None) => {}
            Err(issue) => {
                warn!("config line {} skipped: {}", line_no, issue);
                diagnostics.push(LineDiagnostic {
                    line: line_no,
                    issue,
                });
            }
        }
    }

    table.validate()?;
    Ok(ParseReport { table, diagnostics })
}

/// Read and parse a configuration file.
pub fn load(path: &Path) -> Result<ParseReport, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse(&text)
}
