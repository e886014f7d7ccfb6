//! Inbound requests and outbound replies of the datagram protocol.
//!
//! Requests are fixed-position ASCII, no separators:
//!
//! ```text
//!  0   1   2 3   4
//! ┌───┬───┬─────┬───┐
//! │ G │ X │ p p │ d │   set/toggle    d: 0 low, 1 high, 2 toggle
//! │ I │ X │ p p │   │   read level    pp = 32 reads every pin
//! │ S │ X │ p p │   │   read mode     pp = 32 reads the header pins
//! │ X │ X │ p p │   │   ping          pp = 50 restart, 70 shutdown
//! └───┴───┴─────┴───┘
//! ```
//!
//! Decoding is pure: [`decode`] turns bytes into a [`Request`] or a
//! [`DecodeError`], and the service turns any error into the `-1` reply.

use core::fmt::{self, Write};

use super::events::PowerAction;
use crate::pins::MAX_OPERAND;

/// Only this many leading bytes of a datagram are significant.
pub const REQUEST_LEN: usize = 7;

/// Capacity of a reply buffer.
pub const REPLY_CAPACITY: usize = 50;

/// A reply string.  Fixed capacity, returned by value.
pub type Reply = heapless::String<REPLY_CAPACITY>;

/// The protocol's single error reply.
pub const ERROR_REPLY: &str = "-1";

/// Reply to every ping.
pub const PING_REPLY: &str = "OK";

// ───────────────────────────────────────────────────────────────
// Request
// ───────────────────────────────────────────────────────────────

/// Sub-action of a `G` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetAction {
    Low,
    High,
    Toggle,
}

/// A decoded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// `GXppd`: drive or toggle an output pin.
    Set { pin: u8, action: SetAction },
    /// `IXpp`: read a level, or every level for pin 32.
    Read { pin: u8 },
    /// `SXpp`: read a direction, or the header pins for pin 32.
    State { pin: u8 },
    /// `XXpp`: liveness check, optionally carrying a power action.
    Ping { power: Option<PowerAction> },
}

/// Why a datagram did not decode.  All variants share the `-1` reply;
/// the distinction exists for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Shorter than the operation needs.
    TooShort,
    /// Position 1 is not `X`.
    MissingFrame,
    /// Unknown operation code.
    UnknownOp(u8),
    /// A pin position is not a decimal digit.
    BadDigit(u8),
    /// Pin operand above 32 for a read or state query.
    PinOutOfRange(u8),
    /// `G` sub-action is not 0, 1 or 2.
    BadAction(u8),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort => write!(f, "request too short"),
            Self::MissingFrame => write!(f, "second character is not 'X'"),
            Self::UnknownOp(op) => write!(f, "unknown operation {:?}", *op as char),
            Self::BadDigit(b) => write!(f, "non-digit {:?} in pin field", *b as char),
            Self::PinOutOfRange(pin) => write!(f, "pin {pin} out of range"),
            Self::BadAction(b) => write!(f, "unknown set action {:?}", *b as char),
        }
    }
}

/// Strip what clients commonly append: everything from the first NUL,
/// then trailing CR/LF.  Keep at most [`REQUEST_LEN`] bytes.
fn normalize(raw: &[u8]) -> &[u8] {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let mut body = &raw[..end];
    while let [rest @ .., b'\r' | b'\n'] = body {
        body = rest;
    }
    &body[..body.len().min(REQUEST_LEN)]
}

fn digit(b: u8) -> Result<u8, DecodeError> {
    if b.is_ascii_digit() {
        Ok(b - b'0')
    } else {
        Err(DecodeError::BadDigit(b))
    }
}

/// Two-digit pin field at positions 2–3.
fn pin_field(req: &[u8]) -> Result<u8, DecodeError> {
    match req {
        [_, _, tens, ones, ..] => Ok(digit(*tens)? * 10 + digit(*ones)?),
        _ => Err(DecodeError::TooShort),
    }
}

fn query_pin(req: &[u8]) -> Result<u8, DecodeError> {
    let pin = pin_field(req)?;
    if pin > MAX_OPERAND {
        return Err(DecodeError::PinOutOfRange(pin));
    }
    Ok(pin)
}

/// Decode one datagram payload.
pub fn decode(raw: &[u8]) -> Result<Request, DecodeError> {
    let req = normalize(raw);

    let (op, frame) = match req {
        [op, frame, ..] => (*op, *frame),
        _ => return Err(DecodeError::TooShort),
    };
    if frame != b'X' {
        return Err(DecodeError::MissingFrame);
    }

    match op {
        b'G' => {
            let action = match req.get(4) {
                None => return Err(DecodeError::TooShort),
                Some(b'0') => SetAction::Low,
                Some(b'1') => SetAction::High,
                Some(b'2') => SetAction::Toggle,
                Some(&other) => return Err(DecodeError::BadAction(other)),
            };
            Ok(Request::Set {
                pin: pin_field(req)?,
                action,
            })
        }
        b'I' => Ok(Request::Read { pin: query_pin(req)? }),
        b'S' => Ok(Request::State { pin: query_pin(req)? }),
        b'X' => {
            let power = match req.get(2..4) {
                Some(b"50") => Some(PowerAction::Restart),
                Some(b"70") => Some(PowerAction::Shutdown),
                _ => None,
            };
            Ok(Request::Ping { power })
        }
        other => Err(DecodeError::UnknownOp(other)),
    }
}

// ───────────────────────────────────────────────────────────────
// Reply builders
// ───────────────────────────────────────────────────────────────

fn fixed(text: &str) -> Reply {
    let mut reply = Reply::new();
    // Both constants fit in any reply buffer.
    let _ = reply.push_str(text);
    reply
}

/// `-1`
pub fn error_reply() -> Reply {
    fixed(ERROR_REPLY)
}

/// `OK`
pub fn ping_reply() -> Reply {
    fixed(PING_REPLY)
}

/// `"<pin> <c>"`
pub fn pin_reply(pin: u8, value: char) -> Reply {
    let mut reply = Reply::new();
    let _ = write!(reply, "{} {}", pin, value);
    reply
}
