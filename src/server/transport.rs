//! Transport abstraction — any datagram channel.
//!
//! Concrete implementations:
//! - UDP socket ([`crate::adapters::udp::UdpTransport`])
//! - scripted in-memory transports in the integration tests
//!
//! The request loop is generic over `Transport`, so it never sees a
//! socket and can be driven deterministically in tests.

use core::fmt;

use crate::error::TransportError;

/// Connectionless request/reply channel.
pub trait Transport {
    /// Address a reply is sent back to.
    type Peer: Copy + fmt::Display;

    /// Receive one datagram into `buf`.
    ///
    /// Returns `Ok(None)` when the receive timed out or was interrupted,
    /// so the caller can check for shutdown or reload between requests.
    fn recv(&mut self, buf: &mut [u8]) -> Result<Option<(usize, Self::Peer)>, TransportError>;

    /// Send one datagram to `peer`.
    fn send(&mut self, data: &[u8], peer: Self::Peer) -> Result<(), TransportError>;

    /// Human-readable description of the listening endpoint.
    fn describe(&self) -> String;
}
