//! pinrelay — remote GPIO control over a fixed-format datagram protocol.
//!
//! The command core (directive parser, role table, interpreter) is pure
//! logic behind port traits; the `pinrelayd` binary wires it to a UDP
//! socket, a GPIO backend and the process lifecycle.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod lifecycle;
pub mod pins;
pub mod roles;
pub mod server;

pub mod adapters;

pub use error::{Error, Result};
