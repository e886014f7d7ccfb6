//! Application core — protocol and role logic, zero I/O.
//!
//! Requests are decoded in [`commands`], interpreted by the
//! [`service::GpioService`] against the role table, and executed through
//! the **port traits** defined in [`ports`].  Hardware, the host OS and
//! logging all sit behind those traits.

pub mod commands;
pub mod events;
pub mod init;
pub mod ports;
pub mod service;
