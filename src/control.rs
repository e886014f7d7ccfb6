//! Control channel between signal handlers and the request loop.
//!
//! Signals never touch daemon state directly.  Handlers only raise
//! flags; the request loop polls them between datagrams.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ SIGINT/TERM  │────▶│  shutdown    │     │              │
//! │              │     │  (atomic)    │────▶│ Request loop │
//! │ SIGHUP       │────▶│  reload      │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::info;

use crate::error::Error;

#[derive(Debug, Default)]
struct Flags {
    shutdown: AtomicBool,
    reload: AtomicBool,
}

/// Cloneable handle to the control flags.
#[derive(Debug, Clone, Default)]
pub struct Control {
    flags: Arc<Flags>,
}

impl Control {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the request loop to stop after the current request.
    pub fn request_shutdown(&self) {
        self.flags.shutdown.store(true, Ordering::Release);
    }

    pub fn shutdown_requested(&self) -> bool {
        self.flags.shutdown.load(Ordering::Acquire)
    }

    /// Ask the request loop to re-read the pin configuration.
    pub fn request_reload(&self) {
        self.flags.reload.store(true, Ordering::Release);
    }

    /// Consume a pending reload request.
    pub fn take_reload(&self) -> bool {
        self.flags.reload.swap(false, Ordering::AcqRel)
    }
}

// ── Signal wiring ─────────────────────────────────────────────

/// SIGHUP cannot carry a closure, so its handler sets this static and the
/// request loop folds it into the [`Control`] flags.
static HANGUP: AtomicBool = AtomicBool::new(false);

extern "C" fn on_hangup(_sig: libc::c_int) {
    HANGUP.store(true, Ordering::Release);
}

impl Control {
    /// Move a pending SIGHUP into the reload flag.
    pub fn poll_signals(&self) {
        if HANGUP.swap(false, Ordering::AcqRel) {
            info!("control: SIGHUP received, reload requested");
            self.request_reload();
        }
    }
}

/// Route SIGINT/SIGTERM to shutdown and SIGHUP to reload.
///
/// Call once per process.
pub fn install_signal_handlers(control: &Control) -> Result<(), Error> {
    let on_term = control.clone();
    ctrlc::set_handler(move || on_term.request_shutdown())
        .map_err(|e| Error::Lifecycle(format!("cannot install SIGINT/SIGTERM handler: {e}")))?;

    let handler = on_hangup as extern "C" fn(libc::c_int) as libc::sighandler_t;
    // SAFETY: `on_hangup` only stores to an atomic, which is
    // async-signal-safe.
    let previous = unsafe { libc::signal(libc::SIGHUP, handler) };
    if previous == libc::SIG_ERR {
        return Err(Error::Lifecycle("cannot install SIGHUP handler".into()));
    }
    Ok(())
}
