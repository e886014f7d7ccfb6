//! Process lifecycle: logger setup and the PID file lock.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use env_logger::{Builder, Target};
use log::{LevelFilter, info, warn};

use crate::error::Error;

// ── Logging ───────────────────────────────────────────────────

/// Route the `log` facade to `log_file` (appending) or, when unset, to
/// stderr.  `RUST_LOG` overrides the default `info` filter.
pub fn init_logger(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Info);

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder
            .format(|buf, record| {
                writeln!(
                    buf,
                    "{} [{}] {} - {}",
                    buf.timestamp_millis(),
                    record.level(),
                    record.target(),
                    record.args()
                )
            })
            .target(Target::Pipe(Box::new(file)));
    }

    builder.parse_default_env();
    builder
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))
}

// ── PID file ──────────────────────────────────────────────────

/// An exclusively locked PID file.  The lock lives as long as the open
/// descriptor; dropping the guard removes the file.
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
    _file: File,
}

impl PidFile {
    /// Create or open `path`, take a non-blocking exclusive `flock` and
    /// write the current PID.  Fails if another process holds the lock.
    pub fn acquire(path: &Path) -> Result<Self, Error> {
        let lifecycle = |what: &str, e: io::Error| {
            Error::Lifecycle(format!("pid file {}: {what}: {e}", path.display()))
        };

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| lifecycle("cannot open", e))?;

        // SAFETY: the descriptor is owned by `file` and stays open for
        // the duration of the call.
        let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
        if rc != 0 {
            let e = io::Error::last_os_error();
            return Err(if e.kind() == io::ErrorKind::WouldBlock {
                Error::Lifecycle(format!(
                    "pid file {} is locked; another instance is running",
                    path.display()
                ))
            } else {
                lifecycle("cannot lock", e)
            });
        }

        file.set_len(0).map_err(|e| lifecycle("cannot truncate", e))?;
        writeln!(file, "{}", std::process::id()).map_err(|e| lifecycle("cannot write", e))?;
        file.flush().map_err(|e| lifecycle("cannot write", e))?;

        info!("lifecycle: pid {} recorded in {}", std::process::id(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            _file: file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("lifecycle: cannot remove {}: {}", self.path.display(), e);
        }
    }
}
