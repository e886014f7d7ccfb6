//! pinrelayd — remote GPIO control daemon.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  UdpTransport   SysfsGpio / SimGpio   SystemPower          │
//! │  (Transport)    (GpioPort)            (PowerPort)          │
//! │  ConfigFile     LogEventSink                               │
//! │  (ConfigPort)   (EventSink)                                │
//! │                                                            │
//! │  ──────────────── Port Trait Boundary ───────────────      │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │        GpioService (pure logic): decode · authorize  │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │                                                            │
//! │  Request loop · Control flags (SIGINT/SIGTERM/SIGHUP)      │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```bash
//! # Run against /sys/class/gpio on the default port
//! pinrelayd -c /etc/pinrelay.conf
//!
//! # Try it out without hardware
//! pinrelayd --simulate --pid-file /tmp/pinrelay.pid -c pins.conf
//!
//! # Validate a pin configuration
//! pinrelayd -c pins.conf check
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use pinrelay::adapters::config_file::ConfigFile;
use pinrelay::adapters::log_sink::LogEventSink;
use pinrelay::adapters::power::{DisabledPower, SystemPower};
use pinrelay::adapters::sim_gpio::SimGpio;
use pinrelay::adapters::sysfs_gpio::{DEFAULT_SYSFS_ROOT, SysfsGpio};
use pinrelay::adapters::udp::UdpTransport;
use pinrelay::app::ports::{ConfigPort, GpioPort, PowerPort};
use pinrelay::app::service::GpioService;
use pinrelay::config::{Backend, DEFAULT_CONF_FILE, DEFAULT_PID_FILE, DEFAULT_PORT, DaemonConfig};
use pinrelay::control::{self, Control};
use pinrelay::lifecycle::{self, PidFile};
use pinrelay::roles::{PinRoleTable, directive};
use pinrelay::server::{Server, ServerOptions};

/// Remote GPIO control daemon
#[derive(Parser, Debug)]
#[command(name = "pinrelayd")]
#[command(author, version, about = "Remote GPIO control over UDP", long_about = None)]
struct Cli {
    /// Local address to bind
    #[arg(long = "bind", default_value = "0.0.0.0")]
    bind_addr: String,

    /// UDP port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Pin configuration file
    #[arg(short, long, default_value = DEFAULT_CONF_FILE)]
    conf_file: PathBuf,

    /// PID file, locked while running
    #[arg(short = 'i', long, default_value = DEFAULT_PID_FILE)]
    pid_file: PathBuf,

    /// Append log records to this file instead of stderr
    #[arg(short, long)]
    log_file: Option<PathBuf>,

    /// Receive timeout; bounds shutdown and reload latency
    #[arg(long, default_value_t = 500)]
    recv_timeout_ms: u64,

    /// Pause after each reply (0 = none)
    #[arg(long, default_value_t = 0)]
    request_interval_ms: u64,

    /// Send replies without the trailing NUL byte
    #[arg(long)]
    no_nul: bool,

    /// Honour the restart (XX50) and shutdown (XX70) requests
    #[arg(long)]
    allow_power_commands: bool,

    /// Drive an in-memory pin bank instead of real hardware
    #[arg(long)]
    simulate: bool,

    /// Root of the sysfs GPIO tree
    #[arg(long, default_value = DEFAULT_SYSFS_ROOT)]
    sysfs_root: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse the pin configuration, print it with the settings as JSON and exit
    Check,
}

impl From<&Cli> for DaemonConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            bind_addr: cli.bind_addr.clone(),
            port: cli.port,
            recv_timeout_ms: cli.recv_timeout_ms,
            request_interval_ms: cli.request_interval_ms,
            nul_terminate_replies: !cli.no_nul,
            conf_file: cli.conf_file.clone(),
            pid_file: Some(cli.pid_file.clone()),
            log_file: cli.log_file.clone(),
            backend: if cli.simulate { Backend::Sim } else { Backend::Sysfs },
            sysfs_root: cli.sysfs_root.clone(),
            allow_power_commands: cli.allow_power_commands,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = DaemonConfig::from(&cli);

    match cli.command {
        Some(Commands::Check) => check(&cfg),
        None => run_daemon(&cfg),
    }
}

// ── check ─────────────────────────────────────────────────────

fn check(cfg: &DaemonConfig) -> Result<()> {
    lifecycle::init_logger(None).context("logger init")?;
    cfg.validate().context("invalid settings")?;

    let report = directive::load(&cfg.conf_file)
        .with_context(|| format!("pin configuration {}", cfg.conf_file.display()))?;
    let diagnostics: Vec<_> = report
        .diagnostics
        .iter()
        .map(|d| serde_json::json!({ "line": d.line, "issue": d.issue.to_string() }))
        .collect();

    let out = serde_json::json!({
        "settings": cfg,
        "roles": report.table,
        "diagnostics": diagnostics,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

// ── daemon ────────────────────────────────────────────────────

fn run_daemon(cfg: &DaemonConfig) -> Result<()> {
    lifecycle::init_logger(cfg.log_file.as_deref()).context("logger init")?;
    info!("pinrelayd v{}", env!("CARGO_PKG_VERSION"));
    cfg.validate().context("invalid settings")?;

    let _pid = cfg
        .pid_file
        .as_deref()
        .map(PidFile::acquire)
        .transpose()
        .context("pid file")?;

    let mut config = ConfigFile::new(&cfg.conf_file);
    let roles = config.load_roles().unwrap_or_else(|e| {
        error!("config: {}; starting with no pins configured", e);
        PinRoleTable::new()
    });

    match cfg.backend {
        Backend::Sim => {
            info!("gpio: simulated pin bank");
            with_power(cfg, SimGpio::new(), config, roles)
        }
        Backend::Sysfs => {
            info!("gpio: sysfs at {}", cfg.sysfs_root.display());
            with_power(cfg, SysfsGpio::new(&cfg.sysfs_root), config, roles)
        }
    }
}

fn with_power<G: GpioPort>(
    cfg: &DaemonConfig,
    gpio: G,
    config: ConfigFile,
    roles: PinRoleTable,
) -> Result<()> {
    if cfg.allow_power_commands {
        warn!("power: XX50/XX70 will restart/halt this machine; the protocol is unauthenticated");
        serve(cfg, gpio, SystemPower::default(), config, roles)
    } else {
        serve(cfg, gpio, DisabledPower, config, roles)
    }
}

fn serve<G: GpioPort, P: PowerPort>(
    cfg: &DaemonConfig,
    mut gpio: G,
    power: P,
    config: ConfigFile,
    roles: PinRoleTable,
) -> Result<()> {
    let mut sink = LogEventSink::new();
    let service = GpioService::new(roles);
    service
        .initialize(&mut gpio, &mut sink)
        .context("applying pin roles")?;

    let transport = UdpTransport::bind(&cfg.bind_addr, cfg.port, cfg.recv_timeout())
        .context("binding UDP socket")?;

    let control = Control::new();
    control::install_signal_handlers(&control).context("signal handlers")?;

    let mut server = Server {
        transport,
        gpio,
        power,
        config,
        sink,
        service,
        control,
        options: ServerOptions::from(cfg),
    };
    server.run();
    Ok(())
}
