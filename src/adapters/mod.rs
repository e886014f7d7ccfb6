//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements | Connects to                 |
//! |--------------|------------|-----------------------------|
//! | `config_file`| ConfigPort | Pin configuration file      |
//! | `sim_gpio`   | GpioPort   | In-memory pin bank          |
//! | `sysfs_gpio` | GpioPort   | Linux `/sys/class/gpio`     |
//! | `power`      | PowerPort  | `reboot` / `halt`, or none  |
//! | `log_sink`   | EventSink  | `log` facade                |
//! | `udp`        | Transport  | UDP socket                  |

pub mod config_file;
pub mod log_sink;
pub mod power;
pub mod sim_gpio;
pub mod sysfs_gpio;
pub mod udp;
