//! Terminal front end for the Pasitos location logger.
//!
//! Pasitos samples the GPS position and battery level on a fixed timer,
//! stores every sample in a local SQLite database and shows all of them
//! on a map.
//!
//! # Commands
//!
//! | Command  | Description                                    |
//! |----------|------------------------------------------------|
//! | `run`    | Terminal map screen (default)                  |
//! | `record` | Sample without a screen until Ctrl-C           |
//! | `list`   | Print every recorded location                  |
//!
//! # Inputs
//!
//! - **Position**: an NMEA 0183 stream file, e.g. `gpspipe -r > gps.nmea`
//! - **Battery**: the first battery under `/sys/class/power_supply`
//!
//! # Configuration
//!
//! Settings are read from `~/.config/pasitos/config.toml` (or platform
//! equivalent):
//!
//! ```toml
//! [storage]
//! path = "/home/me/.local/share/pasitos/pasitos.db"
//!
//! [sampling]
//! interval_secs = 300
//!
//! [location]
//! nmea_path = "/home/me/.local/share/pasitos/gps.nmea"
//! max_fix_age_secs = 600
//!
//! [battery]
//! power_supply_dir = "/sys/class/power_supply"
//! ```

pub mod battery;
pub mod config;
pub mod format;
pub mod headless;
pub mod nmea;
pub mod permission;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export core dependencies for convenience
pub use pasitos_core;
pub use pasitos_store;
pub use pasitos_types;
