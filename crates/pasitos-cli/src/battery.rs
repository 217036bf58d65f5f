//! Battery level from the Linux power supply class.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use pasitos_core::BatterySource;
use pasitos_types::BatteryLevel;

/// Reads the first battery under a power supply directory
/// (normally `/sys/class/power_supply`).
#[derive(Debug, Clone)]
pub struct SysfsBattery {
    dir: PathBuf,
}

impl SysfsBattery {
    /// Read batteries listed under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl BatterySource for SysfsBattery {
    fn read(&self) -> Option<BatteryLevel> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot list {}: {}", self.dir.display(), e);
                return None;
            }
        };

        let mut supplies: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
        supplies.sort();

        supplies
            .iter()
            .filter(|supply| read_trimmed(&supply.join("type")).as_deref() == Some("Battery"))
            .find_map(|supply| battery_level(supply))
    }
}

/// Level of one power supply: `capacity` if present, else the
/// `energy_now/energy_full` or `charge_now/charge_full` ratio.
fn battery_level(supply: &Path) -> Option<BatteryLevel> {
    if let Some(capacity) = read_number(&supply.join("capacity")) {
        return BatteryLevel::from_ratio(capacity, 100);
    }

    [("energy_now", "energy_full"), ("charge_now", "charge_full")]
        .iter()
        .find_map(|(now, full)| {
            let level = read_number(&supply.join(now))?;
            let scale = read_number(&supply.join(full))?;
            BatteryLevel::from_ratio(level, scale)
        })
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

fn read_number(path: &Path) -> Option<u64> {
    read_trimmed(path)?.parse().ok()
}
