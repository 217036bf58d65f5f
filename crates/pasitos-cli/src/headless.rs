//! Headless recorder: samples on the timer without a screen.

use anyhow::{Context, Result};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use pasitos_core::{MapController, MapSurface, RunStats, SamplingTimer, run_until_cancelled};
use pasitos_store::Store;
use pasitos_types::{Fix, Marker, Zoom};

use crate::battery::SysfsBattery;
use crate::config::Config;
use crate::nmea::NmeaLocation;
use crate::permission::StaticPermission;

/// A map with nothing to draw: markers go to the log.
#[derive(Debug)]
pub struct HeadlessMap {
    location: NmeaLocation,
    my_location_enabled: bool,
}

impl HeadlessMap {
    pub fn new(location: NmeaLocation) -> Self {
        Self {
            location,
            my_location_enabled: false,
        }
    }
}

impl MapSurface for HeadlessMap {
    fn enable_my_location(&mut self) -> pasitos_core::Result<()> {
        info!("Reading GPS fixes from {}", self.location.path().display());
        self.my_location_enabled = true;
        Ok(())
    }

    fn my_location(&self) -> Option<Fix> {
        if self.my_location_enabled {
            self.location.current_fix()
        } else {
            None
        }
    }

    fn add_marker(&mut self, marker: Marker) {
        debug!("{} at {} ({})", marker.title, marker.position, marker.snippet);
    }

    fn zoom(&mut self, direction: Zoom) {
        debug!("Ignoring zoom {:?} without a screen", direction);
    }
}

/// Record until Ctrl-C.
pub async fn record(config: &Config, allow_location: bool) -> Result<RunStats> {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping");
            trigger.cancel();
        }
    });

    record_until(config, allow_location, cancel).await
}

/// Record until `cancel` fires.
pub async fn record_until(
    config: &Config,
    allow_location: bool,
    cancel: CancellationToken,
) -> Result<RunStats> {
    let store = Store::open(&config.storage.path).with_context(|| {
        format!(
            "Failed to open database {}",
            config.storage.path.display()
        )
    })?;

    if !allow_location {
        warn!("Location access not allowed, pass --allow-location to record positions");
    }

    let mut controller = MapController::new(
        store,
        Box::new(SysfsBattery::new(&config.battery.power_supply_dir)),
        Box::new(StaticPermission::new(allow_location)),
        SamplingTimer::new(config.sampling.interval()),
    );
    controller.start(Instant::now());

    let location = NmeaLocation::new(&config.location.nmea_path, config.location.max_fix_age());
    let loaded = controller.on_map_ready(HeadlessMap::new(location))?;
    info!(
        "{} location(s) already recorded, sampling every {}s",
        loaded,
        config.sampling.interval_secs
    );

    let stats = run_until_cancelled(&mut controller, cancel).await;
    let total = controller.store().count_locations()?;
    info!("{} location(s) stored in total", total);
    Ok(stats)
}
