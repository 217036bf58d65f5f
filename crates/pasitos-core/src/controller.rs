//! The map controller.
//!
//! [`MapController`] ties the location store to a [`MapSurface`]. It tracks
//! two independent bits of state, whether the location permission has been
//! granted and whether the map is ready, and runs the sampling timer
//! regardless of either. Each tick checks both and skips with a notice when
//! one is missing.
//!
//! All methods take `&mut self` and are meant to be called from a single
//! event loop; nothing here spawns or locks.

use std::collections::VecDeque;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use pasitos_store::Store;
use pasitos_types::{BatteryLevel, Marker, Notice, Zoom};

use crate::error::Result;
use crate::timer::SamplingTimer;
use crate::traits::{BatterySource, MapSurface, PermissionGate, PermissionStatus};

/// Maximum number of undelivered notices kept.
const MAX_PENDING_NOTICES: usize = 16;

/// Where the permission flow stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    /// The controller has not started.
    #[default]
    NotStarted,
    /// Waiting for the user to answer.
    Requested,
    /// Location access is allowed.
    Granted,
    /// Location access was refused.
    Denied,
}

/// What a sampling tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// A location was stored and drawn.
    Recorded {
        /// Row id assigned by the store.
        id: i64,
        /// The marker added to the map.
        marker: Marker,
    },
    /// Nothing was stored; the notice was queued for the user.
    Skipped(Notice),
    /// The store rejected the write. The sample is dropped.
    StoreFailed,
}

/// Drives sampling, permissions and marker rendering for one map.
pub struct MapController<M> {
    store: Store,
    battery: Box<dyn BatterySource>,
    permission_gate: Box<dyn PermissionGate>,
    permission: PermissionState,
    map: Option<M>,
    timer: SamplingTimer,
    notices: VecDeque<Notice>,
}

impl<M: MapSurface> MapController<M> {
    /// Create a controller. Nothing happens until [`start`](Self::start).
    pub fn new(
        store: Store,
        battery: Box<dyn BatterySource>,
        permission_gate: Box<dyn PermissionGate>,
        timer: SamplingTimer,
    ) -> Self {
        Self {
            store,
            battery,
            permission_gate,
            permission: PermissionState::NotStarted,
            map: None,
            timer,
            notices: VecDeque::new(),
        }
    }

    /// Screen creation: start the timer and ask for the location permission.
    ///
    /// The first tick is due immediately.
    pub fn start(&mut self, now: Instant) {
        info!(
            "Starting sampling every {}s",
            self.timer.period().as_secs()
        );
        self.timer.start(now);

        match self.permission_gate.status() {
            PermissionStatus::Granted => {
                debug!("Location permission already granted");
                self.permission = PermissionState::Granted;
            }
            _ => {
                self.permission = PermissionState::Requested;
                if let Some(granted) = self.permission_gate.request() {
                    self.on_permission_result(granted);
                }
            }
        }
    }

    /// Runtime callback with the user's answer to the permission request.
    pub fn on_permission_result(&mut self, granted: bool) {
        if granted {
            info!("Location permission granted");
            self.permission = PermissionState::Granted;
            if let Some(map) = self.map.as_mut()
                && let Err(e) = map.enable_my_location()
            {
                error!("Failed to enable my-location layer: {}", e);
            }
        } else {
            warn!("Location permission denied");
            self.permission = PermissionState::Denied;
            self.push_notice(Notice::PermissionNotGranted);
        }
    }

    /// The map finished loading.
    ///
    /// Enables the my-location layer when permitted and renders every stored
    /// record. Returns the number of markers loaded. A second call is
    /// ignored and the new map is dropped.
    pub fn on_map_ready(&mut self, map: M) -> Result<usize> {
        if self.map.is_some() {
            warn!("Map reported ready twice, ignoring");
            return Ok(0);
        }

        let map = self.map.insert(map);
        if self.permission == PermissionState::Granted
            && let Err(e) = map.enable_my_location()
        {
            error!("Failed to enable my-location layer: {}", e);
        }

        let records = self.store.list_locations()?;
        for record in &records {
            map.add_marker(record.marker());
        }
        info!("Loaded {} stored location(s) onto the map", records.len());
        Ok(records.len())
    }

    /// Take one sample: read the fix and battery, store them, draw a marker.
    pub fn on_tick(&mut self) -> TickOutcome {
        if self.permission != PermissionState::Granted {
            debug!("Skipping sample: permission {:?}", self.permission);
            return self.skip(Notice::PermissionNotGranted);
        }

        let Some(fix) = self.map.as_ref().and_then(|m| m.my_location()) else {
            debug!("Skipping sample: no fix");
            return self.skip(Notice::LocationNotAvailable);
        };

        let battery = self.battery.read().unwrap_or_else(|| {
            debug!("Battery level unavailable, recording 0%");
            BatteryLevel::EMPTY
        });

        match self
            .store
            .insert_location(fix.latitude, fix.longitude, battery.percent())
        {
            Ok(id) => {
                let marker = Marker::recorded(fix, battery);
                if let Some(map) = self.map.as_mut() {
                    map.add_marker(marker.clone());
                }
                info!("Recorded location #{} at {} ({})", id, fix, battery);
                TickOutcome::Recorded { id, marker }
            }
            Err(e) => {
                error!("Failed to store location {}: {}", fix, e);
                TickOutcome::StoreFailed
            }
        }
    }

    /// Run a tick if the timer is due.
    pub fn poll_timer(&mut self, now: Instant) -> Option<TickOutcome> {
        if self.timer.fire(now) {
            Some(self.on_tick())
        } else {
            None
        }
    }

    /// Zoom the camera in one step. Ignored until the map is ready.
    pub fn zoom_in(&mut self) {
        self.zoom(Zoom::In);
    }

    /// Zoom the camera out one step. Ignored until the map is ready.
    pub fn zoom_out(&mut self) {
        self.zoom(Zoom::Out);
    }

    fn zoom(&mut self, direction: Zoom) {
        if let Some(map) = self.map.as_mut() {
            map.zoom(direction);
        }
    }

    /// Screen teardown: cancel the pending tick.
    pub fn stop(&mut self) {
        if self.timer.is_running() {
            info!("Stopping sampling");
        }
        self.timer.cancel();
    }

    /// Take every notice queued since the last call, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Current permission state.
    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    /// Whether the map has been handed over.
    pub fn is_map_ready(&self) -> bool {
        self.map.is_some()
    }

    /// The map, once ready.
    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    /// Mutable access to the map, once ready.
    pub fn map_mut(&mut self) -> Option<&mut M> {
        self.map.as_mut()
    }

    /// The sampling timer.
    pub fn timer(&self) -> &SamplingTimer {
        &self.timer
    }

    /// The location store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    fn skip(&mut self, notice: Notice) -> TickOutcome {
        self.push_notice(notice);
        TickOutcome::Skipped(notice)
    }

    fn push_notice(&mut self, notice: Notice) {
        self.notices.push_back(notice);
        while self.notices.len() > MAX_PENDING_NOTICES {
            self.notices.pop_front();
        }
    }
}
