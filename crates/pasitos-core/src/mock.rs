//! Mock platform pieces for testing.
//!
//! These stand in for the terminal map, the power supply and the permission
//! dialog so the controller can be exercised without a terminal or GPS.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use pasitos_core::mock::{MockBattery, MockMap, MockPermission};
//! use pasitos_core::{MapController, SamplingTimer, TickOutcome};
//! use pasitos_store::Store;
//! use pasitos_types::Fix;
//!
//! let mut controller = MapController::new(
//!     Store::open_in_memory()?,
//!     Box::new(MockBattery::new(75)),
//!     Box::new(MockPermission::granted()),
//!     SamplingTimer::new(Duration::from_secs(300)),
//! );
//! controller.start(tokio::time::Instant::now());
//! controller.on_map_ready(MockMap::with_fix(Fix::new(40.0, -3.0)?))?;
//!
//! assert!(matches!(controller.on_tick(), TickOutcome::Recorded { .. }));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use pasitos_types::{BatteryLevel, Fix, Marker, Zoom};

use crate::error::{Error, Result};
use crate::traits::{BatterySource, MapSurface, PermissionGate, PermissionStatus};

/// A map that records what the controller asks of it.
#[derive(Debug, Clone, Default)]
pub struct MockMap {
    /// The fix reported once the my-location layer is on.
    pub fix: Option<Fix>,
    /// Markers added so far.
    pub markers: Vec<Marker>,
    /// Net zoom steps applied.
    pub zoom_level: i32,
    /// Whether the my-location layer is on.
    pub my_location_enabled: bool,
    /// Make `enable_my_location` fail.
    pub fail_enable: bool,
}

impl MockMap {
    /// A map whose location layer will report `fix`.
    pub fn with_fix(fix: Fix) -> Self {
        Self {
            fix: Some(fix),
            ..Self::default()
        }
    }
}

impl MapSurface for MockMap {
    fn enable_my_location(&mut self) -> Result<()> {
        if self.fail_enable {
            return Err(Error::Map("mock my-location failure".to_string()));
        }
        self.my_location_enabled = true;
        Ok(())
    }

    fn my_location(&self) -> Option<Fix> {
        if self.my_location_enabled {
            self.fix
        } else {
            None
        }
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn zoom(&mut self, direction: Zoom) {
        match direction {
            Zoom::In => self.zoom_level += 1,
            Zoom::Out => self.zoom_level -= 1,
        }
    }
}

/// A battery with a fixed reading.
#[derive(Debug, Clone, Copy)]
pub struct MockBattery(Option<BatteryLevel>);

impl MockBattery {
    /// A battery reporting `percent`, capped at 100.
    pub fn new(percent: u8) -> Self {
        Self(BatteryLevel::new(percent.min(100)).ok())
    }

    /// A battery that cannot be read.
    pub fn unavailable() -> Self {
        Self(None)
    }
}

impl BatterySource for MockBattery {
    fn read(&self) -> Option<BatteryLevel> {
        self.0
    }
}

/// A permission gate with a scripted answer.
///
/// Clones share the request counter, so a test can keep one clone and hand
/// the other to the controller.
#[derive(Debug, Clone)]
pub struct MockPermission {
    status: PermissionStatus,
    answer: Option<bool>,
    requests: Arc<AtomicU32>,
}

impl MockPermission {
    /// Permission already granted.
    pub fn granted() -> Self {
        Self {
            status: PermissionStatus::Granted,
            answer: None,
            requests: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Not granted; a request is refused on the spot.
    pub fn denied() -> Self {
        Self {
            status: PermissionStatus::Denied,
            answer: Some(false),
            requests: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Not determined; the answer comes later through the controller callback.
    pub fn asks_user() -> Self {
        Self {
            status: PermissionStatus::NotDetermined,
            answer: None,
            requests: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Number of times `request` was called.
    pub fn request_count(&self) -> u32 {
        self.requests.load(Ordering::SeqCst)
    }
}

impl PermissionGate for MockPermission {
    fn status(&self) -> PermissionStatus {
        self.status
    }

    fn request(&mut self) -> Option<bool> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}
