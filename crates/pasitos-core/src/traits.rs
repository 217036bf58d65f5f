//! Trait abstractions for the platform pieces the controller drives.
//!
//! The controller never talks to a terminal, a GPS receiver or a power
//! supply directly. It goes through these seams so the same sampling logic
//! runs behind the terminal map, the headless recorder and the test mocks
//! in [`crate::mock`].

use pasitos_types::{BatteryLevel, Fix, Marker, Zoom};

use crate::error::Result;

/// The on-screen map.
///
/// The map owns the "my location" layer: once enabled it is the only place
/// the controller gets a [`Fix`] from.
pub trait MapSurface {
    /// Turn on the my-location layer.
    ///
    /// Only called after the location permission has been granted.
    fn enable_my_location(&mut self) -> Result<()>;

    /// The current fix, if the my-location layer is enabled and has one.
    fn my_location(&self) -> Option<Fix>;

    /// Draw a marker.
    fn add_marker(&mut self, marker: Marker);

    /// Move the camera one zoom step.
    fn zoom(&mut self, direction: Zoom);
}

/// Source of the device battery level.
pub trait BatterySource {
    /// Read the battery level, `None` if it cannot be determined.
    fn read(&self) -> Option<BatteryLevel>;
}

/// Answer of a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// The user has allowed location access.
    Granted,
    /// The user has refused location access.
    Denied,
    /// The user has not been asked yet.
    NotDetermined,
}

/// The location permission flow.
pub trait PermissionGate {
    /// Current permission status, checked once at startup.
    fn status(&self) -> PermissionStatus;

    /// Ask for the permission.
    ///
    /// Gates that can answer on the spot return `Some(granted)`. Gates that
    /// ask the user return `None` and the answer is delivered later through
    /// [`MapController::on_permission_result`](crate::MapController::on_permission_result).
    fn request(&mut self) -> Option<bool>;
}
