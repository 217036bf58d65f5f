//! Map controller and sampling loop for the Pasitos location logger.
//!
//! The controller samples the device position and battery level on a fixed
//! timer, appends each sample to the [`pasitos_store::Store`], and keeps a
//! map surface in sync with everything recorded so far.
//!
//! # Architecture
//!
//! - [`MapController`]: permission and map-readiness state, sampling ticks,
//!   zoom commands, notices for the user
//! - [`SamplingTimer`]: a cancellable fixed-period timer polled by the
//!   owning event loop
//! - [`MapSurface`], [`BatterySource`], [`PermissionGate`]: the platform
//!   seams, implemented by the terminal front end and by [`mock`]
//! - [`run_until_cancelled`]: a headless loop driving the timer
//!
//! Everything runs on the caller's thread. A tick that blocks on SQLite
//! blocks the loop that called it.

pub mod controller;
pub mod error;
pub mod mock;
pub mod runner;
pub mod timer;
pub mod traits;

pub use controller::{MapController, PermissionState, TickOutcome};
pub use error::{Error, Result};
pub use runner::{RunStats, run_until_cancelled};
pub use timer::{DEFAULT_INTERVAL, SamplingTimer};
pub use traits::{BatterySource, MapSurface, PermissionGate, PermissionStatus};

// Re-export shared types for convenience
pub use pasitos_types::{BatteryLevel, Fix, Marker, Notice, Zoom};
