//! Core value types for recorded positions.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};

/// A single resolved GPS position reading.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fix {
    /// Latitude in decimal degrees, positive north.
    pub latitude: f64,
    /// Longitude in decimal degrees, positive east.
    pub longitude: f64,
}

impl Fix {
    /// Create a fix, rejecting coordinates outside the WGS84 ranges.
    ///
    /// # Examples
    ///
    /// ```
    /// use pasitos_types::Fix;
    ///
    /// assert!(Fix::new(40.0, -3.0).is_ok());
    /// assert!(Fix::new(91.0, 0.0).is_err());
    /// assert!(Fix::new(0.0, f64::NAN).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> ParseResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ParseError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ParseError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// The point at latitude 0, longitude 0.
    pub const ORIGIN: Fix = Fix {
        latitude: 0.0,
        longitude: 0.0,
    };
}

impl fmt::Display for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Battery charge as a whole percentage, 0 to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatteryLevel(u8);

impl BatteryLevel {
    /// An empty battery, also used when the level cannot be read.
    pub const EMPTY: BatteryLevel = BatteryLevel(0);

    /// Create a level from a percentage.
    pub fn new(percent: u8) -> ParseResult<Self> {
        if percent > 100 {
            return Err(ParseError::InvalidBattery(u32::from(percent)));
        }
        Ok(Self(percent))
    }

    /// Derive a percentage from a raw `level` out of `scale`.
    ///
    /// Power supplies report charge as a pair such as `energy_now` /
    /// `energy_full`. The percentage is truncated toward zero and capped at
    /// 100 (worn batteries can report more than their nominal full charge).
    /// Returns `None` when `scale` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use pasitos_types::BatteryLevel;
    ///
    /// assert_eq!(BatteryLevel::from_ratio(45, 50).map(|b| b.percent()), Some(90));
    /// assert_eq!(BatteryLevel::from_ratio(2, 3).map(|b| b.percent()), Some(66));
    /// assert_eq!(BatteryLevel::from_ratio(1, 0), None);
    /// ```
    pub fn from_ratio(level: u64, scale: u64) -> Option<Self> {
        if scale == 0 {
            return None;
        }
        let percent = (u128::from(level) * 100 / u128::from(scale)).min(100);
        Some(Self(percent as u8))
    }

    /// The percentage value.
    pub fn percent(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for BatteryLevel {
    type Error = ParseError;

    fn try_from(percent: u8) -> ParseResult<Self> {
        Self::new(percent)
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// A point drawn on the map.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Marker {
    /// Where the marker sits.
    pub position: Fix,
    /// Popup heading.
    pub title: String,
    /// Popup body, the battery level at capture time.
    pub snippet: String,
}

impl Marker {
    /// Title shared by every recorded-position marker.
    pub const TITLE: &'static str = "Recorded position";

    /// Build the marker for a recorded position.
    pub fn recorded(position: Fix, battery: BatteryLevel) -> Self {
        Self {
            position,
            title: Self::TITLE.to_string(),
            snippet: format!("Battery: {}", battery),
        }
    }
}

/// Transient user-visible notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Notice {
    /// The location permission has not been granted.
    PermissionNotGranted,
    /// The map has no current fix to offer.
    LocationNotAvailable,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionNotGranted => f.write_str("Location permission not granted"),
            Self::LocationNotAvailable => f.write_str("Current location not available"),
        }
    }
}

/// Direction of a camera zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zoom {
    In,
    Out,
}
