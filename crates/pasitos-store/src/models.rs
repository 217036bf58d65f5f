//! Data models for stored data.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use pasitos_types::{BatteryLevel, Fix, Marker};

/// A recorded location stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLocation {
    /// Database row ID.
    pub id: i64,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Battery percentage at capture time.
    pub battery: u8,
    /// When the row was written, assigned by the database.
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

impl StoredLocation {
    /// The recorded position.
    pub fn fix(&self) -> Fix {
        Fix {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// The recorded battery level.
    ///
    /// Values above 100 cannot be inserted, so this only falls back to
    /// empty for rows written by something other than this crate.
    pub fn battery_level(&self) -> BatteryLevel {
        BatteryLevel::new(self.battery).unwrap_or(BatteryLevel::EMPTY)
    }

    /// The map marker for this record.
    pub fn marker(&self) -> Marker {
        Marker::recorded(self.fix(), self.battery_level())
    }
}
