//! Main store implementation.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;
use tracing::{debug, info};

use pasitos_types::{BatteryLevel, Fix};

use crate::error::{Error, Result};
use crate::models::StoredLocation;
use crate::schema;

const SELECT_LOCATIONS: &str =
    "SELECT id, latitude, longitude, battery, recorded_at FROM locations";

/// SQLite-based store for recorded locations.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Append a recorded location and return its row id.
    ///
    /// The timestamp is assigned by the database. Coordinates and battery
    /// are validated first; an out-of-range value never reaches SQLite.
    pub fn insert_location(&self, latitude: f64, longitude: f64, battery: u8) -> Result<i64> {
        Fix::new(latitude, longitude)?;
        BatteryLevel::new(battery)?;

        self.conn.execute(
            "INSERT INTO locations (latitude, longitude, battery) VALUES (?1, ?2, ?3)",
            rusqlite::params![latitude, longitude, battery],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted location #{} ({}, {}, {}%)", id, latitude, longitude, battery);
        Ok(id)
    }

    /// All recorded locations, oldest first.
    pub fn list_locations(&self) -> Result<Vec<StoredLocation>> {
        let sql = format!("{} ORDER BY recorded_at ASC, id ASC", SELECT_LOCATIONS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], row_to_location)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(|r| r.into_location()).collect()
    }

    /// The most recently recorded location, if any.
    pub fn latest_location(&self) -> Result<Option<StoredLocation>> {
        let sql = format!("{} ORDER BY recorded_at DESC, id DESC LIMIT 1", SELECT_LOCATIONS);
        let row = self
            .conn
            .query_row(&sql, [], row_to_location)
            .optional()?;

        row.map(|r| r.into_location()).transpose()
    }

    /// Number of recorded locations.
    pub fn count_locations(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// A row as read from SQLite, before the timestamp is converted.
struct LocationRow {
    id: i64,
    latitude: f64,
    longitude: f64,
    battery: i64,
    recorded_at_ms: i64,
}

impl LocationRow {
    fn into_location(self) -> Result<StoredLocation> {
        let nanos = i128::from(self.recorded_at_ms) * 1_000_000;
        let recorded_at = OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map_err(|e| Error::InvalidTimestamp(format!("{}: {}", self.recorded_at_ms, e)))?;

        Ok(StoredLocation {
            id: self.id,
            latitude: self.latitude,
            longitude: self.longitude,
            battery: self.battery.clamp(0, 100) as u8,
            recorded_at,
        })
    }
}

fn row_to_location(row: &Row<'_>) -> rusqlite::Result<LocationRow> {
    Ok(LocationRow {
        id: row.get(0)?,
        latitude: row.get(1)?,
        longitude: row.get(2)?,
        battery: row.get(3)?,
        recorded_at_ms: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truncate_to_millis(t: OffsetDateTime) -> OffsetDateTime {
        let ms = t.unix_timestamp_nanos() / 1_000_000;
        OffsetDateTime::from_unix_timestamp_nanos(ms * 1_000_000).unwrap()
    }

    #[test]
    fn test_open_in_memory() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.list_locations().unwrap().is_empty());
        assert_eq!(store.count_locations().unwrap(), 0);
        assert!(store.latest_location().unwrap().is_none());
    }

    #[test]
    fn test_insert_and_list_location() {
        let store = Store::open_in_memory().unwrap();

        store.insert_location(40.0, -3.0, 80).unwrap();

        let records = store.list_locations().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].latitude, 40.0);
        assert_eq!(records[0].longitude, -3.0);
        assert_eq!(records[0].battery, 80);
    }

    #[test]
    fn test_recorded_at_not_before_insert() {
        let store = Store::open_in_memory().unwrap();

        let before = truncate_to_millis(OffsetDateTime::now_utc());
        store.insert_location(10.0, 20.0, 55).unwrap();

        let records = store.list_locations().unwrap();
        assert!(records[0].recorded_at >= before);
    }

    #[test]
    fn test_ids_strictly_increase() {
        let store = Store::open_in_memory().unwrap();

        let mut previous = 0;
        for i in 0..10u8 {
            let id = store.insert_location(1.0, 1.0, i).unwrap();
            assert!(id > previous);
            previous = id;
        }
    }

    #[test]
    fn test_list_is_chronological() {
        let store = Store::open_in_memory().unwrap();
        for i in 0..20u8 {
            store.insert_location(f64::from(i), 0.0, i).unwrap();
        }

        let records = store.list_locations().unwrap();
        assert_eq!(records.len(), 20);
        for pair in records.windows(2) {
            assert!(pair[0].recorded_at <= pair[1].recorded_at);
        }
    }

    #[test]
    fn test_list_orders_by_timestamp_not_insertion() {
        let store = Store::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO locations (latitude, longitude, battery, recorded_at)
                 VALUES (1.0, 1.0, 10, 2000), (2.0, 2.0, 20, 1000)",
                [],
            )
            .unwrap();

        let records = store.list_locations().unwrap();
        assert_eq!(records[0].battery, 20);
        assert_eq!(records[1].battery, 10);

        let latest = store.latest_location().unwrap().unwrap();
        assert_eq!(latest.battery, 10);
    }

    #[test]
    fn test_insert_rejects_invalid_values() {
        let store = Store::open_in_memory().unwrap();

        assert!(matches!(
            store.insert_location(95.0, 0.0, 50),
            Err(Error::InvalidRecord(_))
        ));
        assert!(matches!(
            store.insert_location(0.0, 0.0, 101),
            Err(Error::InvalidRecord(_))
        ));
        assert_eq!(store.count_locations().unwrap(), 0);
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pasitos.db");

        {
            let store = Store::open(&path).unwrap();
            store.insert_location(40.0, -3.0, 80).unwrap();
        }

        assert!(path.exists());
        let store = Store::open(&path).unwrap();
        assert_eq!(store.count_locations().unwrap(), 1);
    }

    #[test]
    fn test_end_to_end_single_record() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_location(40.0, -3.0, 80).unwrap();

        let records = store.list_locations().unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, id);
        assert_eq!(record.latitude, 40.0);
        assert_eq!(record.longitude, -3.0);
        assert_eq!(record.battery, 80);
        assert!(record.recorded_at > OffsetDateTime::UNIX_EPOCH);
    }
}
