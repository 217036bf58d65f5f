//! Local data persistence for recorded locations.
//!
//! This crate provides SQLite-based storage for the positions sampled by
//! the map controller. The store is append-only: records are inserted with
//! a database-assigned timestamp and listed back in chronological order.
//!
//! # Example
//!
//! ```no_run
//! use pasitos_store::Store;
//!
//! let store = Store::open_default()?;
//! let id = store.insert_location(40.0, -3.0, 80)?;
//! for record in store.list_locations()? {
//!     println!("#{} {}, {} ({}%)", record.id, record.latitude, record.longitude, record.battery);
//! }
//! # let _ = id;
//! # Ok::<(), pasitos_store::Error>(())
//! ```

mod error;
mod models;
mod schema;
mod store;

pub use error::{Error, Result};
pub use models::StoredLocation;
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/pasitos/pasitos.db`
/// - macOS: `~/Library/Application Support/pasitos/pasitos.db`
/// - Windows: `C:\Users\<user>\AppData\Local\pasitos\pasitos.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("pasitos")
        .join("pasitos.db")
}
