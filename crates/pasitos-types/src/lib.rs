//! Shared types for the Pasitos location logger.
//!
//! These are the values that flow between the store, the map controller
//! and the terminal front end:
//!
//! - [`Fix`]: a resolved GPS position
//! - [`BatteryLevel`]: battery charge as a whole percentage
//! - [`Marker`]: a point rendered on the map with its popup text
//! - [`Notice`]: a transient user-visible message
//!
//! # Example
//!
//! ```
//! use pasitos_types::{BatteryLevel, Fix, Marker};
//!
//! let fix = Fix::new(40.4168, -3.7038)?;
//! let battery = BatteryLevel::new(80)?;
//! let marker = Marker::recorded(fix, battery);
//! assert_eq!(marker.snippet, "Battery: 80%");
//! # Ok::<(), pasitos_types::ParseError>(())
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{BatteryLevel, Fix, Marker, Notice, Zoom};
