//! Output formatting for the `list` command.

use chrono::{DateTime, Local};
use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::settings::Style;

use pasitos_store::StoredLocation;

/// Battery levels below this are shown in red.
const LOW_BATTERY: u8 = 20;
/// Battery levels below this are shown in yellow.
const MEDIUM_BATTERY: u8 = 50;

/// Render the recorded locations as a table, oldest first.
#[must_use]
pub fn format_locations_text(records: &[StoredLocation], no_color: bool) -> String {
    if records.is_empty() {
        return "No recorded locations.\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["#", "Recorded", "Latitude", "Longitude", "Battery"]);

    for record in records {
        builder.push_record([
            record.id.to_string(),
            format_local_time(record),
            format!("{:.5}", record.latitude),
            format!("{:.5}", record.longitude),
            format_battery(record.battery, no_color),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());

    let title = format!("Recorded locations ({}):", records.len());
    let title = if no_color {
        title
    } else {
        format!("{}", title.bold())
    };

    format!("{}\n{}\n", title, table)
}

/// Recording time in the local time zone.
fn format_local_time(record: &StoredLocation) -> String {
    let millis = (record.recorded_at.unix_timestamp_nanos() / 1_000_000) as i64;
    DateTime::from_timestamp_millis(millis)
        .map(|utc| {
            utc.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Battery percentage, red when low and yellow when half empty.
#[must_use]
pub fn format_battery(percent: u8, no_color: bool) -> String {
    let label = format!("{}%", percent);
    if no_color {
        label
    } else if percent < LOW_BATTERY {
        format!("{}", label.red())
    } else if percent < MEDIUM_BATTERY {
        format!("{}", label.yellow())
    } else {
        format!("{}", label.green())
    }
}
