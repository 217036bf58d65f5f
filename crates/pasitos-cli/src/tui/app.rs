//! Application state for the map screen.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use pasitos_core::{MapController, PermissionState, TickOutcome};

use super::map::MapView;

/// How often the fix is re-read from the NMEA file.
const FIX_REFRESH_INTERVAL: Duration = Duration::from_secs(1);
/// Maximum number of status messages kept.
const MAX_STATUS_MESSAGES: usize = 5;

/// State shared by the event loop, the input handler and the renderer.
pub struct App {
    /// The controller, which owns the map once it is ready.
    pub controller: MapController<MapView>,
    /// Whether the application should exit.
    pub should_quit: bool,
    /// Status messages with the time they were queued.
    pub status_messages: Vec<(String, Instant)>,
    /// Seconds before a status message expires.
    pub status_message_timeout: u64,
    /// Locations recorded since the screen opened.
    pub recorded_this_session: u32,
    last_fix_refresh: Option<Instant>,
}

impl App {
    pub fn new(controller: MapController<MapView>) -> Self {
        Self {
            controller,
            should_quit: false,
            status_messages: Vec::new(),
            status_message_timeout: 5,
            recorded_this_session: 0,
            last_fix_refresh: None,
        }
    }

    /// Returns whether the application should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Add a status message to the queue.
    pub fn push_status_message(&mut self, message: String) {
        self.status_messages.push((message, Instant::now()));
        while self.status_messages.len() > MAX_STATUS_MESSAGES {
            self.status_messages.remove(0);
        }
    }

    /// Remove expired status messages.
    pub fn clean_expired_messages(&mut self) {
        let timeout = Duration::from_secs(self.status_message_timeout);
        self.status_messages
            .retain(|(_, created)| created.elapsed() < timeout);
    }

    /// Get the current status message to display.
    pub fn current_status_message(&self) -> Option<&str> {
        self.status_messages.last().map(|(msg, _)| msg.as_str())
    }

    /// Whether the permission dialog is waiting for an answer.
    pub fn permission_dialog_open(&self) -> bool {
        self.controller.permission() == PermissionState::Requested
    }

    /// The user answered the permission dialog.
    pub fn answer_permission(&mut self, granted: bool) {
        self.controller.on_permission_result(granted);
        if granted {
            self.push_status_message("Location access allowed".to_string());
        }
        self.collect_notices();
    }

    /// The map view, once ready.
    pub fn map(&self) -> Option<&MapView> {
        self.controller.map()
    }

    /// Mutable map view, once ready.
    pub fn map_mut(&mut self) -> Option<&mut MapView> {
        self.controller.map_mut()
    }

    /// One iteration of the event loop: refresh the fix, run a due tick
    /// and surface notices.
    pub fn tick(&mut self, now: Instant) {
        let refresh_due = self
            .last_fix_refresh
            .is_none_or(|last| now.duration_since(last) >= FIX_REFRESH_INTERVAL);
        if refresh_due {
            if let Some(map) = self.controller.map_mut() {
                map.refresh();
            }
            self.last_fix_refresh = Some(now);
        }

        if let Some(outcome) = self.controller.poll_timer(now) {
            self.handle_outcome(outcome);
        }
        self.collect_notices();
    }

    /// Time until the next sample, for the header.
    pub fn next_sample_in(&self, now: Instant) -> Option<Duration> {
        self.controller.timer().remaining(now)
    }

    fn handle_outcome(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Recorded { id, marker } => {
                self.recorded_this_session += 1;
                self.push_status_message(format!(
                    "Recorded #{} at {} ({})",
                    id, marker.position, marker.snippet
                ));
            }
            TickOutcome::StoreFailed => {
                // Dropped without telling the user; the log has the details
                debug!("Sample dropped after store failure");
            }
            TickOutcome::Skipped(_) => {}
        }
    }

    fn collect_notices(&mut self) {
        for notice in self.controller.drain_notices() {
            self.push_status_message(notice.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pasitos_core::SamplingTimer;
    use pasitos_core::mock::MockBattery;
    use pasitos_store::Store;

    use super::*;
    use crate::nmea::NmeaLocation;
    use crate::permission::PromptPermission;

    const RMC: &str = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";

    fn app_with_nmea(path: &std::path::Path) -> App {
        let mut controller = MapController::new(
            Store::open_in_memory().unwrap(),
            Box::new(MockBattery::new(55)),
            Box::new(PromptPermission::new()),
            SamplingTimer::new(Duration::from_secs(300)),
        );
        controller.start(Instant::now());
        let location = NmeaLocation::new(path, Duration::from_secs(60));
        controller
            .on_map_ready(MapView::new(location, None))
            .unwrap();
        App::new(controller)
    }

    #[test]
    fn test_status_messages_are_bounded() {
        let mut app = app_with_nmea(std::path::Path::new("/nonexistent"));
        for i in 0..8 {
            app.push_status_message(format!("message {}", i));
        }
        assert_eq!(app.status_messages.len(), MAX_STATUS_MESSAGES);
        assert_eq!(app.current_status_message(), Some("message 7"));
    }

    #[test]
    fn test_dialog_open_until_answered() {
        let mut app = app_with_nmea(std::path::Path::new("/nonexistent"));
        assert!(app.permission_dialog_open());

        app.answer_permission(false);
        assert!(!app.permission_dialog_open());
        assert_eq!(
            app.current_status_message(),
            Some("Location permission not granted")
        );
    }

    #[test]
    fn test_tick_before_answer_shows_notice() {
        let mut app = app_with_nmea(std::path::Path::new("/nonexistent"));
        app.tick(Instant::now());

        assert_eq!(
            app.current_status_message(),
            Some("Location permission not granted")
        );
        assert_eq!(app.controller.store().count_locations().unwrap(), 0);
    }

    #[test]
    fn test_tick_records_after_grant() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", RMC).unwrap();
        file.flush().unwrap();

        let mut app = app_with_nmea(file.path());
        app.answer_permission(true);
        app.tick(Instant::now());

        assert_eq!(app.recorded_this_session, 1);
        assert_eq!(app.map().unwrap().markers().len(), 1);
        assert!(app.current_status_message().unwrap().starts_with("Recorded #1"));

        // Not due again until the period has passed
        app.tick(Instant::now());
        assert_eq!(app.controller.store().count_locations().unwrap(), 1);
    }

    #[test]
    fn test_tick_without_fix_shows_notice() {
        let mut app = app_with_nmea(std::path::Path::new("/nonexistent/gps.nmea"));
        app.answer_permission(true);
        app.tick(Instant::now());

        assert_eq!(
            app.current_status_message(),
            Some("Current location not available")
        );
    }
}
