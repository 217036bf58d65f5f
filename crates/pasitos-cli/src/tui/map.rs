//! The terminal map widget.
//!
//! [`MapView`] is the [`MapSurface`] the controller draws on. It keeps a
//! camera (centre and zoom level), the markers added so far and the fix
//! last read from the NMEA file. Rendering lives in [`super::ui`].

use tracing::{debug, info};

use pasitos_core::{MapSurface, Result};
use pasitos_types::{Fix, Marker, Zoom};

use crate::nmea::NmeaLocation;

/// Widest zoom level: the whole world.
pub const MIN_ZOOM: u8 = 0;
/// Closest zoom level.
pub const MAX_ZOOM: u8 = 18;
/// Zoom used when the camera starts on a known position.
pub const FOCUS_ZOOM: u8 = 10;

/// Fraction of the visible span moved by one pan step.
const PAN_STEP: f64 = 0.25;

/// Camera, markers and my-location layer of the map screen.
#[derive(Debug)]
pub struct MapView {
    location: NmeaLocation,
    center: Fix,
    zoom: u8,
    markers: Vec<Marker>,
    selected: Option<usize>,
    my_location_enabled: bool,
    fix: Option<Fix>,
}

impl MapView {
    /// A map reading its fix from `location`.
    ///
    /// With a `center` the camera starts zoomed in on it, otherwise it shows
    /// the whole world.
    pub fn new(location: NmeaLocation, center: Option<Fix>) -> Self {
        let (center, zoom) = match center {
            Some(fix) => (fix, FOCUS_ZOOM),
            None => (Fix::ORIGIN, MIN_ZOOM),
        };
        Self {
            location,
            center,
            zoom,
            markers: Vec::new(),
            selected: None,
            my_location_enabled: false,
            fix: None,
        }
    }

    /// Re-read the fix. Does nothing while the my-location layer is off.
    pub fn refresh(&mut self) -> Option<Fix> {
        if self.my_location_enabled {
            self.fix = self.location.current_fix();
        }
        self.fix
    }

    pub fn center(&self) -> Fix {
        self.center
    }

    pub fn zoom_level(&self) -> u8 {
        self.zoom
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn is_my_location_enabled(&self) -> bool {
        self.my_location_enabled
    }

    /// The last fix read, if the layer is on.
    pub fn fix(&self) -> Option<Fix> {
        self.fix
    }

    /// Visible longitude and latitude ranges as `(x_bounds, y_bounds)`.
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let (lon_span, lat_span) = self.span();
        (
            [
                self.center.longitude - lon_span / 2.0,
                self.center.longitude + lon_span / 2.0,
            ],
            [
                self.center.latitude - lat_span / 2.0,
                self.center.latitude + lat_span / 2.0,
            ],
        )
    }

    /// Degrees of longitude and latitude on screen.
    fn span(&self) -> (f64, f64) {
        let scale = f64::from(1u32 << self.zoom);
        (360.0 / scale, 180.0 / scale)
    }

    /// Move the camera by pan steps; positive `dx` is east, positive `dy` north.
    pub fn pan(&mut self, dx: i8, dy: i8) {
        let (lon_span, lat_span) = self.span();
        let latitude =
            (self.center.latitude + f64::from(dy) * lat_span * PAN_STEP).clamp(-90.0, 90.0);
        let longitude = wrap_longitude(self.center.longitude + f64::from(dx) * lon_span * PAN_STEP);
        self.center = Fix {
            latitude,
            longitude,
        };
    }

    /// Move the camera to the current fix, if there is one.
    pub fn center_on_fix(&mut self) -> bool {
        match self.fix {
            Some(fix) => {
                self.center = fix;
                true
            }
            None => false,
        }
    }

    /// Select the next marker (wrapping) and centre on it.
    pub fn select_next(&mut self) -> Option<&Marker> {
        if self.markers.is_empty() {
            return None;
        }
        let index = match self.selected {
            Some(i) => (i + 1) % self.markers.len(),
            None => 0,
        };
        self.select(index)
    }

    /// Select the previous marker (wrapping) and centre on it.
    pub fn select_previous(&mut self) -> Option<&Marker> {
        if self.markers.is_empty() {
            return None;
        }
        let index = match self.selected {
            Some(0) | None => self.markers.len() - 1,
            Some(i) => i - 1,
        };
        self.select(index)
    }

    fn select(&mut self, index: usize) -> Option<&Marker> {
        self.selected = Some(index);
        let marker = self.markers.get(index)?;
        self.center = marker.position;
        Some(marker)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_marker(&self) -> Option<&Marker> {
        self.selected.and_then(|i| self.markers.get(i))
    }
}

impl MapSurface for MapView {
    fn enable_my_location(&mut self) -> Result<()> {
        if !self.location.path().exists() {
            info!(
                "NMEA file {} does not exist yet, waiting for GPS data",
                self.location.path().display()
            );
        }
        self.my_location_enabled = true;
        self.refresh();
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
        debug!("Marker at {}", marker.position);
        self.markers.push(marker);
    }

    fn zoom(&mut self, direction: Zoom) {
        self.zoom = match direction {
            Zoom::In => (self.zoom + 1).min(MAX_ZOOM),
            Zoom::Out => self.zoom.saturating_sub(1),
        };
    }
}

fn wrap_longitude(longitude: f64) -> f64 {
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid maps 180 to -180; keep the eastern edge reachable
    if wrapped == -180.0 && longitude > 0.0 {
        180.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use pasitos_types::BatteryLevel;

    use super::*;

    fn view(center: Option<Fix>) -> MapView {
        let location = NmeaLocation::new("/nonexistent/gps.nmea", Duration::from_secs(60));
        MapView::new(location, center)
    }

    fn marker(latitude: f64, longitude: f64) -> Marker {
        Marker::recorded(
            Fix::new(latitude, longitude).unwrap(),
            BatteryLevel::new(50).unwrap(),
        )
    }

    #[test]
    fn test_starts_on_world_without_center() {
        let map = view(None);
        assert_eq!(map.zoom_level(), MIN_ZOOM);
        assert_eq!(map.bounds(), ([-180.0, 180.0], [-90.0, 90.0]));
    }

    #[test]
    fn test_starts_focused_on_center() {
        let map = view(Some(Fix::new(40.0, -3.0).unwrap()));
        assert_eq!(map.zoom_level(), FOCUS_ZOOM);
        let (x, y) = map.bounds();
        assert!(x[0] < -3.0 && -3.0 < x[1]);
        assert!(y[0] < 40.0 && 40.0 < y[1]);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut map = view(None);
        map.zoom(Zoom::Out);
        assert_eq!(map.zoom_level(), MIN_ZOOM);

        for _ in 0..30 {
            map.zoom(Zoom::In);
        }
        assert_eq!(map.zoom_level(), MAX_ZOOM);
    }

    #[test]
    fn test_zoom_halves_span() {
        let mut map = view(None);
        map.zoom(Zoom::In);
        assert_eq!(map.bounds(), ([-90.0, 90.0], [-45.0, 45.0]));
    }

    #[test]
    fn test_pan_moves_quarter_span() {
        let mut map = view(None);
        map.pan(1, 1);
        assert_eq!(map.center().longitude, 90.0);
        assert_eq!(map.center().latitude, 45.0);
    }

    #[test]
    fn test_pan_clamps_latitude_and_wraps_longitude() {
        let mut map = view(None);
        for _ in 0..10 {
            map.pan(0, 1);
        }
        assert_eq!(map.center().latitude, 90.0);

        map.pan(3, 0);
        map.pan(1, 0);
        // 4 x 90 degrees east brings the camera back round
        assert_eq!(map.center().longitude, 0.0);
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(190.0), -170.0);
        assert_eq!(wrap_longitude(-190.0), 170.0);
        assert_eq!(wrap_longitude(180.0), 180.0);
        assert_eq!(wrap_longitude(-180.0), -180.0);
    }

    #[test]
    fn test_marker_selection_cycles() {
        let mut map = view(None);
        assert!(map.select_next().is_none());

        map.add_marker(marker(1.0, 1.0));
        map.add_marker(marker(2.0, 2.0));

        assert_eq!(map.select_next().unwrap().position.latitude, 1.0);
        assert_eq!(map.select_next().unwrap().position.latitude, 2.0);
        assert_eq!(map.select_next().unwrap().position.latitude, 1.0);
        assert_eq!(map.select_previous().unwrap().position.latitude, 2.0);
        assert_eq!(map.center().latitude, 2.0);

        map.clear_selection();
        assert!(map.selected_marker().is_none());
        assert_eq!(map.select_previous().unwrap().position.latitude, 2.0);
    }

    #[test]
    fn test_my_location_requires_layer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A"
        )
        .unwrap();
        file.flush().unwrap();

        let location = NmeaLocation::new(file.path(), Duration::from_secs(60));
        let mut map = MapView::new(location, None);

        assert!(map.refresh().is_none());
        assert!(map.my_location().is_none());

        map.enable_my_location().unwrap();
        let fix = map.my_location().unwrap();
        assert!((fix.latitude - 48.1173).abs() < 1e-6);

        assert!(map.center_on_fix());
        assert_eq!(map.center(), fix);
    }

    #[test]
    fn test_missing_nmea_file_has_no_fix() {
        let mut map = view(None);
        map.enable_my_location().unwrap();
        assert!(map.is_my_location_enabled());
        assert!(map.my_location().is_none());
        assert!(!map.center_on_fix());
    }
}
