//! Keyboard input handling for the map screen.
//!
//! # Key Bindings
//!
//! | Key              | Action                  |
//! |------------------|-------------------------|
//! | `q`              | Quit                    |
//! | `+` / `=`        | Zoom in                 |
//! | `-`              | Zoom out                |
//! | arrows / `hjkl`  | Pan                     |
//! | `n` / `p`        | Next / previous marker  |
//! | `c`              | Centre on my location   |
//! | `Esc`            | Clear marker selection  |
//!
//! While the permission dialog is open only `y`, `n` and `Esc` are read.

use crossterm::event::KeyCode;

use super::app::App;

/// User actions that can be triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Zoom the camera in.
    ZoomIn,
    /// Zoom the camera out.
    ZoomOut,
    /// Move the camera by pan steps (east, north).
    Pan(i8, i8),
    /// Select the next marker.
    NextMarker,
    /// Select the previous marker.
    PreviousMarker,
    /// Centre the camera on the current fix.
    CenterOnFix,
    /// Deselect the marker.
    ClearSelection,
    /// Allow location access.
    AllowLocation,
    /// Refuse location access.
    DenyLocation,
    /// No action (unrecognized key).
    None,
}

/// Map a key code to an action.
pub fn handle_key(key: KeyCode, permission_dialog_open: bool) -> Action {
    if permission_dialog_open {
        return match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Action::AllowLocation,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::DenyLocation,
            KeyCode::Char('q') => Action::Quit,
            _ => Action::None,
        };
    }

    match key {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::ZoomIn,
        KeyCode::Char('-') | KeyCode::Char('_') => Action::ZoomOut,
        KeyCode::Left | KeyCode::Char('h') => Action::Pan(-1, 0),
        KeyCode::Right | KeyCode::Char('l') => Action::Pan(1, 0),
        KeyCode::Up | KeyCode::Char('k') => Action::Pan(0, 1),
        KeyCode::Down | KeyCode::Char('j') => Action::Pan(0, -1),
        KeyCode::Char('n') | KeyCode::Tab => Action::NextMarker,
        KeyCode::Char('p') | KeyCode::BackTab => Action::PreviousMarker,
        KeyCode::Char('c') => Action::CenterOnFix,
        KeyCode::Esc => Action::ClearSelection,
        _ => Action::None,
    }
}

/// Apply an action to the application state.
pub fn apply_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.should_quit = true,
        Action::ZoomIn => app.controller.zoom_in(),
        Action::ZoomOut => app.controller.zoom_out(),
        Action::Pan(dx, dy) => {
            if let Some(map) = app.map_mut() {
                map.pan(dx, dy);
            }
        }
        Action::NextMarker | Action::PreviousMarker => {
            let Some(map) = app.map_mut() else {
                return;
            };
            let found = if action == Action::NextMarker {
                map.select_next().is_some()
            } else {
                map.select_previous().is_some()
            };
            if !found {
                app.push_status_message("No recorded locations yet".to_string());
            }
        }
        Action::CenterOnFix => {
            let centered = app.map_mut().is_some_and(|map| map.center_on_fix());
            if !centered {
                app.push_status_message("Current location not available".to_string());
            }
        }
        Action::ClearSelection => {
            if let Some(map) = app.map_mut() {
                map.clear_selection();
            }
        }
        Action::AllowLocation => app.answer_permission(true),
        Action::DenyLocation => app.answer_permission(false),
        Action::None => {}
    }
}
