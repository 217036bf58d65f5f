//! The terminal map screen.
//!
//! This module ties the map controller to the terminal. It handles:
//!
//! - Terminal setup and restoration
//! - Building the controller with the sysfs battery, the permission dialog
//!   and the NMEA-backed map
//! - The main event loop: input, timer checks and rendering on one thread

pub mod app;
pub mod input;
pub mod map;
pub mod ui;

pub use app::App;
pub use map::MapView;

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::time::Instant;
use tracing::info;

use pasitos_core::{MapController, SamplingTimer};
use pasitos_store::Store;

use crate::battery::SysfsBattery;
use crate::config::Config;
use crate::nmea::NmeaLocation;
use crate::permission::PromptPermission;

/// Set up the terminal for TUI rendering.
///
/// Enables raw mode and switches to the alternate screen buffer.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Build the controller for the map screen and hand it the map.
pub fn build_app(config: &Config) -> Result<App> {
    let store = Store::open(&config.storage.path).with_context(|| {
        format!(
            "Failed to open database {}",
            config.storage.path.display()
        )
    })?;
    info!("Store path: {:?}", config.storage.path);

    let center = store.latest_location()?.map(|record| record.fix());

    let mut controller = MapController::new(
        store,
        Box::new(SysfsBattery::new(&config.battery.power_supply_dir)),
        Box::new(PromptPermission::new()),
        SamplingTimer::new(config.sampling.interval()),
    );
    controller.start(Instant::now());

    let location = NmeaLocation::new(&config.location.nmea_path, config.location.max_fix_age());
    let loaded = controller.on_map_ready(MapView::new(location, center))?;

    let mut app = App::new(controller);
    app.push_status_message(format!("Loaded {} recorded location(s)", loaded));
    Ok(app)
}

/// Run the map screen until the user quits.
pub fn run(config: &Config) -> Result<()> {
    let mut app = build_app(config)?;

    let mut terminal = setup_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app);
    restore_terminal()?;

    app.controller.stop();
    info!(
        "Map screen closed, {} location(s) recorded this session",
        app.recorded_this_session
    );
    result
}

/// Main event loop for the TUI.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    while !app.should_quit() {
        app.clean_expired_messages();
        app.tick(Instant::now());

        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for keyboard events with timeout
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let action = input::handle_key(key.code, app.permission_dialog_open());
            input::apply_action(app, action);
        }
    }

    Ok(())
}
