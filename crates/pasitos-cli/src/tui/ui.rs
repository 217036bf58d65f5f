//! Layout and rendering for the map screen.
//!
//! - **Header**: title, zoom level, marker count, fix and next sample
//! - **Map**: world outline with recorded positions
//! - **Status bar**: latest status message or key help
//!
//! The permission dialog and the marker popup are drawn on top.

use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::canvas::{Canvas, Map, MapResolution, Points};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tokio::time::Instant;

use pasitos_types::Marker;

use super::app::App;
use super::map::MapView;

const BORDER_TYPE: BorderType = BorderType::Rounded;
const HELP_TEXT: &str = " q quit  +/- zoom  arrows pan  n/p markers  c my location  Esc deselect";

/// Draw the complete interface.
pub fn draw(frame: &mut Frame, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header bar
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, layout[0], app);
    match app.map() {
        Some(map) => draw_map(frame, layout[1], map),
        None => {
            let waiting = Paragraph::new("Loading map...")
                .centered()
                .block(map_block());
            frame.render_widget(waiting, layout[1]);
        }
    }
    draw_status_bar(frame, layout[2], app);

    if let Some(marker) = app.map().and_then(MapView::selected_marker) {
        draw_marker_popup(frame, layout[1], marker);
    }
    if app.permission_dialog_open() {
        draw_permission_dialog(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " Pasitos ",
        Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
    )];

    if let Some(map) = app.map() {
        spans.push(Span::raw(format!(
            "  zoom {}  {} marker(s)",
            map.zoom_level(),
            map.markers().len()
        )));
        let fix = match map.fix() {
            Some(fix) => Span::styled(format!("  ● {}", fix), Style::default().fg(Color::Green)),
            None => Span::styled("  ○ no fix", Style::default().fg(Color::DarkGray)),
        };
        spans.push(fix);
    }

    if let Some(remaining) = app.next_sample_in(Instant::now()) {
        let secs = remaining.as_secs();
        spans.push(Span::raw(format!(
            "  next sample {}:{:02}",
            secs / 60,
            secs % 60
        )));
    }

    spans.push(Span::styled(
        format!("  {}", Local::now().format("%H:%M:%S")),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn map_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .title(" Map ")
}

fn draw_map(frame: &mut Frame, area: Rect, map: &MapView) {
    let (x_bounds, y_bounds) = map.bounds();
    let coords: Vec<(f64, f64)> = map
        .markers()
        .iter()
        .map(|m| (m.position.longitude, m.position.latitude))
        .collect();
    let selected = map.selected_marker().map(|m| m.position);
    let fix = map.fix();

    let canvas = Canvas::default()
        .block(map_block())
        .marker(symbols::Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &coords,
                color: Color::Yellow,
            });
            if let Some(position) = selected {
                ctx.print(
                    position.longitude,
                    position.latitude,
                    Span::styled("◆", Style::default().fg(Color::Cyan).bold()),
                );
            }
            if let Some(fix) = fix {
                ctx.print(
                    fix.longitude,
                    fix.latitude,
                    Span::styled("●", Style::default().fg(Color::Red).bold()),
                );
            }
        });

    frame.render_widget(canvas, area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let line = match app.current_status_message() {
        Some(message) => Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(HELP_TEXT, Style::default().fg(Color::DarkGray))),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_marker_popup(frame: &mut Frame, map_area: Rect, marker: &Marker) {
    let width = 34.min(map_area.width.saturating_sub(2));
    let height = 5.min(map_area.height.saturating_sub(2));
    let x = map_area.x + map_area.width.saturating_sub(width + 1);
    let y = map_area.y + 1;

    let popup_area = Rect::new(x, y, width, height);
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled(marker.snippet.clone(), Style::default().bold())),
        Line::from(Span::styled(
            marker.position.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", marker.title)),
    );
    frame.render_widget(popup, popup_area);
}

fn draw_permission_dialog(frame: &mut Frame) {
    let area = frame.area();
    let width = 44.min(area.width.saturating_sub(4));
    let height = 6;
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;

    let dialog_area = Rect::new(x, y, width, height.min(area.height));
    frame.render_widget(Clear, dialog_area);

    let lines = vec![
        Line::from(""),
        Line::from(" Allow Pasitos to read your location?"),
        Line::from(""),
        Line::from(vec![
            Span::styled(" y", Style::default().fg(Color::Green)),
            Span::styled("=Allow  ", Style::default().fg(Color::DarkGray)),
            Span::styled("n", Style::default().fg(Color::Red)),
            Span::styled("=Deny", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let dialog = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Location permission "),
    );
    frame.render_widget(dialog, dialog_area);
}
