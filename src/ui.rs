//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. The
//! rectangles it draws into are returned so the runtime can hit-test mouse
//! events against the same geometry.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, InputMode};
use crate::config::{ControlsSettings, UiSettings};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("enter", "play selected");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next");
    // H/L and +/- are filled dynamically from config.
    map.insert("d", "remove");
    map.insert("o", "open");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating the configured steps.
fn controls_text(controls: &ControlsSettings) -> String {
    let order = ["j/k", "enter", "space/p", "h/l", "H/L", "+/-", "d", "o", "q"];
    order
        .iter()
        .filter_map(|k| match *k {
            "H/L" => Some(format!("[H/L] seek -/+{}s", controls.seek_step_seconds)),
            "+/-" => Some(format!("[+/-] volume {}%", controls.volume_step)),
            _ => CONTROLS_MAP.get(k).map(|v| format!("[{k}] {v}")),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Screen regions that react to the mouse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiAreas {
    /// Inside of the playlist border; one row per track.
    pub playlist: Rect,
    pub seek: Rect,
    pub volume: Rect,
}

const GLYPH_WIDTH: u16 = 4;
const TIME_WIDTH: u16 = 15;
const VOLUME_WIDTH: u16 = 24;

struct Regions {
    header: Rect,
    playlist_block: Rect,
    transport_block: Rect,
    footer: Rect,
    now_playing: Rect,
    seek: Rect,
    glyph: Rect,
    time: Rect,
    volume: Rect,
}

fn regions(area: Rect) -> Regions {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(5),
            Constraint::Length(4),
        ])
        .split(area);

    let transport_inner = Block::default().borders(Borders::ALL).inner(chunks[2]);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(transport_inner);
    let controls_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(GLYPH_WIDTH),
            Constraint::Length(TIME_WIDTH),
            Constraint::Min(0),
            Constraint::Length(VOLUME_WIDTH),
        ])
        .split(rows[2]);

    Regions {
        header: chunks[0],
        playlist_block: chunks[1],
        transport_block: chunks[2],
        footer: chunks[3],
        now_playing: rows[0],
        seek: rows[1],
        glyph: controls_row[0],
        time: controls_row[1],
        volume: controls_row[3],
    }
}

/// Mouse-relevant geometry for a terminal of size `area`.
pub fn layout(area: Rect) -> UiAreas {
    let r = regions(area);
    UiAreas {
        playlist: Block::default().borders(Borders::ALL).inner(r.playlist_block),
        seek: r.seek,
        volume: r.volume,
    }
}

/// First and one-past-last playlist rows shown when `height` rows are
/// available, keeping `selected` near the middle.
pub fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// Fill ratio for a pointer at column `x` over a horizontal bar.
pub fn ratio_at(bar: Rect, x: u16) -> f64 {
    if bar.width <= 1 {
        return 0.0;
    }
    let offset = x.saturating_sub(bar.x).min(bar.width - 1);
    f64::from(offset) / f64::from(bar.width - 1)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn now_playing_text(app: &App) -> String {
    let Some(track) = app.session.current_track() else {
        return "nothing playing".to_string();
    };
    match track.artist.as_deref() {
        Some(artist) => format!("{} - {}", artist, track.title),
        None => track.display.clone(),
    }
}

/// Render the entire UI into `frame` and return the interactive areas.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) -> UiAreas {
    let r = regions(frame.area());
    let areas = layout(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(ui_settings.title.as_str())
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, r.header);

    // Playlist
    {
        let tracks = app.tracks();
        let active = app.session.active_index();
        let (start, end) =
            visible_window(tracks.len(), areas.playlist.height as usize, app.selected);

        let items: Vec<ListItem> = tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, t)| {
                if Some(start + offset) == active {
                    ListItem::new(format!("♪ {}", t.display)).bold()
                } else {
                    ListItem::new(format!("  {}", t.display))
                }
            })
            .collect();

        let title = format!(" playlist ({}) ", tracks.len());
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default();
        if !tracks.is_empty() {
            state.select(Some(app.selected - start));
        }
        frame.render_stateful_widget(list, r.playlist_block, &mut state);
    }

    // Transport
    let transport = &app.transport;
    frame.render_widget(
        Block::default().borders(Borders::ALL).title(" now playing "),
        r.transport_block,
    );
    frame.render_widget(Paragraph::new(now_playing_text(app)).bold(), r.now_playing);
    frame.render_widget(
        Gauge::default()
            .ratio(transport.seek().ratio())
            .label(transport.time_label())
            .use_unicode(true),
        r.seek,
    );
    frame.render_widget(
        Paragraph::new(format!(" {}", transport.glyph())).bold(),
        r.glyph,
    );
    frame.render_widget(Paragraph::new(transport.time_label()), r.time);
    let volume = transport.volume();
    frame.render_widget(
        Gauge::default()
            .ratio(volume.ratio())
            .label(format!("vol {}%", volume.value())),
        r.volume,
    );

    // Footer: status line, then key help.
    let mut lines = Vec::new();
    if let Some(status) = &app.status {
        lines.push(Line::from(Span::raw(status.as_str()).italic()));
    }
    lines.push(Line::from(controls_text(controls_settings)));
    let footer = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, r.footer);

    if app.mode == InputMode::Open {
        let popup = centered_rect_sized(72, 3, r.playlist_block);
        frame.render_widget(Clear, popup);
        let prompt = Paragraph::new(format!("{}_", app.prompt)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" open: paths or folders (enter adds, esc cancels) "),
        );
        frame.render_widget(prompt, popup);
    }

    areas
}
