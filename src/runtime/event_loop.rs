use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::{App, InputMode};
use crate::config;
use crate::engine::EngineEvent;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mouse::{MouseState, handle_mouse};
use crate::runtime::mpris_sync::{MprisSnapshot, update_mpris};
use crate::ui::{self, UiAreas};

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Last state emitted to MPRIS.
    pub last_mpris: MprisSnapshot,
    /// Interactive regions of the last drawn frame.
    pub areas: UiAreas,
    pub mouse: MouseState,
}

/// Channels the loop reads from and writes to.
pub struct Channels<'a> {
    pub engine_rx: &'a mpsc::Receiver<EngineEvent>,
    pub control_tx: &'a mpsc::Sender<ControlCmd>,
    pub control_rx: &'a mpsc::Receiver<ControlCmd>,
}

/// Main terminal event loop: drains engine messages and MPRIS commands,
/// draws, then handles one input event. Returns when quit is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    mpris: &MprisHandle,
    channels: Channels<'_>,
    state: &mut EventLoopState,
) -> anyhow::Result<()> {
    loop {
        // Engine messages are consumed here, on the UI thread.
        while let Ok(ev) = channels.engine_rx.try_recv() {
            app.handle_engine_event(ev);
        }

        while let Ok(cmd) = channels.control_rx.try_recv() {
            if handle_control_cmd(cmd, app) {
                return Ok(());
            }
        }

        // Keep MPRIS in sync even when changes come from media keys or auto-advance.
        let snapshot = MprisSnapshot::of(app);
        if snapshot != state.last_mpris {
            update_mpris(mpris, app);
            state.last_mpris = snapshot;
        } else {
            mpris.set_position(app.session.state().position);
        }

        terminal.draw(|f| state.areas = ui::draw(f, app, &settings.ui, &settings.controls))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key_event(key, settings, app, channels.control_tx) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                handle_mouse(app, &state.areas, &mut state.mouse, mouse, Instant::now());
            }
            Event::Paste(text) => handle_paste(&text, settings, app),
            _ => {}
        }
    }
}

/// Dropped files arrive as a bracketed paste.
fn handle_paste(text: &str, settings: &config::Settings, app: &mut App) {
    match app.mode {
        InputMode::Open => {
            for c in text.chars().filter(|c| !c.is_control()) {
                app.push_prompt_char(c);
            }
        }
        InputMode::Normal => {
            let added = app.import_text(text, &settings.library);
            debug!(added, "paste");
        }
    }
}

/// Apply an MPRIS (or key-forwarded) command. Returns true on quit.
fn handle_control_cmd(cmd: ControlCmd, app: &mut App) -> bool {
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => app.play(),
        ControlCmd::Pause => app.pause(),
        ControlCmd::PlayPause => {
            if app.session.state().playing {
                app.pause();
            } else {
                app.play();
            }
        }
        ControlCmd::Stop => app.stop(),
        ControlCmd::Next => app.next_track(),
        ControlCmd::Prev => app.prev_track(),
        ControlCmd::Seek(micros) => app.seek_by(micros as f64 / 1_000_000.0),
    }
    false
}

/// Returns true when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    control_tx: &mpsc::Sender<ControlCmd>,
) -> bool {
    if app.mode == InputMode::Open {
        match key.code {
            KeyCode::Esc => app.cancel_prompt(),
            KeyCode::Enter => {
                app.submit_prompt(&settings.library);
            }
            KeyCode::Backspace => app.pop_prompt_char(),
            KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
            _ => {}
        }
        return false;
    }

    let seek_step = settings.controls.seek_step_seconds as f64;
    let volume_step = i16::from(settings.controls.volume_step);
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter => app.play_selected(),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') | KeyCode::Right => app.seek_by(seek_step),
        KeyCode::Char('H') | KeyCode::Left => app.seek_by(-seek_step),
        KeyCode::Char('+') | KeyCode::Char('=') => app.volume_by(volume_step),
        KeyCode::Char('-') | KeyCode::Char('_') => app.volume_by(-volume_step),
        KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete => app.remove_selected(),
        KeyCode::Char('o') => app.open_prompt(),
        _ => {}
    }
    false
}
