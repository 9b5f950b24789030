use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::engine::RodioFactory;
use crate::logging;
use crate::mpris::ControlCmd;
use crate::session::PlaybackSession;

mod event_loop;
mod mouse;
mod mpris_sync;
mod settings;

pub fn run() -> anyhow::Result<()> {
    let (settings, config_problem) = settings::load_settings();

    let _log_guard = match logging::init(&settings.log) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("marquee: logging disabled: {e:#}");
            None
        }
    };
    if let Some(problem) = config_problem {
        warn!("{problem}");
    }

    let factory = RodioFactory::open_default(Duration::from_millis(settings.audio.tick_ms))
        .context("failed to open the default audio output")?;
    let (engine_tx, engine_rx) = mpsc::channel();
    let session = PlaybackSession::new(
        Box::new(factory),
        engine_tx,
        settings.audio.initial_volume,
    );
    let mut app = App::new(session, settings.audio.initial_volume);

    let args: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    if !args.is_empty() {
        let added = app.import_paths(&args, &settings.library);
        info!(added, "tracks from command line");
    }

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mpris,
        event_loop::Channels {
            engine_rx: &engine_rx,
            control_tx: &control_tx,
            control_rx: &control_rx,
        },
        &mut state,
    );

    app.session.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    run_result
}
