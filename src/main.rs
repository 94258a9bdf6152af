//! urna - Terminal Ballot Box
//!
//! A voting kiosk for the terminal: the voter types a CPF, the server
//! clears it, a photo is taken, and the vote is cast on a two-digit keypad.

use std::io;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use thiserror::Error;

use urna::application::{App, Reply};
use urna::infrastructure::{
    init_logging, ApiError, Args, Dispatcher, HttpBallotApi, LoggingError, Settings,
    SettingsError,
};
use urna::presentation::{render_ui, InputHandler};

/// How long to wait for a key before checking for replies.
const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
enum KioskError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to set up logging: {0}")]
    Logging(#[from] LoggingError),
    #[error("failed to create HTTP client: {0}")]
    Api(#[from] ApiError),
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        error!("{err}");
        eprintln!("urna: {err}");
        std::process::exit(1)
    }
}

fn run(args: &Args) -> Result<(), KioskError> {
    let settings = Settings::resolve(args)?;
    let _log_handle = init_logging(&settings.log)?;
    info!("Starting kiosk against {}", settings.server_url);

    let api = HttpBallotApi::new(&settings.server_url, settings.request_timeout())?;
    let (replies_tx, replies_rx) = mpsc::channel();
    let dispatcher = Dispatcher::new(
        Arc::new(api),
        settings.camera.build(),
        settings.chime.build(),
        replies_tx,
    );
    let mut app = App::new(settings.reset_delay());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    dispatcher.dispatch_all(app.boot());
    let res = run_app(&mut terminal, &mut app, &dispatcher, &replies_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref err) = res {
        error!("Event loop failed: {err}");
    }
    info!("Kiosk stopped");
    Ok(res?)
}

/// Main event loop.
///
/// Keys and worker replies are handled on this thread only; every effect
/// they produce is handed to the dispatcher.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    dispatcher: &Dispatcher,
    replies: &Receiver<Reply>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if InputHandler::is_quit(key.code, key.modifiers) {
                        return Ok(());
                    }
                    let effects = InputHandler::handle_key_event(app, key.code, key.modifiers);
                    dispatcher.dispatch_all(effects);
                }
            }
        }

        while let Ok(reply) = replies.try_recv() {
            let effects = app.handle_reply(reply);
            dispatcher.dispatch_all(effects);
        }
    }
}
