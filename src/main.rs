// src/main.rs

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::info;

mod app;
mod config;
mod core;
mod export;
mod logging;
mod ui;

use app::{App, AppState};
use config::Config;
use crate::core::backend::HttpBackend;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Everything the key handlers need besides the app state.
struct Session {
    config: Config,
    backend: HttpBackend,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::initialize_logging()?;

    let config = Config::from_env()?;
    info!(api_base = %config.api_base, mode = %config.default_mode, "Starting Vanguard Mail.");
    let backend = HttpBackend::new(config.api_base.clone())?;

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let mut app = App::new(config.default_mode);
    let session = Session { config, backend };

    let result = run(&mut terminal, &mut app, &session);

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    result
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    session: &Session,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key, session);
                }
            }
        } else {
            app.on_tick();
        }

        app.poll_events();
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent, session: &Session) {
    if app.notice.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.dismiss_notice();
        }
        return;
    }
    match app.state {
        AppState::Input => handle_input_keys(app, key.code, session),
        AppState::VerifyWait => handle_common_keys(app, key.code),
        AppState::Report => match key.code {
            KeyCode::Char('e') | KeyCode::Char('E') => app.export(&session.config.export_dir, Local::now()),
            KeyCode::Up => app.select_previous(),
            KeyCode::Down => app.select_next(),
            code => handle_common_keys(app, code),
        },
    }
}

/// Handles typing in the form. Letters go to the email field, so quitting is on Esc.
fn handle_input_keys(app: &mut App, key_code: KeyCode, session: &Session) {
    match key_code {
        KeyCode::Esc => app.quit(),
        _ if app.pending => {}
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Tab => app.consent = !app.consent,
        KeyCode::F(2) => app.mode = app.mode.toggle(),
        KeyCode::Enter => {
            app.submit(&session.backend, session.config.poll_interval);
        }
        _ => {}
    }
}

fn handle_common_keys(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Char('n') | KeyCode::Char('N') => app.reset(),
        KeyCode::Char('l') | KeyCode::Char('L') => app.toggle_logs(),
        KeyCode::Left => app.scroll_logs_left(),
        KeyCode::Right => app.scroll_logs_right(),
        _ => {}
    }
}
