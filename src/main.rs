//! Terminal frontend and headless driver for the falling-block engine

mod cli;
mod headless;
mod input;
mod settings;
mod ui;

use clap::Parser;
use cli::Cli;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use input::{Command, KeyBindings};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};
use tetris_core::Game;
use tracing_subscriber::EnvFilter;
use ui::Overlay;

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Get the temp directory for logs, creating it if needed
fn log_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("tetris");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let session_id: u32 = rand::random();
    let dir = log_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Log to a file so the terminal UI stays clean
    let file_appender = tracing_appender::rolling::never(&dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tetris=debug,tetris_core=debug"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!("starting, session={:08x}, log={}", session_id, dir.join(&log_file).display());

    let mut settings = Settings::load();
    cli.apply_to(&mut settings);

    let gameplay = &settings.gameplay;
    let game = match gameplay.seed {
        Some(seed) => Game::with_seed(gameplay.width, gameplay.height, seed),
        None => Game::new(gameplay.width, gameplay.height),
    };
    let mut game = game.map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    if cli.headless {
        return headless::run(&mut game, io::stdin().lock(), io::stdout().lock());
    }

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut game, &settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    // Write the file on first run so it can be edited
    if Settings::settings_path().is_some_and(|path| !path.exists()) {
        if let Err(e) = Settings::load().save() {
            tracing::warn!("could not save settings: {}", e);
        }
    }

    println!("Final Score: {}", game.score());
    println!("Lines: {} | Pieces: {}", game.lines_cleared(), game.pieces_locked());

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game,
    settings: &Settings,
) -> io::Result<()> {
    let keys = KeyBindings::from_settings(settings);
    let tick_interval = Duration::from_millis(settings.gameplay.tick_ms.max(1));
    let mut last_tick = Instant::now();
    let mut paused = false;

    loop {
        let overlay = if game.is_game_over() {
            Overlay::GameOver
        } else if paused {
            Overlay::Paused
        } else {
            Overlay::None
        };
        terminal.draw(|frame| ui::render_game(frame, game, settings, overlay))?;

        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match keys.command(key) {
                        Some(Command::Quit) => return Ok(()),
                        Some(Command::Pause) if !game.is_game_over() => {
                            paused = !paused;
                            last_tick = Instant::now();
                        }
                        Some(Command::Restart) => {
                            game.reset();
                            paused = false;
                            last_tick = Instant::now();
                        }
                        Some(Command::Play(action)) if !paused => game.apply(action),
                        _ => {}
                    }
                }
            }
        }

        if !paused && last_tick.elapsed() >= tick_interval {
            game.tick();
            last_tick = Instant::now();
        }
    }
}
