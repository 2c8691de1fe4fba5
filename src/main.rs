//! Grid Snake entry point
//!
//! Sets up logging and the terminal, then runs the game loop: keyboard
//! commands arrive over a channel from an input thread, ticks fire when the
//! driver's deadline passes.

use std::fs::File;
use std::io::{Stdout, stdout};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::terminal;

use grid_snake::term::{Command, TerminalRenderer, map_key, required_size};
use grid_snake::{Driver, HighScores, Settings};

/// Wait used while no tick is scheduled (after game over)
const IDLE_WAIT: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(name = "grid-snake", about = "Snake on a fixed grid, in your terminal")]
struct Args {
    /// Settings file (JSON); defaults are used when it does not exist
    #[arg(long, default_value = "grid-snake.json")]
    config: PathBuf,

    /// High score file (JSON)
    #[arg(long, default_value = "grid-snake-scores.json")]
    scores: PathBuf,

    /// Seed for food placement; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match log_file {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        // stderr would scribble over the board
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
    Ok(())
}

fn spawn_input_thread(tx: Sender<Command>) {
    thread::spawn(move || {
        loop {
            let ev = match event::read() {
                Ok(ev) => ev,
                Err(e) => {
                    log::warn!("Input error: {}", e);
                    let _ = tx.send(Command::Quit);
                    return;
                }
            };
            let Event::Key(key) = ev else { continue };
            if let Some(cmd) = map_key(&key) {
                if tx.send(cmd).is_err() || cmd == Command::Quit {
                    return;
                }
            }
        }
    });
}

fn run(driver: &mut Driver<TerminalRenderer<Stdout>, HighScores>, rx: &Receiver<Command>) -> Result<()> {
    driver.start(Instant::now());

    loop {
        let wait = driver
            .next_deadline()
            .map(|d| d.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_WAIT);

        match rx.recv_timeout(wait) {
            Ok(Command::Steer(direction)) => {
                driver.handle_intent(direction);
            }
            Ok(Command::Reset) => {
                log::info!("Reset requested");
                driver.reset(Instant::now())?;
            }
            Ok(Command::Quit) | Err(RecvTimeoutError::Disconnected) => return Ok(()),
            Err(RecvTimeoutError::Timeout) => {}
        }

        driver.poll(Instant::now());
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let settings = Settings::load(&args.config).context("loading settings")?;
    let grid = settings.grid();
    let Some((need_w, need_h)) = required_size(grid.columns(), grid.rows()) else {
        bail!("a {}x{} board cannot fit in a terminal", grid.columns(), grid.rows());
    };
    let (term_w, term_h) = terminal::size().context("reading terminal size")?;
    if term_w < need_w || term_h < need_h {
        bail!("terminal is {term_w}x{term_h}, the board needs {need_w}x{need_h}");
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Grid Snake starting with seed {}", seed);

    let scores = HighScores::load(&args.scores);
    let mut driver = Driver::new(settings, seed, TerminalRenderer::new(stdout()), scores)?;

    let guard = TerminalGuard::arm();
    driver.renderer_mut().setup().context("preparing terminal")?;
    let (tx, rx) = mpsc::channel();
    spawn_input_thread(tx);

    let result = run(&mut driver, &rx);
    let restored = driver.renderer_mut().restore().context("restoring terminal");
    guard.disarm();
    log::info!("Best score {}", driver.high_score());

    if let (Err(_), Err(e)) = (&result, &restored) {
        log::error!("{:#}", e);
    }
    result.and(restored)
}

/// Restores the terminal if the game loop unwinds or bails early
struct TerminalGuard {
    armed: bool,
}

impl TerminalGuard {
    fn arm() -> Self {
        Self { armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = TerminalRenderer::new(stdout()).restore() {
                log::error!("Failed to restore terminal: {}", e);
            }
        }
    }
}
