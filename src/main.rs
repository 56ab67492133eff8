//! Terminal picture puzzle (default binary).
//!
//! Plays either variant in the terminal with keyboard and mouse input. There is
//! no real picture; `--image` only sets the aspect ratio of the board. Logs go
//! to a file so they do not fight the renderer for the screen.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use picture_puzzle::core::{GameSession, LogRecorder, SessionConfig};
use picture_puzzle::input::{handle_key_event, should_quit, InputAction, PointerMapper};
use picture_puzzle::store::StoreConfig;
use picture_puzzle::term::{
    FrameBuffer, PuzzleView, TerminalRenderer, Viewport, HUD_ROWS, UNITS_PER_COL, UNITS_PER_ROW,
};
use picture_puzzle::types::{GameType, Size, TICK_MS};

#[derive(Parser, Debug)]
#[command(name = "picture-puzzle", version, about = "Sliding-tile and jigsaw puzzles in the terminal")]
struct Cli {
    /// `slide` or `jigsaw`
    #[arg(long, value_parser = parse_game_type, default_value = "slide")]
    game_type: GameType,

    /// Grid dimension (slide 3-10, jigsaw 2-12); the variant's default when omitted
    #[arg(long)]
    difficulty: Option<u8>,

    /// Picture dimensions as WIDTHxHEIGHT; only the aspect ratio matters
    #[arg(long, value_parser = parse_dimensions, default_value = "4x3")]
    image: Size,

    /// Fixed shuffle seed
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "")]
    puzzle_id: String,

    #[arg(long, default_value = "")]
    category: String,

    /// Best-time file; falls back to PUZZLE_BEST_TIMES_PATH
    #[arg(long)]
    best_times: Option<PathBuf>,

    /// Keyboard only
    #[arg(long)]
    no_mouse: bool,
}

fn parse_game_type(s: &str) -> Result<GameType, String> {
    GameType::from_str(s).ok_or_else(|| format!("unknown game type `{s}`"))
}

fn parse_dimensions(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{s}`"))?;
    let w: f32 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h: f32 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    if !(w > 0.0 && h > 0.0) {
        return Err("dimensions must be positive".to_string());
    }
    Ok(Size::new(w, h))
}

fn init_logging() -> Result<()> {
    let path = std::env::var("PUZZLE_LOG_PATH").unwrap_or_else(|_| "picture-puzzle.log".to_string());
    let file = std::fs::File::create(&path).with_context(|| format!("creating log file {path}"))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let mut term = TerminalRenderer::new();
    term.enter(!cli.no_mouse)?;

    let result = run(&mut term, &cli);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, cli: &Cli) -> Result<()> {
    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut viewport = Viewport::new(w, h);

    let difficulty = cli
        .difficulty
        .unwrap_or_else(|| cli.game_type.default_difficulty());
    let mut config = SessionConfig::new(cli.game_type, difficulty)
        .with_puzzle(cli.puzzle_id.clone(), cli.category.clone());
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let store = match &cli.best_times {
        Some(path) => StoreConfig {
            path: Some(path.clone()),
            disabled: false,
        },
        None => StoreConfig::from_env(),
    };
    let mut session = GameSession::new(config, viewport.container())?
        .with_best_times(store.open_cache())
        .with_recorder(LogRecorder);
    session.image_ready(cli.image);
    info!(game_type = %cli.game_type, difficulty, "Terminal session ready");

    let view = PuzzleView::new();
    let pointer = PointerMapper::new(HUD_ROWS, UNITS_PER_COL, UNITS_PER_ROW);
    let mut fb = FrameBuffer::new(w, h);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((viewport.width, viewport.height));
        if (w, h) != (viewport.width, viewport.height) {
            viewport = Viewport::new(w, h);
            session.resize(viewport.container());
            term.invalidate();
        }

        view.render_into(&session.snapshot(), viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        apply_action(&mut session, action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some((phase, point)) = pointer.map(&mouse) {
                        session.pointer(phase, point);
                    }
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            session.tick(TICK_MS);
        }
    }
}

/// Apply a key action. Changing the variant or grid size is refused while an
/// attempt is under way.
fn apply_action(session: &mut GameSession, action: InputAction) -> Result<bool> {
    let applied = match action {
        InputAction::Command(command) => session.apply_command(command),
        InputAction::TogglePause => session.toggle_pause(),
        InputAction::Slide(direction) => session.slide_direction(direction),
        InputAction::ToggleGameType | InputAction::Harder | InputAction::Easier => {
            if session.state().in_progress() {
                warn!(state = %session.state(), "Stop the current attempt before reconfiguring");
                return Ok(false);
            }
            let (game_type, difficulty) = match action {
                InputAction::ToggleGameType => {
                    let t = session.game_type().toggled();
                    (t, t.clamp_difficulty(session.difficulty()))
                }
                InputAction::Harder => (session.game_type(), session.difficulty().saturating_add(1)),
                _ => (session.game_type(), session.difficulty().saturating_sub(1)),
            };
            if !game_type.is_valid_difficulty(difficulty) {
                return Ok(false);
            }
            session.configure(game_type, difficulty)?
        }
    };
    Ok(applied)
}
