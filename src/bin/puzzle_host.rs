//! Headless puzzle engine driven over the host bridge.
//!
//! Listens on `PUZZLE_HOST_ADDR:PUZZLE_HOST_PORT`, applies host messages to one
//! shared session and streams observations back. Best times follow
//! `PUZZLE_BEST_TIMES_PATH`; completions are forwarded to every connected host.

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use picture_puzzle::adapter::{Adapter, ChannelRecorder, HostBridge, SeqCounter};
use picture_puzzle::core::{GameSession, SessionConfig};
use picture_puzzle::store::StoreConfig;
use picture_puzzle::types::{GameType, Size, TICK_MS};

#[derive(Parser, Debug)]
#[command(name = "puzzle-host", version, about = "Picture puzzle engine behind a JSON socket")]
struct Cli {
    /// Variant used until the host sends `load` or `configure`
    #[arg(long, value_parser = parse_game_type, default_value = "jigsaw")]
    game_type: GameType,

    #[arg(long)]
    difficulty: Option<u8>,

    /// Fixed shuffle seed, for replayable sessions
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_game_type(s: &str) -> Result<GameType, String> {
    GameType::from_str(s).ok_or_else(|| format!("unknown game type `{s}`"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut adapter = Adapter::start_from_env()?;
    info!(addr = %adapter.local_addr(), "Puzzle host bridge listening");

    let difficulty = cli
        .difficulty
        .unwrap_or_else(|| cli.game_type.default_difficulty());
    let mut config = SessionConfig::new(cli.game_type, difficulty);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let seq = SeqCounter::new();
    // The real container arrives with the host's `load`.
    let session = GameSession::new(config, Size::new(800.0, 600.0))?
        .with_best_times(StoreConfig::from_env().open_cache())
        .with_recorder(ChannelRecorder::new(adapter.outbound(), seq.clone()));
    let mut bridge = HostBridge::new(session, seq);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let idle = Duration::from_millis(5);
    let mut last_tick = Instant::now();

    loop {
        while let Some(cmd) = adapter.try_recv() {
            for msg in bridge.handle(cmd) {
                adapter.send(msg);
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick += tick_duration;
            if let Some(obs) = bridge.tick(TICK_MS) {
                adapter.send(obs);
            }
        } else {
            std::thread::sleep((tick_duration - elapsed).min(idle));
        }
    }
}
