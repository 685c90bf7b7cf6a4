mod autopilot;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use prost::Message;

use autopilot::Autopilot;
use xonix_server::game::traits::Game;
use xonix_server::games::xonix::{XonixConfig, XonixEvent, XonixGame};
use xonix_server::protocol::xonix::XonixSnapshot;

#[derive(Parser, Debug)]
#[command(name = "xonix-server")]
#[command(about = "Headless territory-capture simulation driven by a scripted player")]
#[command(version)]
struct Cli {
    /// RON config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for enemy placement and power-ups
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Stop after this many ticks
    #[arg(long, default_value = "36000")]
    max_ticks: u64,

    /// Pace ticks at the configured tick rate instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Log a decoded snapshot every N ticks (0 disables)
    #[arg(long, default_value = "600")]
    snapshot_every: u64,

    /// Cells the autopilot descends before turning
    #[arg(long, default_value = "8")]
    depth: u32,

    /// Cells the autopilot crosses before heading back
    #[arg(long, default_value = "6")]
    width: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("xonix_server=debug".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => XonixConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => XonixConfig::default(),
    };

    let mut game = XonixGame::with_config(config, cli.seed).context("creating game")?;
    let mut pilot = Autopilot::new(cli.depth, cli.width);
    let mut interval = tokio::time::interval(game.tick_rate());
    tracing::info!(
        "Simulation started: seed {}, {} Hz, {} lives",
        cli.seed,
        game.config().tick_rate_hz,
        game.lives()
    );

    while game.current_tick() < cli.max_ticks && !game.is_game_over() {
        if cli.realtime {
            interval.tick().await;
        }

        if !game.in_cooldown() {
            game.set_direction(pilot.steer(&game));
        }

        let result = game.tick();
        for event in &result.events {
            match event {
                XonixEvent::Death { .. } => pilot.restart(),
                XonixEvent::LevelComplete { .. } => {
                    game.next_level()?;
                    pilot.restart();
                }
                _ => {}
            }
        }

        if cli.snapshot_every > 0 && game.current_tick() % cli.snapshot_every == 0 {
            log_snapshot(&game.encode_state())?;
        }
    }

    tracing::info!(
        "Simulation finished after {} ticks: level {}, score {}, {} lives left",
        game.current_tick(),
        game.level(),
        game.score(),
        game.lives()
    );
    Ok(())
}

fn log_snapshot(bytes: &[u8]) -> anyhow::Result<()> {
    let snapshot = XonixSnapshot::decode(bytes).context("decoding snapshot")?;
    tracing::info!(
        "Tick {}: level {}, fill {:.1}% of {:.0}%, score {}, {} enemies, {} power-ups ({} bytes)",
        snapshot.tick,
        snapshot.level,
        snapshot.fill_fraction * 100.0,
        snapshot.fill_required * 100.0,
        snapshot.score,
        snapshot.enemies.len(),
        snapshot.power_ups.len(),
        bytes.len()
    );
    Ok(())
}
