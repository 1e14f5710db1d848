//! Gopher Run headless driver
//!
//! Runs a session without a window: a scripted autopilot supplies the jump
//! edges, events are logged, and the final scene can be dumped as JSON for a
//! renderer or a test fixture.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gopher_run::sim::{GameEvent, GameState, Mode, Scene, TickInput, TickOutcome, tick};
use gopher_run::Settings;

#[derive(Debug, Parser)]
#[command(name = "gopher-run", about = "Run the endless-runner simulation headless")]
struct Args {
    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,
    /// JSON settings file (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Press jump every N frames (0 disables the autopilot)
    #[arg(long, default_value_t = 45)]
    jump_every: u64,
    /// Frames to hold each jump before releasing
    #[arg(long, default_value_t = 6)]
    hold: u64,
    /// Request a cancel on this frame
    #[arg(long)]
    abort_at: Option<u64>,
    /// Print the final scene as JSON
    #[arg(long)]
    scene: bool,
}

impl Args {
    /// Input edges for `frame` (1-based)
    fn input_for(&self, frame: u64) -> TickInput {
        if self.abort_at == Some(frame) {
            return TickInput::cancel();
        }
        if self.jump_every == 0 {
            return TickInput::default();
        }
        match frame % self.jump_every {
            0 => TickInput::press(),
            n if n == self.hold.min(self.jump_every - 1) => TickInput::release(),
            _ => TickInput::default(),
        }
    }
}

#[derive(Debug, Default)]
struct Summary {
    frames: u64,
    runs: u32,
    jumps: u32,
    wall_hits: u32,
    game_overs: u32,
    columns: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Settings::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => Settings::default(),
    };

    log::info!("Gopher Run (headless) starting...");
    let mut state = GameState::new(settings).context("invalid settings")?;
    let mut summary = Summary::default();

    for frame in 1..=args.frames {
        let input = args.input_for(frame);
        let events = match tick(&mut state, &input) {
            TickOutcome::Advanced(events) => events,
            TickOutcome::Aborted => {
                log::info!("Session aborted");
                break;
            }
        };
        summary.frames += 1;

        for event in events {
            match event {
                GameEvent::Jump => {
                    summary.jumps += 1;
                    log::debug!("Jump cue at frame {}", state.frame);
                }
                GameEvent::WallHit => summary.wall_hits += 1,
                GameEvent::Landed => {}
                GameEvent::ModeChanged { to, .. } => match to {
                    Mode::Playing => summary.runs += 1,
                    Mode::GameOver => summary.game_overs += 1,
                    Mode::Title => {}
                },
            }
        }
    }
    summary.columns = state.map.columns_shifted();

    println!(
        "frames={} runs={} jumps={} wall_hits={} game_overs={} columns={} mode={:?}",
        summary.frames,
        summary.runs,
        summary.jumps,
        summary.wall_hits,
        summary.game_overs,
        summary.columns,
        state.mode
    );

    if args.scene {
        let scene = Scene::capture(&state);
        println!("{}", serde_json::to_string_pretty(&scene)?);
    }

    Ok(())
}
