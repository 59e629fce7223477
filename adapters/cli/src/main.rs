#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Scavenger in the terminal.

mod config;
mod input;
mod layout_transfer;
mod presentation;
mod session;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use scavenger_rendering::InputSource;
use scavenger_system_layout::LevelBuilder;

use crate::{
    config::GameConfig,
    input::{Autopilot, ScriptedInput},
    layout_transfer::LayoutCode,
    presentation::{LogAudio, TextRenderer},
    session::Session,
};

/// Turn-based dungeon crawl played on the terminal.
#[derive(Debug, Parser)]
#[command(name = "scavenger", version)]
struct Args {
    /// TOML file overriding the default tuning.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Session seed from which every level layout is derived.
    #[arg(long)]
    seed: Option<u64>,

    /// Level the session starts on.
    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Moves to replay, written as N, E, S and W.
    #[arg(long, conflicts_with = "autopilot")]
    script: Option<String>,

    /// Let a seeded autopilot walk toward each exit.
    #[arg(long)]
    autopilot: bool,

    /// Number of frames to simulate before quitting.
    #[arg(long, default_value_t = 2_000)]
    frames: u32,

    /// Simulated duration of one frame in milliseconds.
    #[arg(long, default_value_t = 50)]
    frame_ms: u64,

    /// Layout code to play instead of generating the first level.
    #[arg(long)]
    import_layout: Option<String>,

    /// Print the layout code of the first level and exit.
    #[arg(long)]
    export_layout: bool,
}

/// Entry point for the Scavenger command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    if args.export_layout {
        let layout = LevelBuilder::new(config.level_plan()).build(args.level)?;
        println!("{}", LayoutCode::new(layout).encode()?);
        return Ok(());
    }

    let input: Box<dyn InputSource> = if args.autopilot {
        Box::new(Autopilot::new(config.seed))
    } else {
        let script = args.script.as_deref().unwrap_or_default();
        Box::new(ScriptedInput::parse(script)?)
    };
    let mut session = Session::new(
        &config,
        Duration::from_millis(args.frame_ms),
        Box::new(TextRenderer::new(io::stdout())),
        Box::new(LogAudio::new(config.seed)),
        input,
    );

    if let Some(code) = &args.import_layout {
        let layout = LayoutCode::decode(code).context("failed to import layout code")?;
        session.queue_layout(layout.into_layout());
    }

    session.start(args.level)?;
    for frame in 0..args.frames {
        session.frame()?;
        if session.is_over() {
            info!("session ended after {frame} frames");
            break;
        }
    }
    Ok(())
}
