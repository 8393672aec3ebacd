// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playsheet headless player.
//!
//! Loads a settings file, synthesizes actors from the scene it names and
//! runs them frame by frame:
//! - Scripted pointer, collision, click and custom events
//! - Host requests (sounds, scene switches, spawns, destroys) serviced per frame
//! - Optional hot reload of sheets and edit scripts from a watched directory
//!
//! ## Usage
//!
//! ```text
//! playsheet play.ron --frames 600 --watch sheets/
//! ```

use clap::Parser;
use playsheet_player::settings::DEFAULT_LOG_FILTER;
use playsheet_player::{HotReloader, Player, PlayerError, PlayerSettings};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Run a Playsheet scene headless
#[derive(Debug, Parser)]
#[command(name = "playsheet", version, about)]
struct Cli {
    /// Player settings file (RON)
    settings: PathBuf,

    /// Frames to run, overriding the settings file
    #[arg(long)]
    frames: Option<u64>,

    /// Directory to watch for `*.sheet.json`, `*.sheet.ron` and `*.edits.json`
    #[arg(long)]
    watch: Option<PathBuf>,

    /// Print the final actor list as JSON
    #[arg(long)]
    export: bool,
}

fn init_tracing(directives: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives.unwrap_or(DEFAULT_LOG_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn run(cli: Cli, mut settings: PlayerSettings) -> Result<(), PlayerError> {
    if let Some(frames) = cli.frames {
        settings.frames = frames;
    }
    if let Some(dir) = cli.watch {
        settings.watch_dir = Some(dir);
    }

    let mut player = Player::from_settings(&settings)?;

    match &settings.watch_dir {
        Some(dir) => {
            let mut reloader = HotReloader::watch(dir)?;
            player.run_watched(settings.frames, &mut reloader);
            let stats = reloader.stats();
            tracing::info!(
                reloaded = stats.total_reloaded,
                failed = stats.failed,
                "Hot reload summary"
            );
        }
        None => player.run(settings.frames),
    }

    let log = player.log();
    tracing::info!(
        frames = player.frame_count(),
        elapsed = player.elapsed_time(),
        actors = player.interpreter().actor_ids().count(),
        beeps = log.beeps,
        spawned = log.spawned.len(),
        destroyed = log.destroyed.len(),
        scene_switches = ?log.scene_switches,
        "Play finished"
    );

    if cli.export {
        let summaries = player.interpreter().export_actor_list();
        match serde_json::to_string_pretty(&summaries) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!("Failed to export actor list: {e}"),
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let settings = PlayerSettings::load(&cli.settings);

    let directives = settings
        .as_ref()
        .ok()
        .and_then(|s| s.log_filter.as_deref());
    init_tracing(directives);

    tracing::info!("Starting Playsheet player v{}", env!("CARGO_PKG_VERSION"));

    let result = settings.and_then(|settings| run(cli, settings));
    if let Err(e) = result {
        tracing::error!("Player failed: {e}");
        std::process::exit(1);
    }
}
