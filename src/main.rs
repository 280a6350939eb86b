//! T-Rex Runner entry point
//!
//! Runs the game headless at a fixed 60 Hz with the scripted player at the
//! controls, recording draw calls instead of presenting them.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use trex_runner::audio::LogSink;
use trex_runner::consts::SIM_DT;
use trex_runner::persistence::{SaveStore, format_age, now_millis};
use trex_runner::renderer::DrawList;
use trex_runner::sim::{Autopilot, GamePhase};
use trex_runner::{Flow, Game, Settings};

#[derive(Parser, Debug)]
#[command(name = "trex-runner")]
#[command(about = "Headless T-Rex runner driven by a scripted player")]
struct Cli {
    /// Seed for obstacle, cloud and star placement
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Number of 60 Hz frames to simulate
    #[arg(long, default_value_t = 3_600)]
    frames: u64,
    /// Directory holding the high score save file
    #[arg(long, default_value = ".")]
    save_dir: PathBuf,
    /// Settings JSON file (defaults are used when missing)
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("T-Rex Runner (headless) starting...");

    fs::create_dir_all(&cli.save_dir)
        .with_context(|| format!("creating save directory {}", cli.save_dir.display()))?;
    let settings = cli
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    let config = settings.render_config();

    let mut game = Game::new(cli.seed, &settings, SaveStore::in_dir(&cli.save_dir), LogSink);
    let mut pilot = Autopilot::new();
    let mut canvas = DrawList::new();

    let mut runs = 0u32;
    let mut best = 0;
    let mut last_phase = game.world().phase;
    for _ in 0..cli.frames {
        let input = pilot.next_input(game.world(), game.entities());
        if game.update(input, SIM_DT) == Flow::Exit {
            break;
        }
        canvas.clear_commands();
        game.draw(&mut canvas, &config);

        let phase = game.world().phase;
        if phase == GamePhase::GameOver && last_phase != GamePhase::GameOver {
            runs += 1;
            let score = game.world().score.display_score();
            best = best.max(score);
            log::info!("Run {runs} ended at {score}");
        }
        last_phase = phase;
    }

    // Remember the display mode the session ended in
    if let Some(path) = &cli.settings {
        let settings = Settings {
            display_mode: game.display_mode(),
            ..settings
        };
        settings
            .save(path)
            .with_context(|| format!("writing settings to {}", path.display()))?;
    }

    let world = game.world();
    let save = game.save_state();
    println!("seed:            {}", cli.seed);
    println!("frames:          {}", game.frames());
    println!("finished runs:   {runs}");
    println!("best run:        {best}");
    println!("current score:   {}", world.score.display_score());
    println!("nights:          {}", world.sky.cycle().night_count());
    println!("entities:        {}", game.entities().len());
    println!("draw calls:      {}", canvas.len());
    println!(
        "high score:      {} ({})",
        save.high_score,
        format_age(save.high_score_date, now_millis())
    );
    Ok(())
}
