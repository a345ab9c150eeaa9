//! Replay command - Run the game loop against recorded perception frames

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::{RecordingMotion, ScriptedPerception, StabilizedPerception},
    app::{GameConfig, GameController, GameReport},
    cli::output::{print_kv, print_section, render_board},
    error::Error,
    ports::PerceptionSource,
    strategy::Strategy,
};

#[derive(Parser, Debug)]
#[command(about = "Replay a recorded game through the game loop")]
pub struct ReplayArgs {
    /// JSON file holding an array of perception frames
    #[arg(long, short = 'f')]
    pub frames: PathBuf,

    /// TOML configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Override the configured strategy
    #[arg(long, short = 's')]
    pub strategy: Option<Strategy>,

    /// Override the configured random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pass frames through the hand gate and consistency filter
    #[arg(long)]
    pub stabilize: bool,

    /// Simulated steps each motion command takes
    #[arg(long, default_value_t = 1)]
    pub steps_per_command: usize,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ReplayArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(strategy) = args.strategy {
        config = config.with_strategy(strategy);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let frames = ScriptedPerception::from_path(&args.frames)?;
    let motion = RecordingMotion::new(args.steps_per_command);

    if args.stabilize {
        let stabilized = StabilizedPerception::new(
            frames,
            config.perception.hand_hold(),
            config.perception.consistency_frames,
        );
        run(stabilized, motion, config, args.json)
    } else {
        run(frames, motion, config, args.json)
    }
}

fn run<P: PerceptionSource>(
    perception: P,
    motion: RecordingMotion,
    config: GameConfig,
    json: bool,
) -> Result<()> {
    let mut controller = GameController::new(perception, motion, config);
    let report = match controller.play_game() {
        Ok(report) => report,
        Err(Error::PerceptionExhausted) => {
            eprintln!("Recorded frames ran out before the game finished.");
            let session = controller.session();
            print!("{}", render_board(session.board(), None));
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, controller.motion());
    }
    Ok(())
}

fn print_report(report: &GameReport, motion: &RecordingMotion) {
    print_section("Replay finished");
    print!("{}", render_board(&report.board, None));
    println!();
    let outcome = report.outcome.map_or("unfinished", |o| o.message());
    print_kv("Outcome", outcome);
    print_kv("Moves", &report.history.len().to_string());
    print_kv("Accepted frames", &report.stats.accepted.to_string());
    print_kv("Ambiguous frames", &report.stats.ambiguous.to_string());
    print_kv(
        "Ignored changes",
        &(report.stats.ignored_wrong_color + report.stats.ignored_occupied_cell).to_string(),
    );
    print_kv("Unfixed mismatches", &report.unresolved_mismatches.to_string());
    print_kv("Motion commands", &motion.commands().len().to_string());
}
