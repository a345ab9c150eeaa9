//! Suggest command - Ask the strategy engine for the robot's next move

use anyhow::{Result, bail};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;

use crate::{
    cli::output::{print_kv, render_board},
    geometry::{BoardGeometry, WorldPoint},
    strategy::Strategy,
    tictactoe::{Board, CellIndex, Colors, PlayerColor},
};

#[derive(Parser, Debug)]
#[command(about = "Suggest the robot's next move for a board")]
pub struct SuggestArgs {
    /// Board as 9 cells, row-major (`.` empty, `X` dog, `O` cat; `/` and spaces ignored)
    #[arg(long, short = 'b')]
    pub board: String,

    /// Color the human plays (`dog` or `cat`)
    #[arg(long, default_value = "dog")]
    pub human: PlayerColor,

    /// Strategy: r (random), e (easy), h (hard), i (impossible)
    #[arg(long, short = 's', default_value = "i")]
    pub strategy: Strategy,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the suggestion as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Suggestion {
    strategy: Strategy,
    computer: PlayerColor,
    cell: CellIndex,
    target: WorldPoint,
}

pub fn execute(args: SuggestArgs) -> Result<()> {
    let board = Board::from_string(&args.board)?;
    if board.has_winner() {
        bail!("the game is already over: {:?}", board.winner());
    }

    let colors = Colors::with_human(args.human);
    let mut rng = StdRng::seed_from_u64(args.seed.unwrap_or_else(rand::random));
    let Some(cell) = args.strategy.choose(&board, colors, &mut rng) else {
        bail!("no empty cell left");
    };
    let target = BoardGeometry::default().cell_to_position(cell);

    if args.json {
        let suggestion = Suggestion {
            strategy: args.strategy,
            computer: colors.computer,
            cell,
            target,
        };
        println!("{}", serde_json::to_string_pretty(&suggestion)?);
        return Ok(());
    }

    print!("{}", render_board(&board, Some(cell)));
    println!();
    print_kv("Strategy", args.strategy.name());
    print_kv("Computer plays", colors.computer.name());
    print_kv("Cell", &cell.to_string());
    print_kv("Target", &format!("x={:.1} z={:.1}", target.x, target.z));
    Ok(())
}
