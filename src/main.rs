use anyhow::{Context, Result};
use clap::Parser;
use slider_solver::{Board, DEFAULT_MAX_NODES, Solver};
use std::time::Duration;

/// Find a shortest solution for a sliding-tile puzzle
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File containing the initial board: the dimension n on the first line,
    /// then n rows of n tile values, 0 being the blank
    file: String,
    /// Max search nodes to expand before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_NODES, value_name = "NUM")]
    max_nodes: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let content = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read '{}'", cli.file))?;
    let board = Board::parse(&content)?;
    let solver = Solver::with_limit(board, cli.max_nodes)?;

    match solver.solution() {
        None => println!("No solution possible"),
        Some(solution) => {
            println!("Minimum number of moves = {}", solver.moves());
            for board in solution {
                println!("{board}");
            }
        }
    }
    println!(
        "States: {}, Elapsed: {}",
        solver.states(),
        format_elapsed(solver.elapsed())
    );

    Ok(())
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 90 {
        let ms = elapsed.subsec_millis();
        format!("{secs}.{ms:03}s")
    } else {
        let minutes = secs / 60;
        let secs = secs % 60;
        format!("{minutes}m {secs}s")
    }
}
