//! Headless simulator (default binary).
//!
//! Plays a seeded game with a random policy and prints one line per locked
//! piece, then a summary. `--json` prints the final board snapshot instead.

use anyhow::Result;
use log::info;

use columns::logging::{init_log, level_from_env};
use columns::sim::{parse_sim_args, run_sim};

#[tokio::main]
async fn main() -> Result<()> {
    init_log(level_from_env())?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_sim_args(&args)?;
    info!(
        "simulating up to {} pieces on {}x{} with seed {}",
        config.pieces, config.board.rows, config.board.columns, config.seed
    );

    let quiet = config.json;
    let report = run_sim(&config, |lock| {
        if !quiet {
            println!(
                "piece {:>4}  column {:>2}  cleared {:>3}  score {:>5}",
                lock.piece, lock.column, lock.cleared, lock.score
            );
        }
    })
    .await?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report.snapshot)?);
    } else {
        println!(
            "{} after {} pieces: score {}, {} cells cleared",
            if report.game_over { "game over" } else { "stopped" },
            report.pieces_locked,
            report.score,
            report.cells_cleared
        );
    }
    Ok(())
}
