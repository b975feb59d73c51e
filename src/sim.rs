//! Headless simulator - plays seeded random games without a renderer.
//!
//! Useful for smoke-testing rules changes and for profiling the clear/fall
//! loop on large boards.

use anyhow::{anyhow, Result};
use log::debug;

use crate::core::{Board, BoardConfig, BoardEvent, BoardSnapshot, SimpleRng};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub seed: u32,
    /// Stop after this many locked pieces even if the game is not over
    pub pieces: usize,
    pub board: BoardConfig,
    pub json: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            pieces: 500,
            board: BoardConfig {
                show_animation: false,
                ..BoardConfig::default()
            },
            json: false,
        }
    }
}

/// One line of progress, reported after every lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockReport {
    pub piece: usize,
    pub column: i32,
    pub cleared: usize,
    pub score: u32,
}

#[derive(Debug, Clone)]
pub struct SimReport {
    pub pieces_locked: usize,
    pub cells_cleared: usize,
    pub score: u32,
    pub game_over: bool,
    pub snapshot: BoardSnapshot,
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T> {
    let v = args
        .get(i)
        .ok_or_else(|| anyhow!("sim: missing value for {}", flag))?;
    v.parse::<T>()
        .map_err(|_| anyhow!("sim: invalid {} value: {}", flag, v))
}

/// Parse `[--seed N] [--pieces N] [--rows N] [--columns N] [--colors N] [--animate] [--json]`
pub fn parse_sim_args(args: &[String]) -> Result<SimConfig> {
    let mut config = SimConfig::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                config.seed = parse_value(args, i, "--seed")?;
            }
            "--pieces" => {
                i += 1;
                config.pieces = parse_value(args, i, "--pieces")?;
            }
            "--rows" => {
                i += 1;
                config.board.rows = parse_value(args, i, "--rows")?;
            }
            "--columns" => {
                i += 1;
                config.board.columns = parse_value(args, i, "--columns")?;
            }
            "--colors" => {
                i += 1;
                config.board.colors = parse_value(args, i, "--colors")?;
            }
            "--animate" => config.board.show_animation = true,
            "--json" => config.json = true,
            other => {
                return Err(anyhow!("sim: unknown argument: {}", other));
            }
        }
        i += 1;
    }
    config.board.validate()?;
    Ok(config)
}

/// Play one game with a random policy: shift, rotate, then drop until locked.
pub async fn run_sim(config: &SimConfig, mut on_lock: impl FnMut(LockReport)) -> Result<SimReport> {
    let mut board = Board::with_seed(config.board.clone(), config.seed)?;
    let mut events = board.subscribe_channel();
    let mut policy = SimpleRng::new(config.seed.wrapping_mul(31).wrapping_add(17));

    board.start_game();

    let mut pieces_locked = 0usize;
    let mut cells_cleared = 0usize;
    let mut game_over = false;

    'game: while pieces_locked < config.pieces {
        let columns = board.columns() as u32;
        let target = policy.next_range(columns) as i32;
        for _ in 0..policy.next_range(3) {
            board.rotate_item();
        }
        while let Some(piece) = board.active_piece() {
            let moved = match piece.column.cmp(&target) {
                std::cmp::Ordering::Less => board.move_right(),
                std::cmp::Ordering::Greater => board.move_left(),
                std::cmp::Ordering::Equal => false,
            };
            if !moved {
                break;
            }
        }
        let column = board.active_piece().map(|p| p.column).unwrap_or(target);

        let mut cleared = 0usize;
        loop {
            if !board.move_down().await {
                game_over = true;
                break 'game;
            }
            let mut locked = false;
            while let Ok(event) = events.try_recv() {
                match event {
                    BoardEvent::PieceLocked => locked = true,
                    BoardEvent::Cleared { cells } => cleared += cells,
                    _ => {}
                }
            }
            if locked {
                break;
            }
        }

        pieces_locked += 1;
        cells_cleared += cleared;
        debug!("piece {} locked in column {}", pieces_locked, column);
        on_lock(LockReport {
            piece: pieces_locked,
            column,
            cleared,
            score: board.score(),
        });
    }

    Ok(SimReport {
        pieces_locked,
        cells_cleared,
        score: board.score(),
        game_over,
        snapshot: board.snapshot(),
    })
}
