//! Session runtime - drives a board from an async task
//!
//! The rules engine in `columns-core` is a plain state machine. This crate
//! gives it a home for interactive use:
//!
//! 1. **Ownership**: one tokio task owns the [`Board`](columns_core::Board)
//! 2. **Ordering**: commands arrive on a bounded channel and are applied one
//!    at a time; a `MoveDown` finishes its clear/fall cycle (including any
//!    pulse delays) before the next command is read
//! 3. **Ticking**: while playing, the task issues `MoveDown` on a timer whose
//!    interval shrinks as the score grows (see [`timing`]); `Pause` suspends
//!    the timer and move commands until `Resume`
//! 4. **Observation**: board notifications, piece moves, speed changes and
//!    game over are published as [`SessionEvent`]s; renderers may also read
//!    the cell map directly through a shared view
//!
//! # Environment Variables
//!
//! - `COLUMNS_ROWS`, `COLUMNS_COLUMNS`, `COLUMNS_COLORS`: board dimensions
//! - `COLUMNS_ANIMATION`, `COLUMNS_PULSE_MS`: clear pulse settings
//! - `COLUMNS_START_SPEED`: speed at score 0 (default 0)
//! - `COLUMNS_SEED`: fixed color seed
//! - `COLUMNS_AUTO_TICK`: set to "0" or "false" to drive `MoveDown` manually
//! - `COLUMNS_MAX_PENDING`: command queue capacity (default 32)
//!
//! # Example
//!
//! ```
//! use columns_runtime::{Session, SessionConfig};
//! use columns_runtime::types::GameAction;
//!
//! # tokio_test::block_on(async {
//! let mut config = SessionConfig::default();
//! config.auto_tick = false;
//! config.seed = Some(7);
//!
//! let handle = Session::spawn(config).unwrap();
//! handle.send(GameAction::Start).await.unwrap();
//! handle.send(GameAction::MoveDown).await.unwrap();
//!
//! let snap = handle.snapshot().await.unwrap();
//! assert_eq!(snap.active.unwrap().row, 11);
//! handle.shutdown().await.unwrap();
//! # });
//! ```

pub mod session;
pub mod timing;

pub use columns_core as core;
pub use columns_types as types;

pub use session::{Session, SessionCommand, SessionConfig, SessionEvent, SessionHandle};
