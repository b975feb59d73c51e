//! Session runtime - owns a board on a tokio task.
//!
//! Bridges callers (input handlers, timers, renderers) with the board. Commands
//! are queued on a bounded channel and applied strictly in order; a `MoveDown`
//! runs its whole clear/fall cycle before the next command is read. Events go
//! out on an unbounded channel and the cell map can be read at any time through
//! [`SessionHandle::cells`].

use std::env;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::{debug, info};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::core::{Board, BoardConfig, BoardEvent, BoardSnapshot, CellsView, ConfigError, Phase};
use crate::timing::{speed_for_score, tick_interval};
use crate::types::GameAction;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub board: BoardConfig,
    /// Speed at score 0
    pub start_speed: u32,
    /// Fixed color seed; `None` seeds from the clock
    pub seed: Option<u32>,
    /// Issue `MoveDown` on a timer while playing
    pub auto_tick: bool,
    pub max_pending_commands: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            start_speed: 0,
            seed: None,
            auto_tick: true,
            max_pending_commands: 32,
        }
    }
}

impl SessionConfig {
    /// Create from environment variables
    ///
    /// Board settings come from [`BoardConfig::from_env`]; on top of those:
    /// `COLUMNS_START_SPEED`, `COLUMNS_SEED`, `COLUMNS_AUTO_TICK`,
    /// `COLUMNS_MAX_PENDING`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let start_speed = env::var("COLUMNS_START_SPEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.start_speed);
        let seed = env::var("COLUMNS_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok());
        let auto_tick = env::var("COLUMNS_AUTO_TICK")
            .map(|v| !(v == "0" || v.to_lowercase() == "false"))
            .unwrap_or(defaults.auto_tick);
        let max_pending_commands = env::var("COLUMNS_MAX_PENDING")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_pending_commands);

        Self {
            board: BoardConfig::from_env(),
            start_speed,
            seed,
            auto_tick,
            max_pending_commands,
        }
    }
}

/// Command delivered to the session task.
#[derive(Debug)]
pub enum SessionCommand {
    Action(GameAction),
    SetShowAnimation(bool),
    Snapshot(oneshot::Sender<BoardSnapshot>),
    Shutdown,
}

/// Outbound notification from the session task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Forwarded board notification
    Board(BoardEvent),
    /// The falling piece moved or rotated
    PieceMoved,
    /// Speed changed after scoring (or after a restart)
    SpeedChanged(u32),
    /// `MoveDown` reported game over
    GameOver { score: u32 },
    /// The game was paused or resumed
    PauseChanged { paused: bool },
}

/// Entry point for spawning sessions.
pub struct Session;

impl Session {
    /// Validate the board config and start the session task.
    ///
    /// Must be called from within a tokio runtime. The board starts in
    /// [`Phase::NotStarted`]; send [`GameAction::Start`] to begin.
    pub fn spawn(config: SessionConfig) -> Result<SessionHandle, ConfigError> {
        let mut board = match config.seed {
            Some(seed) => Board::with_seed(config.board.clone(), seed)?,
            None => Board::new(config.board.clone())?,
        };

        let (cmd_tx, cmd_rx) = mpsc::channel(config.max_pending_commands.max(1));
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let forward = event_tx.clone();
        board.subscribe(Arc::new(move |event: BoardEvent| {
            let _ = forward.send(SessionEvent::Board(event));
        }));

        let cells = board.cells();
        let driver = Driver {
            board,
            event_tx,
            start_speed: config.start_speed,
            auto_tick: config.auto_tick,
            paused: false,
        };
        let task = tokio::spawn(driver.run(cmd_rx));
        info!(
            "session started (start speed {}, auto tick {})",
            config.start_speed, config.auto_tick
        );

        Ok(SessionHandle {
            cmd_tx,
            events: event_rx,
            cells,
            task,
        })
    }
}

/// Caller side of a running session.
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<SessionCommand>,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    cells: CellsView,
    task: JoinHandle<Board>,
}

impl SessionHandle {
    async fn command(&self, cmd: SessionCommand) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| anyhow!("session task has stopped"))
    }

    /// Queue an action, waiting for room in the command channel
    pub async fn send(&self, action: GameAction) -> Result<()> {
        self.command(SessionCommand::Action(action)).await
    }

    /// Queue an action without waiting; fails when the queue is full or closed
    pub fn try_send(&self, action: GameAction) -> Result<()> {
        self.cmd_tx
            .try_send(SessionCommand::Action(action))
            .map_err(|e| anyhow!("could not queue {}: {}", action.as_str(), e))
    }

    pub async fn set_show_animation(&self, show: bool) -> Result<()> {
        self.command(SessionCommand::SetShowAnimation(show)).await
    }

    /// Board state after every previously queued command has been applied
    pub async fn snapshot(&self) -> Result<BoardSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.command(SessionCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| anyhow!("session task dropped the snapshot request"))
    }

    /// Live read handle on the settled cells
    pub fn cells(&self) -> CellsView {
        self.cells.clone()
    }

    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        self.events.try_recv().ok()
    }

    /// Stop the task after pending commands and hand the board back
    pub async fn shutdown(self) -> Result<Board> {
        // A closed channel means the task already finished; join it anyway.
        let _ = self.cmd_tx.send(SessionCommand::Shutdown).await;
        let board = self.task.await?;
        info!("session shut down with score {}", board.score());
        Ok(board)
    }
}

struct Driver {
    board: Board,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    start_speed: u32,
    auto_tick: bool,
    /// Only meaningful while the board is playing
    paused: bool,
}

fn ticker(speed: u32) -> Interval {
    let period = tick_interval(speed);
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

impl Driver {
    fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }

    async fn run(mut self, mut cmd_rx: mpsc::Receiver<SessionCommand>) -> Board {
        let mut speed = speed_for_score(self.start_speed, self.board.score());
        let mut ticks = ticker(speed);

        loop {
            let ticking = self.auto_tick && self.playing();

            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    None | Some(SessionCommand::Shutdown) => break,
                    Some(SessionCommand::Action(action)) => {
                        let resuming = action == GameAction::Resume && self.paused;
                        if action == GameAction::Start {
                            ticks = ticker(speed_for_score(self.start_speed, 0));
                        }
                        self.apply(action).await;
                        if resuming {
                            ticks = ticker(speed);
                        }
                    }
                    Some(SessionCommand::SetShowAnimation(show)) => {
                        self.board.set_show_animation(show);
                    }
                    Some(SessionCommand::Snapshot(reply)) => {
                        let _ = reply.send(self.board.snapshot());
                    }
                },
                _ = ticks.tick(), if ticking => {
                    self.apply(GameAction::MoveDown).await;
                }
            }

            let current = speed_for_score(self.start_speed, self.board.score());
            if current != speed {
                debug!("speed {} -> {}", speed, current);
                speed = current;
                ticks = ticker(speed);
                self.emit(SessionEvent::SpeedChanged(speed));
            }
        }

        self.board
    }

    fn playing(&self) -> bool {
        self.board.phase() == Phase::Playing && !self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        if self.board.phase() != Phase::Playing || self.paused == paused {
            return;
        }
        self.paused = paused;
        debug!("session {}", if paused { "paused" } else { "resumed" });
        self.emit(SessionEvent::PauseChanged { paused });
    }

    async fn apply(&mut self, action: GameAction) {
        let is_move = matches!(
            action,
            GameAction::MoveLeft
                | GameAction::MoveRight
                | GameAction::Rotate
                | GameAction::MoveDown
        );
        if is_move && self.paused {
            return;
        }

        match action {
            GameAction::MoveLeft => {
                if self.board.move_left() {
                    self.emit(SessionEvent::PieceMoved);
                }
            }
            GameAction::MoveRight => {
                if self.board.move_right() {
                    self.emit(SessionEvent::PieceMoved);
                }
            }
            GameAction::Rotate => {
                if self.board.active_piece().is_some() {
                    self.board.rotate_item();
                    self.emit(SessionEvent::PieceMoved);
                }
            }
            GameAction::MoveDown => {
                let had_piece = self.board.active_piece();
                if !self.board.move_down().await {
                    self.emit(SessionEvent::GameOver {
                        score: self.board.score(),
                    });
                } else if had_piece.is_some() && self.board.active_piece() != had_piece {
                    self.emit(SessionEvent::PieceMoved);
                }
            }
            GameAction::Start => {
                self.paused = false;
                self.board.start_game();
            }
            GameAction::Stop => {
                self.paused = false;
                self.board.stop_game();
            }
            GameAction::Pause => self.set_paused(true),
            GameAction::Resume => self.set_paused(false),
        }
    }
}
