//! Board notifications
//!
//! Every observable mutation publishes a [`BoardEvent`]. All variants mean
//! "state changed, redraw"; the payloads are there for renderers that want to
//! pace a clear animation or show counters, and can be ignored.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

/// What changed on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardEvent {
    /// A new active/next pair is in place (game start or after a lock)
    Spawned,
    /// The falling piece was committed to storage
    PieceLocked,
    /// A clear pass found `cells` matched cells (score already updated)
    Matched { cells: usize },
    /// One half of a clear pulse; `hidden` tells whether matched cells are transparent
    ClearPulse { step: u8, hidden: bool },
    /// Matched cells were removed
    Cleared { cells: usize },
    /// Gravity settling finished
    Settled,
    /// The game was stopped by the caller
    Stopped,
    /// A locked piece could not fit below the top; no further moves are accepted
    GameOver,
}

/// Receiver of board notifications
///
/// Implementations must be cheap; they run on the board's task between steps.
pub trait BoardObserver: Send + Sync {
    fn notify(&self, event: BoardEvent);
}

impl<F> BoardObserver for F
where
    F: Fn(BoardEvent) + Send + Sync,
{
    fn notify(&self, event: BoardEvent) {
        self(event)
    }
}

impl BoardObserver for mpsc::UnboundedSender<BoardEvent> {
    fn notify(&self, event: BoardEvent) {
        // A dropped receiver just means nobody is drawing any more.
        let _ = self.send(event);
    }
}

/// Fan-out list of observers
#[derive(Default, Clone)]
pub struct Observers {
    list: Vec<Arc<dyn BoardObserver>>,
}

impl Observers {
    pub fn push(&mut self, observer: Arc<dyn BoardObserver>) {
        self.list.push(observer);
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn emit(&self, event: BoardEvent) {
        for observer in &self.list {
            observer.notify(event);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.list.len())
            .finish()
    }
}
