//! Request State: per-pipeline `Idle → Loading → {Succeeded, Failed}` tracking.
//!
//! Every invocation is issued a generation number. A completion only lands
//! if its generation is still the latest one, so an older response that
//! resolves late can never overwrite a newer request. Both the check and the
//! write happen inside a single `watch` update.

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum RequestState<T> {
    #[default]
    Idle,
    Loading,
    Succeeded(T),
    Failed(String),
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            RequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// What observers see: the state plus the generation that produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateSnapshot<T> {
    pub generation: u64,
    pub state: RequestState<T>,
}

/// Identifies one invocation. Returned by [`StateMachine::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Observable request state for one pipeline instance.
#[derive(Debug)]
pub struct StateMachine<T> {
    tx: watch::Sender<StateSnapshot<T>>,
}

impl<T: Clone> Default for StateMachine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> StateMachine<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StateSnapshot {
            generation: 0,
            state: RequestState::Idle,
        });
        Self { tx }
    }

    pub fn current(&self) -> RequestState<T> {
        self.tx.borrow().state.clone()
    }

    pub fn snapshot(&self) -> StateSnapshot<T> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StateSnapshot<T>> {
        self.tx.subscribe()
    }

    /// Starts a new invocation: bumps the generation and enters `Loading`,
    /// dropping any previous result or error in the same update.
    pub fn begin(&self) -> Ticket {
        let mut generation = 0;
        self.tx.send_modify(|snapshot| {
            snapshot.generation += 1;
            snapshot.state = RequestState::Loading;
            generation = snapshot.generation;
        });
        Ticket(generation)
    }

    /// Starts and immediately fails an invocation. Used for validation errors
    /// so that any in-flight request is superseded too.
    pub fn reject(&self, message: String) -> Ticket {
        let mut generation = 0;
        self.tx.send_modify(|snapshot| {
            snapshot.generation += 1;
            snapshot.state = RequestState::Failed(message);
            generation = snapshot.generation;
        });
        Ticket(generation)
    }

    /// Lands a result for `ticket`. Returns `false` (and changes nothing) if a
    /// newer invocation has started since.
    pub fn finish(&self, ticket: Ticket, outcome: Result<T, String>) -> bool {
        let applied = self.tx.send_if_modified(|snapshot| {
            if snapshot.generation != ticket.0 {
                return false;
            }
            snapshot.state = match outcome {
                Ok(result) => RequestState::Succeeded(result),
                Err(message) => RequestState::Failed(message),
            };
            true
        });

        if !applied {
            debug!(
                "Discarding stale response for generation {}",
                ticket.generation()
            );
        }
        applied
    }

    /// Turns `Failed` into `Idle`. Loading and succeeded states are untouched.
    pub fn clear_error(&self) {
        self.tx.send_if_modified(|snapshot| {
            if matches!(snapshot.state, RequestState::Failed(_)) {
                snapshot.state = RequestState::Idle;
                true
            } else {
                false
            }
        });
    }
}
