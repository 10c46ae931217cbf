use std::fmt::{Display, Formatter};
use std::time::Duration;
use thiserror::Error;

/// The two threads of a handoff run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Producer,
    Consumer,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Producer => write!(f, "producer"),
            Role::Consumer => write!(f, "consumer"),
        }
    }
}

#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("shared queue guard poisoned by a panicking thread")]
    Poisoned,

    #[error("consumer stalled: no work or completion signal after {waited:?}")]
    Stalled { waited: Duration },

    #[error("{role} thread panicked")]
    WorkerPanicked { role: Role },

    #[error("item conservation violated: produced {produced}, consumed {consumed}")]
    Conservation { produced: u64, consumed: u64 },

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed serializing run log: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl<G> From<std::sync::PoisonError<G>> for HandoffError {
    fn from(_: std::sync::PoisonError<G>) -> Self {
        HandoffError::Poisoned
    }
}

pub type HandoffResult<T> = std::result::Result<T, HandoffError>;
