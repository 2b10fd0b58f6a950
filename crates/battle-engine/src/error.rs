//! Errors raised by the kernel.
//!
//! Construction and spawn failures abort the run before any tick
//! executes; replay I/O failures abort an in-progress run. Neither is
//! retried at the game-logic level — the simulation itself is
//! deterministic and never needs a retry.

use std::error::Error;
use std::fmt;

use battle_arena::ArenaError;
use battle_core::EngineError;
use battle_replay::ReplayError;

/// Top-level kernel error.
#[derive(Debug)]
pub enum KernelError {
    /// The configured arena size was rejected by the arena.
    Arena(ArenaError),
    /// An agent failed to spawn.
    Spawn(EngineError),
    /// Replay emission failed after one retry.
    Replay(ReplayError),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arena(e) => write!(f, "{e}"),
            Self::Spawn(e) => write!(f, "{e}"),
            Self::Replay(e) => write!(f, "{e}"),
        }
    }
}

impl Error for KernelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            Self::Spawn(e) => Some(e),
            Self::Replay(e) => Some(e),
        }
    }
}

impl From<ArenaError> for KernelError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

impl From<EngineError> for KernelError {
    fn from(e: EngineError) -> Self {
        Self::Spawn(e)
    }
}

impl From<ReplayError> for KernelError {
    fn from(e: ReplayError) -> Self {
        Self::Replay(e)
    }
}
