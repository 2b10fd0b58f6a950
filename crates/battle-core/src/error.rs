//! Construction and spawn-time error types.
//!
//! These fail fast at construction or spawn time; no partial state is
//! observable to the host afterward.

use std::error::Error;
use std::fmt;

/// Errors raised while spawning an agent into the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// Two agents were spawned with the same id.
    DuplicateAgentId {
        /// The id that was already in use.
        id: String,
    },
    /// A code blob had zero length.
    EmptyCode {
        /// The id of the agent whose code was empty.
        id: String,
    },
    /// A code blob was longer than the arena it is being loaded into.
    CodeExceedsArena {
        /// The id of the agent whose code was too large.
        id: String,
        /// Length of the code blob, in bytes.
        code_len: usize,
        /// Size of the arena, in bytes.
        arena_size: u32,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateAgentId { id } => {
                write!(f, "agent id '{id}' is already in use")
            }
            Self::EmptyCode { id } => {
                write!(f, "agent '{id}' was spawned with zero-length code")
            }
            Self::CodeExceedsArena {
                id,
                code_len,
                arena_size,
            } => write!(
                f,
                "agent '{id}' code is {code_len} bytes, exceeding arena size {arena_size}"
            ),
        }
    }
}

impl Error for EngineError {}
