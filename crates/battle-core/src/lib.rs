//! Core identifiers, configuration, and error types shared by every
//! crate in the battle engine workspace.
//!
//! This crate has no knowledge of the arena, the VM, or replay emission —
//! it defines only the vocabulary ([`AgentId`], [`TickId`], [`Config`]) and
//! the error types raised while validating that vocabulary.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod id;

pub use config::{
    Config, WinMode, Weights, DEFAULT_ARENA_SIZE, DEFAULT_INSTR_PER_TICK, DEFAULT_SEED,
    MIN_ARENA_SIZE, MIN_INSTR_PER_TICK,
};
pub use error::EngineError;
pub use id::{AgentId, TickId};
