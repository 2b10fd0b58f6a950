//! The circular byte arena: fixed-size memory with per-cell writer
//! ownership and per-tick diff-run accumulation.
//!
//! This crate has no notion of instructions, agents' registers, or
//! scheduling — it is pure memory plus bookkeeping, driven by
//! `battle-vm` and `battle-engine`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod arena;
mod diff;
mod error;

pub use arena::{Arena, MIN_ARENA_SIZE};
pub use diff::{DiffAccumulator, DiffRun};
pub use error::ArenaError;
