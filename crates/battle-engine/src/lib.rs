//! The battle-engine kernel: per-tick scheduler, scoring, kill
//! attribution, termination, and winner resolution.
//!
//! This crate is the orchestration layer — it owns the arena, the
//! agent roster, and the replay sink, and drives them tick by tick. The
//! instruction set itself lives in `battle-vm`; the wire record types
//! live in `battle-replay`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;
mod kernel;
mod stats;

pub use error::KernelError;
pub use kernel::Kernel;
pub use stats::AgentStats;
