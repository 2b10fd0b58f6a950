//! Replay record types, the append-only replay sink, and replay-scan
//! reconciliation.
//!
//! This crate has no knowledge of the VM or the scheduler — it is driven
//! by `battle-engine`, which hands it [`Header`] and [`TickRecord`]
//! values to serialize.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;
mod reconcile;
mod sink;
mod types;

pub use error::ReplayError;
pub use reconcile::{reconcile_replay, ReconciledAgent};
pub use sink::ReplaySink;
pub use types::{
    AgentSnapshot, Event, Header, MemoryDiff, ScoreMap, Summary, SummaryAgent, TickRecord,
    REPLAY_VERSION,
};
