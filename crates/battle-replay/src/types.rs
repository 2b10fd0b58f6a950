//! Wire types for the replay and summary files.
//!
//! Field names here are load-bearing: they are the stable contract a
//! downstream visualizer depends on. Nothing here may be renamed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use battle_core::{AgentId, Config};

/// Agent id → accumulated score, in agent creation order.
///
/// An [`IndexMap`] rather than a `HashMap` so that JSON key order is
/// deterministic across runs of the same match — two runs with identical
/// inputs must produce byte-identical replay files.
pub type ScoreMap = IndexMap<AgentId, i64>;

/// The very first line written to a replay file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Header {
    /// Always `0`: the header precedes any executed tick.
    pub tick: u64,
    /// Replay format version.
    pub ver: u32,
    /// The match configuration this run was constructed with.
    pub config: Config,
}

/// Current replay format version.
pub const REPLAY_VERSION: u32 = 6;

impl Header {
    /// Build the header record for `config`.
    pub fn new(config: Config) -> Self {
        Self {
            tick: 0,
            ver: REPLAY_VERSION,
            config,
        }
    }
}

/// Per-agent snapshot embedded in every tick record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Agent id.
    pub id: AgentId,
    /// Program counter at end of this tick's stepping.
    pub pc: u32,
    /// Whether the agent is still alive.
    pub alive: bool,
    /// Instructions executed this tick.
    pub cpu_used: u32,
    /// Cumulative successful byte writes.
    pub mem_writes: u64,
    /// `(start, end)` region the agent's code was loaded into at spawn.
    pub region: (u32, u32),
}

/// A kill or self-death event attributed during a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// `victim` died and the cell under its pc was last written by `by`.
    Kill {
        /// The agent that died.
        victim: AgentId,
        /// The agent credited with the kill.
        by: AgentId,
    },
    /// `victim` died with no attributable killer (self-kill or unowned cell).
    Death {
        /// The agent that died.
        victim: AgentId,
    },
}

/// One coalesced contiguous write run from a tick's diff accumulator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryDiff {
    /// First address in the run.
    pub addr: u32,
    /// Number of bytes covered.
    pub len: u32,
    /// Agent id that wrote every byte in the run.
    pub owner: AgentId,
}

/// A per-tick record, emitted once per executed tick after agent stepping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TickRecord {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// Every agent's state at the end of this tick, in creation order.
    pub agents: Vec<AgentSnapshot>,
    /// Accumulated score per agent id.
    pub score: ScoreMap,
    /// Kill/death events attributed this tick, possibly empty.
    pub events: Vec<Event>,
    /// Coalesced write runs from this tick.
    pub memory_diffs: Vec<MemoryDiff>,
}

/// Per-agent entry in the final summary's `agents` list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryAgent {
    /// Agent id.
    pub id: AgentId,
    /// Whether the agent survived to the end of the match.
    pub alive: bool,
    /// Final accumulated score.
    pub score: i64,
    /// Ticks this agent was alive for.
    pub alive_ticks: u64,
    /// Kills credited to this agent.
    pub kills: u64,
    /// Deaths this agent suffered.
    pub deaths: u64,
    /// Total instructions executed across the match.
    pub cpu_total: u64,
    /// Total successful byte writes across the match.
    pub mem_writes: u64,
    /// Territory owned at the final tick.
    pub territory_last: u32,
    /// Highest territory owned at any tick.
    pub territory_max: u32,
    /// Average territory owned across all ticks run.
    pub territory_avg: f64,
    /// `territory_last` as a percentage of `arena_size`.
    pub territory_pct_last: f64,
    /// `territory_max` as a percentage of `arena_size`.
    pub territory_pct_max: f64,
    /// `territory_avg` as a percentage of `arena_size`.
    pub territory_pct_avg: f64,
}

/// The final `summary.json` document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Winning agent id, or `""` if there was none.
    pub winner: String,
    /// The win mode actually used to resolve `winner`.
    pub win_mode: String,
    /// Final tick count reached.
    pub ticks: u64,
    /// Arena size the match ran with.
    pub arena_size: u32,
    /// The full configuration this run was constructed with.
    pub config: Config,
    /// Final accumulated score per agent id.
    pub score: ScoreMap,
    /// Per-agent summary entries, sorted by `(-score, id)`.
    pub agents: Vec<SummaryAgent>,
}
