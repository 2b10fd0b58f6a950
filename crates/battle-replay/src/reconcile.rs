//! Replay-derived reconciliation.
//!
//! Long-running matches are sometimes driven from a process that cannot
//! see the kernel's in-memory state — only its replay file. This module
//! reconstructs final scores and alive-tick counts by scanning that file.
//!
//! Works for however many distinct agent ids actually appear in the
//! replay, not just a fixed pair — matching the engine's 2-3 agent design.

use std::collections::BTreeSet;
use std::io::BufRead;

use battle_core::AgentId;
use indexmap::IndexMap;

use crate::types::TickRecord;

/// Reconciled per-agent totals derived purely from a replay file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconciledAgent {
    /// Last observed `score[id]` across all tick records.
    pub score: i64,
    /// Number of distinct ticks in which `agents[*].alive == true` for this id.
    pub alive_ticks: u64,
}

/// Scan `reader` line by line, reconstructing final score and alive-tick
/// counts for every agent id observed.
///
/// Lines that fail to parse as a [`TickRecord`] (including the header,
/// which has no `agents`/`score` fields in the tick-record shape) are
/// skipped rather than treated as fatal — a reconciling reader tolerates
/// a partially-written or header-only replay.
pub fn reconcile_replay<R: BufRead>(reader: R) -> IndexMap<AgentId, ReconciledAgent> {
    let mut out: IndexMap<AgentId, ReconciledAgent> = IndexMap::new();
    let mut seen_ticks: BTreeSet<u64> = BTreeSet::new();

    for line in reader.lines() {
        let Ok(line) = line else { continue };
        if line.trim().is_empty() {
            continue;
        }
        let Ok(record) = serde_json::from_str::<TickRecord>(&line) else {
            continue;
        };

        for (id, score) in &record.score {
            out.entry(id.clone()).or_default().score = *score;
        }

        if seen_ticks.insert(record.tick) {
            for agent in &record.agents {
                if agent.alive {
                    out.entry(agent.id.clone()).or_default().alive_ticks += 1;
                }
            }
        }
    }

    out
}
