//! Per-tick write-diff accumulation.
//!
//! A tick's writes are recorded as a list of maximal contiguous runs rather
//! than one entry per byte. This keeps replay records small when an agent
//! writes a long run of sequential cells in one tick.

use battle_core::AgentId;

/// A maximal contiguous run of bytes written by a single agent during one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffRun {
    /// Arena address of the first byte in the run.
    pub start: u32,
    /// Number of bytes covered by the run.
    pub len: u32,
    /// Agent id that wrote every byte in the run.
    pub writer: AgentId,
}

/// Accumulates [`DiffRun`]s for the tick currently in progress.
///
/// Writes are coalesced greedily: a new write extends the last run when it
/// is immediately adjacent (`last.start + last.len == addr`) and shares the
/// same writer; otherwise a new run is opened. This is `O(1)` amortized per
/// write rather than rescanning the whole list.
#[derive(Debug, Default)]
pub struct DiffAccumulator {
    runs: Vec<DiffRun>,
}

impl DiffAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single-byte write at `addr` by `writer`, extending the
    /// trailing run if possible.
    pub fn push_write(&mut self, addr: u32, writer: &AgentId) {
        if let Some(last) = self.runs.last_mut() {
            if last.writer == *writer && last.start.wrapping_add(last.len) == addr {
                last.len += 1;
                return;
            }
        }
        self.runs.push(DiffRun {
            start: addr,
            len: 1,
            writer: writer.clone(),
        });
    }

    /// Clear all accumulated runs, starting a new tick.
    pub fn clear(&mut self) {
        self.runs.clear();
    }

    /// Borrow the accumulated runs in emission order.
    pub fn runs(&self) -> &[DiffRun] {
        &self.runs
    }
}
