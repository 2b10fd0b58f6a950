//! The circular byte arena and its writer-ownership grid.

use crate::diff::DiffAccumulator;
use crate::error::ArenaError;
use battle_core::AgentId;

/// Smallest legal arena size.
pub const MIN_ARENA_SIZE: u32 = 256;

/// A fixed-size, modularly-addressed byte buffer shared by every agent in a
/// match.
///
/// Every cell carries a "writer tag": the id of the agent that last wrote
/// it, or `None` if the cell has never been written. There is no such thing
/// as an out-of-bounds access — every address is reduced modulo the arena
/// size before use, so wrap-around competition at the arena's edges is the
/// normal case, not a special one.
#[derive(Debug)]
pub struct Arena {
    bytes: Vec<u8>,
    writer: Vec<Option<AgentId>>,
    diffs: DiffAccumulator,
}

impl Arena {
    /// Construct an arena of `size` bytes, all zeroed and unowned.
    ///
    /// Fails if `size` is below [`MIN_ARENA_SIZE`]; this is a construction
    /// error, not a clamp, because an undersized arena changes match
    /// semantics rather than merely being an out-of-range knob.
    pub fn new(size: u32) -> Result<Self, ArenaError> {
        if size < MIN_ARENA_SIZE {
            return Err(ArenaError::TooSmall {
                requested: size,
                minimum: MIN_ARENA_SIZE,
            });
        }
        Ok(Self {
            bytes: vec![0u8; size as usize],
            writer: vec![None; size as usize],
            diffs: DiffAccumulator::new(),
        })
    }

    /// Number of bytes in the arena.
    pub fn len(&self) -> u32 {
        self.bytes.len() as u32
    }

    /// An arena is never empty; [`MIN_ARENA_SIZE`] makes this always `false`.
    /// Present for API symmetry with [`Self::len`].
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Reduce an address modulo the arena size.
    pub fn wrap(&self, addr: u32) -> u32 {
        addr % self.len()
    }

    /// Read the byte at `addr` (wrapped).
    pub fn read_byte(&self, addr: u32) -> u8 {
        self.bytes[self.wrap(addr) as usize]
    }

    /// Read a little-endian 32-bit value starting at `addr` (wrapped), with
    /// each of the four bytes individually wrapped around the arena.
    pub fn read_u32_le(&self, addr: u32) -> u32 {
        let mut out = [0u8; 4];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.read_byte(addr.wrapping_add(i as u32));
        }
        u32::from_le_bytes(out)
    }

    /// Return the writer tag of the cell at `addr` (wrapped), if any.
    pub fn writer_at(&self, addr: u32) -> Option<&AgentId> {
        self.writer[self.wrap(addr) as usize].as_ref()
    }

    /// Write a single byte at `addr` (wrapped) on behalf of `writer`,
    /// updating the writer tag and appending to the current tick's diff
    /// accumulator.
    pub fn write_byte(&mut self, addr: u32, value: u8, writer: &AgentId) {
        let addr = self.wrap(addr);
        self.bytes[addr as usize] = value;
        self.writer[addr as usize] = Some(writer.clone());
        self.diffs.push_write(addr, writer);
    }

    /// Load a code blob for `writer`, starting at `entry` (wrapped) and
    /// wrapping around the arena as needed. Every written cell's writer tag
    /// is set to `writer`. Returns the `(start, end)` region occupied,
    /// inclusive of both ends.
    ///
    /// This does not participate in the diff accumulator: code loading
    /// happens at spawn time, before any tick has begun, and is not part of
    /// a tick's reported writes.
    pub fn load_code(&mut self, writer: &AgentId, entry: u32, code: &[u8]) -> (u32, u32) {
        let start = self.wrap(entry);
        for (i, &byte) in code.iter().enumerate() {
            let addr = self.wrap(start.wrapping_add(i as u32));
            self.bytes[addr as usize] = byte;
            self.writer[addr as usize] = Some(writer.clone());
        }
        let span = code.len().max(1) as u32 - 1;
        let end = self.wrap(start.wrapping_add(span));
        (start, end)
    }

    /// Count the cells whose writer tag equals `id`.
    pub fn territory_of(&self, id: &AgentId) -> u32 {
        self.writer
            .iter()
            .filter(|w| w.as_deref() == Some(id.as_str()))
            .count() as u32
    }

    /// Clear the diff accumulator at the start of a new tick.
    pub fn begin_tick(&mut self) {
        self.diffs.clear();
    }

    /// Borrow the diff runs accumulated so far this tick.
    pub fn diff_runs(&self) -> &[crate::diff::DiffRun] {
        self.diffs.runs()
    }
}
