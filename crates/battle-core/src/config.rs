//! Match configuration: weights, win-mode, and the top-level `Config`.
//!
//! `Config` is constructed once and handed to the kernel; it is never
//! mutated afterward. Out-of-range numeric fields are clamped to their
//! legal range at construction time — there is no error path for a bad
//! number, only for a bad *structural* choice (those live in
//! [`crate::EngineError`]).

use std::fmt;

/// Scoring weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Weights {
    /// Points credited to every alive agent at the end of each tick.
    pub alive: u32,
    /// Points credited to the killer when a kill is attributed.
    pub kill: u32,
    /// Points per territory bucket (0 disables territory scoring).
    pub territory: u32,
    /// Cells per territory bucket; 0 is coerced to 1.
    pub territory_bucket: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            alive: 1,
            kill: 5,
            territory: 1,
            territory_bucket: 64,
        }
    }
}

impl Weights {
    /// Clamp `territory_bucket` of 0 up to 1; all other fields are already
    /// unsigned and have no further range restriction.
    fn clamped(mut self) -> Self {
        if self.territory_bucket == 0 {
            self.territory_bucket = 1;
        }
        self
    }
}

/// Winner-resolution mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinMode {
    /// Only a sole survivor wins; otherwise no winner.
    Survival,
    /// The uniquely highest scorer wins; otherwise no winner.
    Score,
    /// Like `Score`, but a sole survivor always wins outright.
    ScoreFallback,
}

impl Default for WinMode {
    fn default() -> Self {
        Self::ScoreFallback
    }
}

impl fmt::Display for WinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Survival => "survival",
            Self::Score => "score",
            Self::ScoreFallback => "score_fallback",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for WinMode {
    type Err = String;

    /// Unrecognized strings fall back to the default rather than erroring.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "survival" => Self::Survival,
            "score" => Self::Score,
            "score_fallback" => Self::ScoreFallback,
            _ => Self::default(),
        })
    }
}

/// Minimum legal arena size.
pub const MIN_ARENA_SIZE: u32 = 256;
/// Default arena size.
pub const DEFAULT_ARENA_SIZE: u32 = 4096;
/// Minimum legal instruction quota.
pub const MIN_INSTR_PER_TICK: u32 = 1;
/// Default instruction quota.
pub const DEFAULT_INSTR_PER_TICK: u32 = 8;
/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 1337;

/// Top-level match configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// Number of bytes in the arena. Clamped to `>= 256`.
    pub arena_size: u32,
    /// Instructions each alive agent may execute per tick. Clamped to `>= 1`.
    pub instr_per_tick: u32,
    /// RNG seed. Any value is legal; the RNG is currently unused by the
    /// kernel, reserved for future stochastic tiebreaking.
    pub seed: u64,
    /// Winner-resolution mode.
    pub win_mode: WinMode,
    /// Scoring weights.
    pub weights: Weights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arena_size: DEFAULT_ARENA_SIZE,
            instr_per_tick: DEFAULT_INSTR_PER_TICK,
            seed: DEFAULT_SEED,
            win_mode: WinMode::default(),
            weights: Weights::default(),
        }
    }
}

impl Config {
    /// Clamp every numeric field to its legal range. Called once, by the
    /// kernel, at construction time.
    pub fn clamped(mut self) -> Self {
        if self.arena_size < MIN_ARENA_SIZE {
            self.arena_size = MIN_ARENA_SIZE;
        }
        if self.instr_per_tick < MIN_INSTR_PER_TICK {
            self.instr_per_tick = MIN_INSTR_PER_TICK;
        }
        self.weights = self.weights.clamped();
        self
    }
}
