//! Battle: a deterministic byte-arena battle engine.
//!
//! This is the top-level facade crate that re-exports the public API
//! from every battle-engine sub-crate. For most users, adding `battle`
//! as a single dependency is sufficient.
//!
//! # Quick start
//!
//! ```
//! use battle::prelude::*;
//! use battle::replay::ReplaySink;
//!
//! let mut replay = Vec::new();
//! let mut kernel = Kernel::new(Config::default(), ReplaySink::new(&mut replay)).unwrap();
//!
//! // MOV 0x41; STORE 200; JMP 0 — an agent that claims one cell forever.
//! let code = [1u8, 0x41, 0, 0, 0, 4, 200, 0, 0, 0, 5, 0, 0, 0, 0];
//! kernel.spawn("A", 0, &code).unwrap();
//! let winner = kernel.run(10).unwrap();
//! assert_eq!(winner, "A"); // the lone spawned agent is the sole survivor
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `battle-arena` | The circular byte arena and writer-ownership grid. |
//! | [`core`] | `battle-core` | `AgentId`, `TickId`, `Config`, `Weights`, `WinMode`, `EngineError`. |
//! | [`vm`] | `battle-vm` | The instruction set, `Agent`, and the single-step interpreter. |
//! | [`replay`] | `battle-replay` | Replay record types, the replay sink, and reconciliation. |
//! | [`engine`] | `battle-engine` | [`Kernel`], the per-tick scheduler and scorer. |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// The circular byte arena and writer-ownership grid (`battle-arena`).
pub use battle_arena as arena;

/// Core identifiers, configuration, and error types (`battle-core`).
pub use battle_core as core;

/// Per-tick scheduler, scoring, and winner resolution (`battle-engine`).
pub use battle_engine as engine;

/// Replay record types, replay sink, and reconciliation (`battle-replay`).
pub use battle_replay as replay;

/// Instruction set, `Agent`, and single-step interpreter (`battle-vm`).
pub use battle_vm as vm;

/// Common imports for typical `battle` usage.
///
/// ```
/// use battle::prelude::*;
/// ```
pub mod prelude {
    pub use battle_core::{AgentId, Config, TickId, WinMode, Weights};
    pub use battle_engine::Kernel;
    pub use battle_vm::{Agent, Opcode, Registers};
}
