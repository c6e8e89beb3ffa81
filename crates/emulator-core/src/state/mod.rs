//! CPU state model primitives.

/// Register and flag file.
pub mod registers;
/// Run-level state machine.
pub mod run_state;

pub use registers::{
    ArchitecturalState, Register, FLAGS_ACTIVE_MASK, FLAG_B, FLAG_C, FLAG_D, FLAG_I, FLAG_N,
    FLAG_V, FLAG_Z,
};
pub use run_state::{HaltReason, RunState};
