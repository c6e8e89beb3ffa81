use crate::RuntimeError;

/// Why a run stopped making progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum HaltReason {
    /// `BRK` retired.
    Break,
    /// `PC` moved outside the program.
    ProgramEnd,
    /// A runtime fault stopped the failing step.
    Fault(RuntimeError),
}

/// Execution-state machine for a single run.
///
/// Exhausting the step bound is not a state: the run simply stops while still
/// `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to execute the next instruction.
    #[default]
    Running,
    /// Terminal; no further steps execute.
    Halted(HaltReason),
}

impl RunState {
    /// Returns `true` once the run reached its terminal state.
    #[must_use]
    pub const fn is_halted(self) -> bool {
        matches!(self, Self::Halted(_))
    }

    /// Returns the fault that halted the run, if any.
    #[must_use]
    pub const fn fault(self) -> Option<RuntimeError> {
        match self {
            Self::Halted(HaltReason::Fault(cause)) => Some(cause),
            Self::Running | Self::Halted(HaltReason::Break | HaltReason::ProgramEnd) => None,
        }
    }
}
