//! Host-facing contracts for driving the engine one step at a time.

use thiserror::Error;

use crate::console::ConsoleOutput;
use crate::memory::{Memory, DEFAULT_MEMORY_WORDS, MAX_MEMORY_WORDS};
use crate::{ArchitecturalState, HaltReason, RunState, RuntimeError};

/// Default step bound for a run.
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// Rejected configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ConfigError {
    /// Memory size outside `1..=65536` words.
    #[error("memory size must be between 1 and {max} words, got {requested}", max = MAX_MEMORY_WORDS)]
    MemoryWords {
        /// Requested number of words.
        requested: usize,
    },
}

/// Immutable per-run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoreConfig {
    max_steps: usize,
    memory_words: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            memory_words: DEFAULT_MEMORY_WORDS,
        }
    }
}

impl CoreConfig {
    /// Builds a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MemoryWords`] when `memory_words` is zero or
    /// larger than a 16-bit operand can address.
    pub const fn new(max_steps: usize, memory_words: usize) -> Result<Self, ConfigError> {
        if memory_words == 0 || memory_words > MAX_MEMORY_WORDS {
            return Err(ConfigError::MemoryWords {
                requested: memory_words,
            });
        }
        Ok(Self {
            max_steps,
            memory_words,
        })
    }

    /// Returns a copy with a different step bound.
    #[must_use]
    pub const fn with_max_steps(self, max_steps: usize) -> Self {
        Self { max_steps, ..self }
    }

    /// Step bound: the trace never holds more entries than this.
    #[must_use]
    pub const fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Data memory size in words.
    #[must_use]
    pub const fn memory_words(&self) -> usize {
        self.memory_words
    }
}

/// Mutable state exclusively owned by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreState {
    /// Registers, flags and cycle counter.
    pub arch: ArchitecturalState,
    /// Data memory.
    pub memory: Memory,
    /// Running or halted.
    pub run_state: RunState,
}

impl Default for CoreState {
    fn default() -> Self {
        Self::with_config(&CoreConfig::default())
    }
}

impl CoreState {
    /// Fresh state: every register zero, `PC = 0`, memory zeroed.
    #[must_use]
    pub fn with_config(config: &CoreConfig) -> Self {
        Self {
            arch: ArchitecturalState::default(),
            memory: Memory::new(config.memory_words()),
            run_state: RunState::Running,
        }
    }
}

/// Console contract consumed by `CTA` and `OTT`.
///
/// Neither direction can fail: an exhausted input queue reads as `0`.
pub trait ConsoleBus {
    /// Returns the next queued input.
    fn read_input(&mut self) -> u16;

    /// Appends a value to the output log.
    fn write_output(&mut self, output: ConsoleOutput);
}

/// Result of one step attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction retired; the run can continue.
    Retired {
        /// Cycle cost of the instruction.
        cycles: u16,
    },
    /// The run is halted, either by the instruction just retired or earlier.
    Halted {
        /// Cycle cost of the retired instruction, zero when nothing retired.
        cycles: u16,
        /// What halted the run.
        reason: HaltReason,
    },
    /// Fetch, decode or execute faulted; nothing was committed.
    Fault {
        /// The fault raised by the step.
        cause: RuntimeError,
    },
}

/// Step-boundary events, emitted in execution order.
///
/// Nothing is emitted for the commit phase of a faulting step: a fault is
/// reported by `FaultRaised` alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// About to fetch at `pc`.
    InstructionStart {
        /// Fetch address.
        pc: u16,
        /// Opcode byte at `pc`.
        opcode: u8,
    },
    /// Data memory cell read or written by the retired instruction.
    MemoryAccess {
        /// Cell address.
        address: u16,
        /// Cell value after the step.
        value: u16,
        /// True for writes.
        is_write: bool,
    },
    /// Instruction committed.
    InstructionRetired {
        /// Address the instruction was fetched from.
        pc: u16,
        /// Cycle cost charged.
        cycles: u16,
    },
    /// Step faulted; state is unchanged.
    FaultRaised {
        /// Raised fault.
        cause: RuntimeError,
        /// Fetch address of the faulting step.
        pc: u16,
    },
}

/// Receiver for [`TraceEvent`]s.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn on_event(&mut self, _event: TraceEvent) {}
}
