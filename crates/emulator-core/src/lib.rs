//! Core crate for the 16-bit console CPU: opcode catalog, decoder and a
//! deterministic, bounded execution engine that records a step trace.

/// Data memory model and access helpers.
pub mod memory;
pub use memory::{
    read_u16_le, validate_data_address, write_u16_le, Memory, DEFAULT_MEMORY_WORDS,
    MAX_MEMORY_WORDS, OPERAND_WORD_BYTES,
};

/// Host-facing configuration, state and step contracts.
pub mod api;
pub use api::{
    ConfigError, ConsoleBus, CoreConfig, CoreState, NoTrace, StepOutcome, TraceEvent, TraceSink,
    DEFAULT_MAX_STEPS,
};

/// CPU state model primitives.
pub mod state;
pub use state::{
    ArchitecturalState, HaltReason, Register, RunState, FLAGS_ACTIVE_MASK, FLAG_B, FLAG_C, FLAG_D,
    FLAG_I, FLAG_N, FLAG_V, FLAG_Z,
};

/// Opcode catalog shared by the assembler and the engine.
pub mod encoding;
pub use encoding::{
    descriptor_for_code, descriptor_for_mnemonic, AddressingClass, Opcode, OpcodeDescriptor,
    OPCODE_TABLE,
};

/// Instruction decoder.
pub mod decoder;
pub use decoder::{DecodedInstruction, Decoder, Operand};

/// Runtime fault taxonomy.
pub mod fault;
pub use fault::RuntimeError;

/// Instruction cycle-cost table and lookup.
pub mod timing;
pub use timing::{cycle_cost, CycleCostKind, CYCLE_COST_TABLE};

/// Encoded program image.
pub mod program;
pub use program::Program;

/// Console input queue and output log.
pub mod console;
pub use console::{Console, ConsoleOutput};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{commit_execution, execute_instruction, step_one, ExecuteState, FlagsUpdate};

/// Trace records and run results.
pub mod trace;
pub use trace::{CpuSnapshot, FlagMap, MemoryCell, RunResult, TraceEntry, Tracer};

/// Bounded run loop.
pub mod runner;
pub use runner::{run, run_with_config};

/// Program disassembly.
pub mod disasm;
pub use disasm::{disassemble, disassemble_one, DisassemblyRow};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
