//! Per-step trace records and the run result they roll up into.
//!
//! With the `serde` feature these serialize to the wire format: snapshots use
//! the register names (`PC`, `A`, ...) as keys, optional fields are omitted
//! when absent, and errors are rendered as their message text.

use crate::api::{StepOutcome, TraceEvent, TraceSink};
use crate::console::ConsoleOutput;
use crate::state::{FLAG_B, FLAG_C, FLAG_D, FLAG_I, FLAG_N, FLAG_V, FLAG_Z};
use crate::{ArchitecturalState, Program, Register, RuntimeError};

/// Flag bits of `P`, one field per flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[allow(clippy::struct_excessive_bools, missing_docs)]
pub struct FlagMap {
    #[cfg_attr(feature = "serde", serde(rename = "C"))]
    pub carry: bool,
    #[cfg_attr(feature = "serde", serde(rename = "Z"))]
    pub zero: bool,
    #[cfg_attr(feature = "serde", serde(rename = "I"))]
    pub interrupt_disable: bool,
    #[cfg_attr(feature = "serde", serde(rename = "D"))]
    pub decimal: bool,
    #[cfg_attr(feature = "serde", serde(rename = "B"))]
    pub break_flag: bool,
    #[cfg_attr(feature = "serde", serde(rename = "V"))]
    pub overflow: bool,
    #[cfg_attr(feature = "serde", serde(rename = "N"))]
    pub negative: bool,
}

/// Copy of the register file at a step boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CpuSnapshot {
    /// Program counter.
    #[cfg_attr(feature = "serde", serde(rename = "PC"))]
    pub pc: u16,
    /// Accumulator.
    #[cfg_attr(feature = "serde", serde(rename = "A"))]
    pub a: u16,
    /// Index register X.
    #[cfg_attr(feature = "serde", serde(rename = "X"))]
    pub x: u16,
    /// Index register Y.
    #[cfg_attr(feature = "serde", serde(rename = "Y"))]
    pub y: u16,
    /// Reserved stack pointer.
    #[cfg_attr(feature = "serde", serde(rename = "SP"))]
    pub sp: u8,
    /// Packed flag register.
    #[cfg_attr(feature = "serde", serde(rename = "P"))]
    pub p: u8,
    /// Cycle counter.
    pub cycles: u64,
    /// `P` unpacked.
    pub flags: FlagMap,
}

impl From<&ArchitecturalState> for CpuSnapshot {
    fn from(arch: &ArchitecturalState) -> Self {
        Self {
            pc: arch.pc(),
            a: arch.reg(Register::A),
            x: arch.reg(Register::X),
            y: arch.reg(Register::Y),
            sp: arch.sp(),
            p: arch.flags(),
            cycles: arch.cycles(),
            flags: FlagMap {
                carry: arch.flag_is_set(FLAG_C),
                zero: arch.flag_is_set(FLAG_Z),
                interrupt_disable: arch.flag_is_set(FLAG_I),
                decimal: arch.flag_is_set(FLAG_D),
                break_flag: arch.flag_is_set(FLAG_B),
                overflow: arch.flag_is_set(FLAG_V),
                negative: arch.flag_is_set(FLAG_N),
            },
        }
    }
}

/// Data memory cell touched by a step, with its value after the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MemoryCell {
    /// Cell address.
    pub address: u16,
    /// Cell value.
    pub value: u16,
}

/// One executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TraceEntry {
    /// Zero-based step index.
    pub step: usize,
    /// Opcode byte fetched.
    pub opcode: u8,
    /// State before the step.
    pub before: CpuSnapshot,
    /// State after the step; absent when the step faulted.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub after: Option<CpuSnapshot>,
    /// The run halted at this step.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "is_false"))]
    pub halted: bool,
    /// Fault raised by this step.
    #[cfg_attr(
        feature = "serde",
        serde(
            skip_serializing_if = "Option::is_none",
            serialize_with = "error_message"
        )
    )]
    pub error: Option<RuntimeError>,
    /// Memory cells read or written.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub memory_used: Vec<MemoryCell>,
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunResult {
    /// Program that ran.
    pub program: Program,
    /// One entry per executed step.
    pub trace: Vec<TraceEntry>,
    /// `BRK`, leaving the program, or a fault ended the run.
    pub halted: bool,
    /// Fault that ended the run.
    #[cfg_attr(feature = "serde", serde(serialize_with = "error_message"))]
    pub error: Option<RuntimeError>,
    /// Console outputs in write order.
    pub outputs: Vec<ConsoleOutput>,
    /// Registers and flags at the end of the run.
    pub final_state: CpuSnapshot,
}

#[cfg(feature = "serde")]
#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(feature = "serde")]
#[allow(clippy::ref_option)]
fn error_message<S>(error: &Option<RuntimeError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match error {
        Some(error) => serializer.collect_str(error),
        None => serializer.serialize_none(),
    }
}

/// Builds trace entries from step outcomes and [`TraceEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct Tracer {
    entries: Vec<TraceEntry>,
    opcode: u8,
    cells: Vec<MemoryCell>,
}

impl Tracer {
    /// Creates an empty tracer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before the first step is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Closes the current step.
    ///
    /// `before` is the snapshot taken ahead of the step, `arch` the register
    /// file once it finished.
    pub fn record(&mut self, before: CpuSnapshot, outcome: StepOutcome, arch: &ArchitecturalState) {
        let (after, halted, error) = match outcome {
            StepOutcome::Retired { .. } => (Some(CpuSnapshot::from(arch)), false, None),
            StepOutcome::Halted { .. } => (Some(CpuSnapshot::from(arch)), true, None),
            StepOutcome::Fault { cause } => (None, true, Some(cause)),
        };

        self.entries.push(TraceEntry {
            step: self.entries.len(),
            opcode: self.opcode,
            before,
            after,
            halted,
            error,
            memory_used: std::mem::take(&mut self.cells),
        });
    }

    /// Consumes the tracer and returns its entries in step order.
    #[must_use]
    pub fn into_entries(self) -> Vec<TraceEntry> {
        self.entries
    }
}

impl TraceSink for Tracer {
    fn on_event(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::InstructionStart { opcode, .. } => {
                self.opcode = opcode;
                self.cells.clear();
            }
            TraceEvent::MemoryAccess { address, value, .. } => {
                self.cells.push(MemoryCell { address, value });
            }
            TraceEvent::InstructionRetired { .. } | TraceEvent::FaultRaised { .. } => {}
        }
    }
}
