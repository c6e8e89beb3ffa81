//! Instruction execution pipeline.
//!
//! A step runs in two phases:
//! 1. `execute_instruction` reads operands and memory and records every side
//!    effect in an [`ExecuteState`] without touching the core state.
//! 2. `commit_execution` applies the recorded effects.
//!
//! Every fault is raised in phase 1, or by the first action of phase 2, so a
//! faulting step leaves registers, flags, memory, cycles and console output
//! exactly as they were.

mod alu;
mod flags;

pub use alu::{add_with_carry, compare, sub_with_borrow, AluResult};
pub use flags::FlagsUpdate;

use crate::api::{ConsoleBus, TraceEvent, TraceSink};
use crate::console::ConsoleOutput;
use crate::decoder::{DecodedInstruction, Decoder};
use crate::encoding::Opcode;
use crate::memory::validate_data_address;
use crate::state::{FLAG_C, FLAG_N, FLAG_V, FLAG_Z};
use crate::timing::{cycle_cost, CycleCostKind};
use crate::{CoreState, HaltReason, Register, RunState, RuntimeError, StepOutcome};

/// Side effects of one instruction, accumulated before commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecuteState {
    /// Destination register and its new value.
    pub register_write: Option<(Register, u16)>,
    /// Memory cell address and its new value.
    pub memory_write: Option<(u16, u16)>,
    /// Cell read by the instruction, reported in the trace.
    pub memory_read: Option<u16>,
    /// `P` update to apply.
    pub flags_update: FlagsUpdate,
    /// `PC` after the instruction.
    pub next_pc: u16,
    /// Cycle cost.
    pub cycles: u16,
    /// Value for the console output log.
    pub output: Option<ConsoleOutput>,
    /// `BRK` retired.
    pub halt: bool,
}

impl ExecuteState {
    fn new(next_pc: u16, kind: CycleCostKind) -> Self {
        Self {
            next_pc,
            cycles: cycle_cost(kind).unwrap_or(1),
            ..Self::default()
        }
    }

    /// Address of the memory cell this instruction touched, if any.
    #[must_use]
    pub fn touched_address(&self) -> Option<u16> {
        self.memory_write
            .map(|(address, _)| address)
            .or(self.memory_read)
    }
}

#[derive(Debug, Clone, Copy)]
enum AluOp {
    Add,
    Sub,
    And,
    Or,
    Xor,
}

/// Executes one decoded instruction against a read-only view of the state.
///
/// `CTA` consumes its input here; it cannot fault, so the read never needs
/// undoing.
///
/// # Errors
///
/// Returns [`RuntimeError::AddressOutOfRange`] when a memory operand is past
/// the end of data memory.
pub fn execute_instruction(
    instr: &DecodedInstruction,
    state: &CoreState,
    console: &mut dyn ConsoleBus,
) -> Result<ExecuteState, RuntimeError> {
    let next_pc = instr.next_pc();
    let operand = instr.word();
    let a = state.arch.reg(Register::A);
    let x = state.arch.reg(Register::X);

    let exec = match instr.opcode() {
        Opcode::Brk => ExecuteState {
            halt: true,
            ..ExecuteState::new(next_pc, CycleCostKind::Break)
        },
        Opcode::Nop => ExecuteState::new(next_pc, CycleCostKind::Nop),
        Opcode::Clc => ExecuteState {
            flags_update: FlagsUpdate::ClearCarry,
            ..ExecuteState::new(next_pc, CycleCostKind::ClearCarry)
        },
        Opcode::Tax => ExecuteState {
            register_write: Some((Register::X, a)),
            ..ExecuteState::new(next_pc, CycleCostKind::Transfer)
        },
        Opcode::Xta => ExecuteState {
            register_write: Some((Register::A, x)),
            ..ExecuteState::new(next_pc, CycleCostKind::Transfer)
        },
        Opcode::Cta => {
            let value = console.read_input();
            load(Register::A, value, ExecuteState::new(next_pc, CycleCostKind::ConsoleIn))
        }
        Opcode::Lda => load(Register::A, operand, immediate(next_pc)),
        Opcode::Ldx => load(Register::X, operand, immediate(next_pc)),
        Opcode::Ldy => load(Register::Y, operand, immediate(next_pc)),
        Opcode::Adc => execute_alu(state, operand, next_pc, AluOp::Add),
        Opcode::Sbc => execute_alu(state, operand, next_pc, AluOp::Sub),
        Opcode::And => execute_alu(state, operand, next_pc, AluOp::And),
        Opcode::Ora => execute_alu(state, operand, next_pc, AluOp::Or),
        Opcode::Eor => execute_alu(state, operand, next_pc, AluOp::Xor),
        Opcode::Cmp => execute_compare(a, operand, ExecuteState::new(next_pc, CycleCostKind::Alu)),
        Opcode::Cpx => execute_compare(x, operand, ExecuteState::new(next_pc, CycleCostKind::Alu)),
        Opcode::Jmp => ExecuteState::new(operand, CycleCostKind::Jump),
        Opcode::Cmpc => {
            let value = state.memory.read(operand)?;
            execute_compare(
                a,
                value,
                ExecuteState {
                    memory_read: Some(operand),
                    ..ExecuteState::new(next_pc, CycleCostKind::MemoryCompare)
                },
            )
        }
        Opcode::Sta => execute_store(state, operand, a, next_pc)?,
        Opcode::Stx => execute_store(state, operand, x, next_pc)?,
        Opcode::Lsa => execute_memory_load(state, Register::A, operand, next_pc)?,
        Opcode::Lsx => execute_memory_load(state, Register::X, operand, next_pc)?,
        Opcode::Ott => {
            let value = state.memory.read(operand)?;
            ExecuteState {
                memory_read: Some(operand),
                output: Some(ConsoleOutput {
                    value,
                    address: operand,
                }),
                ..ExecuteState::new(next_pc, CycleCostKind::ConsoleOut)
            }
        }
        Opcode::Mul => {
            let product = a.wrapping_mul(state.memory.read(operand)?);
            ExecuteState {
                memory_read: Some(operand),
                ..load(
                    Register::A,
                    product,
                    ExecuteState::new(next_pc, CycleCostKind::Mul),
                )
            }
        }
        Opcode::Mulm => {
            let product = a.wrapping_mul(state.memory.read(operand)?);
            ExecuteState {
                memory_write: Some((operand, product)),
                flags_update: FlagsUpdate::ZeroNegative { result: product },
                ..ExecuteState::new(next_pc, CycleCostKind::MulMemory)
            }
        }
        Opcode::Beq
        | Opcode::Bne
        | Opcode::Bcs
        | Opcode::Bcc
        | Opcode::Bmi
        | Opcode::Bpl
        | Opcode::Bvs
        | Opcode::Bvc => execute_branch(instr, state),
    };

    Ok(exec)
}

fn immediate(next_pc: u16) -> ExecuteState {
    ExecuteState::new(next_pc, CycleCostKind::LoadImmediate)
}

const fn load(reg: Register, value: u16, exec: ExecuteState) -> ExecuteState {
    ExecuteState {
        register_write: Some((reg, value)),
        flags_update: FlagsUpdate::ZeroNegative { result: value },
        ..exec
    }
}

fn execute_alu(state: &CoreState, operand: u16, next_pc: u16, op: AluOp) -> ExecuteState {
    let a = state.arch.reg(Register::A);
    let carry_in = state.arch.flag_is_set(FLAG_C);
    let exec = ExecuteState::new(next_pc, CycleCostKind::Alu);

    let arithmetic = |result: AluResult| ExecuteState {
        register_write: Some((Register::A, result.value)),
        flags_update: FlagsUpdate::Arithmetic {
            result: result.value,
            carry: result.carry,
            overflow: result.overflow,
        },
        ..exec
    };

    match op {
        AluOp::Add => arithmetic(add_with_carry(a, operand, carry_in)),
        AluOp::Sub => arithmetic(sub_with_borrow(a, operand, carry_in)),
        AluOp::And => load(Register::A, a & operand, exec),
        AluOp::Or => load(Register::A, a | operand, exec),
        AluOp::Xor => load(Register::A, a ^ operand, exec),
    }
}

fn execute_compare(register: u16, operand: u16, exec: ExecuteState) -> ExecuteState {
    let (difference, carry) = compare(register, operand);
    ExecuteState {
        flags_update: FlagsUpdate::Compare { difference, carry },
        ..exec
    }
}

fn execute_store(
    state: &CoreState,
    address: u16,
    value: u16,
    next_pc: u16,
) -> Result<ExecuteState, RuntimeError> {
    validate_data_address(address, state.memory.len())?;
    Ok(ExecuteState {
        memory_write: Some((address, value)),
        ..ExecuteState::new(next_pc, CycleCostKind::MemoryStore)
    })
}

fn execute_memory_load(
    state: &CoreState,
    reg: Register,
    address: u16,
    next_pc: u16,
) -> Result<ExecuteState, RuntimeError> {
    let value = state.memory.read(address)?;
    Ok(ExecuteState {
        memory_read: Some(address),
        ..load(
            reg,
            value,
            ExecuteState::new(next_pc, CycleCostKind::MemoryLoad),
        )
    })
}

fn execute_branch(instr: &DecodedInstruction, state: &CoreState) -> ExecuteState {
    let flag_set = |flag| state.arch.flag_is_set(flag);
    let taken = match instr.opcode() {
        Opcode::Beq => flag_set(FLAG_Z),
        Opcode::Bne => !flag_set(FLAG_Z),
        Opcode::Bcs => flag_set(FLAG_C),
        Opcode::Bcc => !flag_set(FLAG_C),
        Opcode::Bmi => flag_set(FLAG_N),
        Opcode::Bpl => !flag_set(FLAG_N),
        Opcode::Bvs => flag_set(FLAG_V),
        Opcode::Bvc => !flag_set(FLAG_V),
        _ => false,
    };

    if taken {
        ExecuteState::new(instr.branch_target(), CycleCostKind::BranchTaken)
    } else {
        ExecuteState::new(instr.next_pc(), CycleCostKind::BranchNotTaken)
    }
}

/// Applies the recorded side effects to the core state.
///
/// The memory write goes first: if it fails nothing else is applied.
///
/// # Errors
///
/// Returns [`RuntimeError::AddressOutOfRange`] when the recorded memory write
/// is past the end of data memory.
pub fn commit_execution(
    state: &mut CoreState,
    exec: &ExecuteState,
    console: &mut dyn ConsoleBus,
) -> Result<(), RuntimeError> {
    if let Some((address, value)) = exec.memory_write {
        state.memory.write(address, value)?;
    }

    if let Some((reg, value)) = exec.register_write {
        state.arch.set_reg(reg, value);
    }

    exec.flags_update.apply(&mut state.arch);

    if let Some(output) = exec.output {
        console.write_output(output);
    }

    state.arch.set_pc(exec.next_pc);
    state.arch.add_cycles(exec.cycles);
    Ok(())
}

fn retire(
    state: &mut CoreState,
    program: &[u8],
    console: &mut dyn ConsoleBus,
) -> Result<ExecuteState, RuntimeError> {
    let instr = Decoder::decode(program, state.arch.pc())?;
    let exec = execute_instruction(&instr, state, console)?;
    commit_execution(state, &exec, console)?;
    Ok(exec)
}

/// Executes one instruction of `program` and reports what happened.
///
/// A halted core stays halted: further calls return the same halt or fault
/// without executing anything.
pub fn step_one(
    state: &mut CoreState,
    program: &[u8],
    console: &mut dyn ConsoleBus,
    sink: &mut dyn TraceSink,
) -> StepOutcome {
    if let RunState::Halted(reason) = state.run_state {
        return match reason {
            HaltReason::Fault(cause) => StepOutcome::Fault { cause },
            HaltReason::Break | HaltReason::ProgramEnd => StepOutcome::Halted { cycles: 0, reason },
        };
    }

    let pc = state.arch.pc();
    let Some(&opcode) = program.get(usize::from(pc)) else {
        state.run_state = RunState::Halted(HaltReason::ProgramEnd);
        return StepOutcome::Halted {
            cycles: 0,
            reason: HaltReason::ProgramEnd,
        };
    };
    sink.on_event(TraceEvent::InstructionStart { pc, opcode });

    let exec = match retire(state, program, console) {
        Ok(exec) => exec,
        Err(cause) => {
            state.run_state = RunState::Halted(HaltReason::Fault(cause));
            sink.on_event(TraceEvent::FaultRaised { cause, pc });
            return StepOutcome::Fault { cause };
        }
    };

    if let Some(address) = exec.touched_address() {
        if let Ok(value) = state.memory.read(address) {
            sink.on_event(TraceEvent::MemoryAccess {
                address,
                value,
                is_write: exec.memory_write.is_some(),
            });
        }
    }
    sink.on_event(TraceEvent::InstructionRetired {
        pc,
        cycles: exec.cycles,
    });

    let halt = if exec.halt {
        Some(HaltReason::Break)
    } else if usize::from(state.arch.pc()) >= program.len() {
        Some(HaltReason::ProgramEnd)
    } else {
        None
    };

    match halt {
        Some(reason) => {
            state.run_state = RunState::Halted(reason);
            StepOutcome::Halted {
                cycles: exec.cycles,
                reason,
            }
        }
        None => StepOutcome::Retired {
            cycles: exec.cycles,
        },
    }
}
