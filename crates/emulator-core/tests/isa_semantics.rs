//! Instruction semantics exercised through the public run loop.

use proptest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

use cpu16_core::{run, run_with_config, CoreConfig, Program, RunResult, RuntimeError};
use rstest::rstest;

const BRK: u8 = 0x00;
const STA: u8 = 0x01;
const LSA: u8 = 0x02;
const STX: u8 = 0x03;
const LSX: u8 = 0x04;
const CTA: u8 = 0x05;
const OTT: u8 = 0x06;
const MUL: u8 = 0x07;
const XTA: u8 = 0x08;
const ORA: u8 = 0x09;
const MULM: u8 = 0x14;
const CLC: u8 = 0x18;
const AND: u8 = 0x29;
const EOR: u8 = 0x49;
const JMP: u8 = 0x4C;
const ADC: u8 = 0x69;
const LDY: u8 = 0xA0;
const LDX: u8 = 0xA2;
const LDA: u8 = 0xA9;
const TAX: u8 = 0xAA;
const CMP: u8 = 0xC9;
const CMPC: u8 = 0xCD;
const CPX: u8 = 0xE0;
const SBC: u8 = 0xE9;
const NOP: u8 = 0xEA;

/// Opcode followed by a little-endian operand word.
fn word(opcode: u8, operand: u16) -> Vec<u8> {
    let [lo, hi] = operand.to_le_bytes();
    vec![opcode, lo, hi]
}

fn program(parts: &[Vec<u8>]) -> Program {
    Program::from(parts.concat())
}

fn run_parts(parts: &[Vec<u8>], inputs: &[u16]) -> RunResult {
    run(&program(parts), inputs, 1000)
}

#[test]
fn load_then_break_halts_with_value() {
    let result = run_parts(&[word(LDA, 5), vec![BRK]], &[]);
    assert!(result.halted);
    assert!(result.error.is_none());
    assert_eq!(result.final_state.a, 5);
    assert_eq!(result.trace.len(), 2);
    assert!(result.trace[1].halted);
    assert_eq!(result.final_state.pc, 4);
}

#[test]
fn console_input_underflow_reads_zero() {
    let result = run_parts(&[vec![CTA], vec![BRK]], &[]);
    assert!(result.halted);
    assert_eq!(result.final_state.a, 0);
    assert!(result.final_state.flags.zero);
}

#[test]
fn console_inputs_are_consumed_in_order() {
    let result = run_parts(&[vec![CTA], vec![TAX], vec![CTA], vec![BRK]], &[11, 22, 33]);
    assert_eq!(result.final_state.x, 11);
    assert_eq!(result.final_state.a, 22);
}

#[test]
fn add_with_carry_wraps_and_sets_carry() {
    let result = run_parts(&[word(LDA, 65535), word(ADC, 2), vec![BRK]], &[]);
    assert_eq!(result.final_state.a, 1);
    let after_adc = result.trace[1].after.expect("ADC retired");
    assert!(after_adc.flags.carry);
    assert!(!after_adc.flags.overflow);
}

#[test]
fn carry_feeds_the_next_addition() {
    let result = run_parts(
        &[word(LDA, 0xFFFF), word(ADC, 1), word(ADC, 0), vec![BRK]],
        &[],
    );
    assert_eq!(result.final_state.a, 1);
    assert!(!result.final_state.flags.carry);
}

#[test]
fn subtract_with_borrow_uses_inverted_carry() {
    // Carry starts clear, so the first SBC also subtracts the borrow.
    let result = run_parts(&[word(LDA, 10), word(SBC, 3), vec![BRK]], &[]);
    assert_eq!(result.final_state.a, 6);
    assert!(result.final_state.flags.carry);

    let result = run_parts(&[word(LDA, 0), word(SBC, 0), vec![BRK]], &[]);
    assert_eq!(result.final_state.a, 0xFFFF);
    assert!(!result.final_state.flags.carry);
    assert!(result.final_state.flags.negative);
}

#[test]
fn signed_overflow_sets_v() {
    let result = run_parts(&[word(LDA, 0x7FFF), word(ADC, 1), vec![BRK]], &[]);
    assert_eq!(result.final_state.a, 0x8000);
    assert!(result.final_state.flags.overflow);
    assert!(result.final_state.flags.negative);
}

#[test]
fn clc_clears_only_carry() {
    let result = run_parts(&[word(LDA, 0xFFFF), word(ADC, 1), vec![CLC], vec![BRK]], &[]);
    assert!(!result.final_state.flags.carry);
    assert!(result.final_state.flags.zero);
}

#[rstest]
#[case(AND, 0b1100, 0b1010, 0b1000)]
#[case(ORA, 0b1100, 0b1010, 0b1110)]
#[case(EOR, 0b1100, 0b1010, 0b0110)]
#[case(AND, 0xFF00, 0x00FF, 0)]
fn logic_ops_update_accumulator(
    #[case] opcode: u8,
    #[case] a: u16,
    #[case] operand: u16,
    #[case] expected: u16,
) {
    let result = run_parts(&[word(LDA, a), word(opcode, operand), vec![BRK]], &[]);
    assert_eq!(result.final_state.a, expected);
    assert_eq!(result.final_state.flags.zero, expected == 0);
}

#[rstest]
#[case(CMP, 5, 5, true, true, false)]
#[case(CMP, 5, 6, false, false, true)]
#[case(CMP, 6, 5, false, true, false)]
#[case(CPX, 0, 1, false, false, true)]
#[case(CPX, 9, 9, true, true, false)]
fn compares_set_flags_without_storing(
    #[case] opcode: u8,
    #[case] register: u16,
    #[case] operand: u16,
    #[case] zero: bool,
    #[case] carry: bool,
    #[case] negative: bool,
) {
    let load = if opcode == CPX { LDX } else { LDA };
    let result = run_parts(&[word(load, register), word(opcode, operand), vec![BRK]], &[]);
    let flags = result.final_state.flags;
    assert_eq!(flags.zero, zero);
    assert_eq!(flags.carry, carry);
    assert_eq!(flags.negative, negative);
    assert_eq!(
        if opcode == CPX {
            result.final_state.x
        } else {
            result.final_state.a
        },
        register
    );
}

#[test]
fn compare_against_memory_cell() {
    let result = run_parts(
        &[
            word(LDA, 40),
            word(STA, 3),
            word(LDA, 41),
            word(CMPC, 3),
            vec![BRK],
        ],
        &[],
    );
    assert!(result.final_state.flags.carry);
    assert!(!result.final_state.flags.zero);
    assert_eq!(result.final_state.a, 41);
}

#[test]
fn store_and_reload_round_trip_through_memory() {
    let result = run_parts(
        &[
            word(LDA, 0x1234),
            word(STA, 7),
            word(LDX, 0x0042),
            word(STX, 8),
            word(LDA, 0),
            word(LSX, 7),
            word(LSA, 8),
            vec![BRK],
        ],
        &[],
    );
    assert_eq!(result.final_state.x, 0x1234);
    assert_eq!(result.final_state.a, 0x0042);
    let store = &result.trace[1];
    assert_eq!(store.memory_used.len(), 1);
    assert_eq!(store.memory_used[0].address, 7);
    assert_eq!(store.memory_used[0].value, 0x1234);
}

#[test]
fn transfers_leave_flags_alone() {
    let result = run_parts(&[word(LDX, 5), word(LDA, 0), vec![XTA], vec![BRK]], &[]);
    assert_eq!(result.final_state.a, 5);
    // Z is still the value LDA 0 left behind.
    assert!(result.final_state.flags.zero);

    let result = run_parts(&[word(LDA, 7), word(LDX, 0), vec![TAX], vec![BRK]], &[]);
    assert_eq!(result.final_state.x, 7);
    assert!(result.final_state.flags.zero);
}

#[test]
fn ldy_loads_y_only() {
    let result = run_parts(&[word(LDY, 0x8000), vec![BRK]], &[]);
    assert_eq!(result.final_state.y, 0x8000);
    assert_eq!(result.final_state.a, 0);
    assert!(result.final_state.flags.negative);
}

#[test]
fn multiply_wraps_into_accumulator() {
    let result = run_parts(
        &[
            word(LDA, 300),
            word(STA, 0),
            word(LDA, 300),
            word(MUL, 0),
            vec![BRK],
        ],
        &[],
    );
    assert_eq!(result.final_state.a, 300u16.wrapping_mul(300));
}

#[test]
fn multiply_into_memory_keeps_accumulator() {
    let result = run_parts(
        &[
            word(LDA, 6),
            word(STA, 2),
            word(LDA, 7),
            word(MULM, 2),
            word(OTT, 2),
            vec![BRK],
        ],
        &[],
    );
    assert_eq!(result.final_state.a, 7);
    assert_eq!(result.outputs.len(), 1);
    assert_eq!(result.outputs[0].value, 42);
    assert_eq!(result.outputs[0].address, 2);
}

#[test]
fn outputs_are_recorded_in_order() {
    let result = run_parts(
        &[
            word(LDA, 1),
            word(STA, 0),
            word(OTT, 0),
            word(LDA, 2),
            word(STA, 0),
            word(OTT, 0),
            vec![BRK],
        ],
        &[],
    );
    let values: Vec<_> = result.outputs.iter().map(|out| out.value).collect();
    assert_eq!(values, vec![1, 2]);
}

#[test]
fn jump_loop_is_cut_off_by_step_bound() {
    let result = run(&program(&[vec![NOP], word(JMP, 0)]), &[], 50);
    assert!(!result.halted);
    assert!(result.error.is_none());
    assert_eq!(result.trace.len(), 50);
    assert!(result.trace.iter().all(|entry| !entry.halted));
}

#[test]
fn trace_steps_are_consecutive_from_zero() {
    let result = run_parts(&[vec![NOP], vec![NOP], vec![NOP], vec![BRK]], &[]);
    let steps: Vec<_> = result.trace.iter().map(|entry| entry.step).collect();
    assert_eq!(steps, vec![0, 1, 2, 3]);
    for pair in result.trace.windows(2) {
        assert_eq!(pair[0].after, Some(pair[1].before));
    }
}

#[test]
fn cycles_accumulate_per_instruction_cost() {
    let result = run_parts(&[vec![NOP], word(LDA, 1), word(STA, 0), vec![CLC], vec![BRK]], &[]);
    assert_eq!(result.final_state.cycles, 2 + 2 + 4 + 1 + 7);
}

#[test]
fn running_off_the_end_halts_cleanly() {
    let result = run_parts(&[word(LDA, 9)], &[]);
    assert!(result.halted);
    assert!(result.error.is_none());
    assert_eq!(result.trace.len(), 1);
    assert!(result.trace[0].halted);
}

#[test]
fn invalid_opcode_faults_precisely() {
    let result = run_parts(&[word(LDA, 3), vec![0xFF]], &[]);
    assert!(result.halted);
    assert_eq!(
        result.error,
        Some(RuntimeError::InvalidOpcode {
            opcode: 0xFF,
            pc: 3
        })
    );
    let last = result.trace.last().expect("two steps");
    assert!(last.after.is_none());
    assert_eq!(last.before, result.final_state);
    assert_eq!(result.final_state.a, 3);
}

#[test]
fn out_of_range_store_faults_without_side_effects() {
    let config = CoreConfig::new(100, 4).expect("valid config");
    let result = run_with_config(&program(&[word(LDA, 1), word(STA, 4)]), &[], &config);
    assert_eq!(
        result.error,
        Some(RuntimeError::AddressOutOfRange {
            address: 4,
            limit: 4
        })
    );
    assert_eq!(result.final_state.pc, 3);
    assert_eq!(result.final_state.cycles, 2);
    assert!(result.trace[1].memory_used.is_empty());
}

#[test]
fn out_of_range_output_writes_nothing() {
    let result = run_parts(&[word(OTT, 0x0100)], &[]);
    assert!(result.outputs.is_empty());
    assert!(matches!(
        result.error,
        Some(RuntimeError::AddressOutOfRange { address: 256, .. })
    ));
}

#[test]
fn truncated_operand_is_a_runtime_error() {
    let result = run(&Program::from(vec![NOP, LDA, 0x01]), &[], 10);
    assert_eq!(
        result.error,
        Some(RuntimeError::TruncatedInstruction { pc: 1 })
    );
    assert_eq!(result.trace.len(), 2);
}
