//! End-to-end behavior: assemble source text, run it, inspect the result.

use cpu16_asm::{assemble, AssembleErrorKind};
use cpu16_core::{run, RuntimeError};
use rstest::rstest;
use serde_json as _;
use tempfile as _;

fn assemble_ok(source: &str) -> cpu16_core::Program {
    assemble(source).unwrap_or_else(|e| panic!("assembly failed: {e}"))
}

#[test]
fn assemble_is_deterministic() {
    let source = "start: CTA\nSTA 1\nOTT 1\nCMP 0\nBNE start\nBRK\n";
    assert_eq!(assemble(source), assemble(source));
}

#[test]
fn run_is_deterministic() {
    let program = assemble_ok("start: CTA\nSTA 1\nOTT 1\nCMP 0\nBNE start\nBRK\n");
    let first = run(&program, &[4, 9, 0], 100);
    let second = run(&program, &[4, 9, 0], 100);
    assert_eq!(first, second);
}

#[test]
fn console_input_underflow_reads_zero() {
    let result = run(&assemble_ok("CTA\nBRK"), &[], 10);
    assert!(result.halted);
    assert!(result.error.is_none());
    assert_eq!(result.final_state.a, 0);
    assert!(result.final_state.flags.zero);
}

#[test]
fn load_then_break() {
    let result = run(&assemble_ok("LDA 5\nBRK"), &[], 10);
    assert!(result.halted);
    assert!(result.error.is_none());
    assert_eq!(result.final_state.a, 5);
    assert_eq!(result.trace.len(), 2);
    assert!(result.trace[1].halted);
}

#[test]
fn endless_loop_is_bounded() {
    let result = run(&assemble_ok("loop:\nNOP\nJMP loop"), &[], 50);
    assert!(!result.halted);
    assert!(result.error.is_none());
    assert_eq!(result.trace.len(), 50);
}

#[test]
fn adc_wraps_and_sets_carry() {
    let result = run(&assemble_ok("LDA 65535\nADC 2\nBRK"), &[], 10);
    assert_eq!(result.final_state.a, 1);
    let after_adc = result.trace[1].after.expect("ADC retired");
    assert!(after_adc.flags.carry);
    assert!(!after_adc.flags.zero);
}

#[test]
fn echo_program_copies_inputs_to_outputs() {
    let source = "\
; echo inputs until a zero arrives
next:   CTA
        BEQ done
        STA $10
        OTT $10
        JMP next
done:   BRK
";
    let result = run(&assemble_ok(source), &[3, 7, 0, 9], 100);

    assert!(result.halted);
    let values: Vec<_> = result.outputs.iter().map(|o| o.value).collect();
    assert_eq!(values, vec![3, 7]);
    assert!(result.outputs.iter().all(|o| o.address == 0x10));
}

#[test]
fn multiply_accumulates_in_memory() {
    let source = "\
        LDA 6
        STA 0
        LDA 7
        MULM 0
        LSX 0
        BRK
";
    let result = run(&assemble_ok(source), &[], 20);
    assert_eq!(result.final_state.a, 7);
    assert_eq!(result.final_state.x, 42);
}

#[test]
fn store_past_memory_faults_precisely() {
    let result = run(&assemble_ok("LDA 1\nSTA 256\nBRK"), &[], 10);
    assert!(result.halted);
    assert_eq!(
        result.error,
        Some(RuntimeError::AddressOutOfRange {
            address: 256,
            limit: 256
        })
    );
    let last = result.trace.last().expect("faulting step recorded");
    assert!(last.after.is_none());
    assert_eq!(result.final_state.pc, 3);
}

#[test]
fn branch_beyond_offset_range_is_rejected() {
    let mut source = String::from("BNE far\n");
    source.push_str(&"NOP\n".repeat(200));
    source.push_str("far: BRK\n");

    let err = assemble(&source).expect_err("offset out of range");
    assert_eq!(err.line, 1);
    assert!(matches!(
        err.kind,
        AssembleErrorKind::OffsetOutOfRange { offset: 200, .. }
    ));
}

#[test]
fn branch_at_offset_limit_is_accepted() {
    let mut source = String::from("BNE far\n");
    source.push_str(&"NOP\n".repeat(127));
    source.push_str("far: BRK\n");

    let program = assemble_ok(&source);
    assert_eq!(&program.as_bytes()[..2], &[0xD0, 0x7F]);
}

#[rstest]
#[case("a:\nNOP\na:\nBRK", AssembleErrorKind::DuplicateLabel { name: "a".to_string(), first_definition: 1 }, 3)]
#[case("NOP\nBEQ nowhere\nBRK", AssembleErrorKind::UndefinedLabel("nowhere".to_string()), 2)]
#[case("LDA 1\nPUSH\n", AssembleErrorKind::UnknownOpcode("PUSH".to_string()), 2)]
#[case("STA", AssembleErrorKind::MissingOperand { mnemonic: "STA" }, 1)]
#[case("BRK 1", AssembleErrorKind::UnexpectedOperand { mnemonic: "BRK" }, 1)]
#[case("LDA 0x1_0", AssembleErrorKind::MalformedOperand("0x1_0".to_string()), 1)]
fn assembly_errors(#[case] source: &str, #[case] kind: AssembleErrorKind, #[case] line: usize) {
    let err = assemble(source).expect_err("invalid source");
    assert_eq!(err.kind, kind);
    assert_eq!(err.line, line);
}
