//! Catalog conformance: every opcode decodes, executes and costs what the
//! cycle table says, starting from a reset core.

use proptest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

use cpu16_core::{descriptor_for_mnemonic, run, AddressingClass, Program, OPCODE_TABLE};
use rstest::rstest;

/// Encodes `mnemonic` with operand word 1 (or offset 0) followed by `BRK`.
fn single_instruction(mnemonic: &str) -> Program {
    let descriptor = descriptor_for_mnemonic(mnemonic).expect("catalog mnemonic");
    let mut bytes = vec![descriptor.code];
    match descriptor.class {
        AddressingClass::Implied => {}
        AddressingClass::Immediate | AddressingClass::Memory => bytes.extend([0x01, 0x00]),
        AddressingClass::Relative => bytes.push(0x00),
    }
    bytes.push(0x00);
    Program::from(bytes)
}

#[rstest]
#[case("BRK", 7, 1)]
#[case("NOP", 2, 1)]
#[case("CLC", 1, 1)]
#[case("TAX", 2, 1)]
#[case("XTA", 2, 1)]
#[case("CTA", 2, 1)]
#[case("LDA", 2, 3)]
#[case("LDX", 2, 3)]
#[case("LDY", 2, 3)]
#[case("ADC", 2, 3)]
#[case("SBC", 2, 3)]
#[case("CMP", 2, 3)]
#[case("CPX", 2, 3)]
#[case("AND", 2, 3)]
#[case("ORA", 2, 3)]
#[case("EOR", 2, 3)]
#[case("JMP", 3, 1)]
#[case("CMPC", 4, 3)]
#[case("STA", 4, 3)]
#[case("LSA", 4, 3)]
#[case("STX", 4, 3)]
#[case("LSX", 4, 3)]
#[case("OTT", 4, 3)]
#[case("MUL", 4, 3)]
#[case("MULM", 6, 3)]
#[case("BEQ", 2, 2)]
#[case("BNE", 3, 2)]
#[case("BCS", 2, 2)]
#[case("BCC", 3, 2)]
#[case("BMI", 2, 2)]
#[case("BPL", 3, 2)]
#[case("BVS", 2, 2)]
#[case("BVC", 3, 2)]
fn first_step_cost_and_next_pc(
    #[case] mnemonic: &str,
    #[case] cycles: u64,
    #[case] next_pc: u16,
) {
    let result = run(&single_instruction(mnemonic), &[], 1);

    assert_eq!(result.trace.len(), 1, "{mnemonic}");
    let entry = &result.trace[0];
    assert!(entry.error.is_none(), "{mnemonic}: {:?}", entry.error);
    let after = entry.after.expect("retired step has an after snapshot");
    assert_eq!(after.cycles, cycles, "{mnemonic}");
    assert_eq!(after.pc, next_pc, "{mnemonic}");
    assert_eq!(entry.opcode, single_instruction(mnemonic).as_bytes()[0]);
}

#[test]
fn every_catalog_entry_executes_without_fault() {
    for entry in OPCODE_TABLE {
        let result = run(&single_instruction(entry.mnemonic), &[], 1);
        assert!(result.error.is_none(), "{}", entry.mnemonic);
        assert_eq!(result.trace.len(), 1, "{}", entry.mnemonic);
    }
}

#[test]
fn only_brk_halts_on_its_first_step() {
    for entry in OPCODE_TABLE {
        let result = run(&single_instruction(entry.mnemonic), &[], 1);
        assert_eq!(result.halted, entry.mnemonic == "BRK", "{}", entry.mnemonic);
    }
}
