//! Deterministic run fingerprint used for cross-host comparison.

use cpu16_core::{run, Program, RunResult};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

/// Reads two inputs, multiplies them, prints the product, counts X down to 0.
const PROGRAM: &[u8] = &[
    0x05, // CTA
    0x01, 0x00, 0x00, // STA 0
    0x05, // CTA
    0x07, 0x00, 0x00, // MUL 0
    0x01, 0x01, 0x00, // STA 1
    0x06, 0x01, 0x00, // OTT 1
    0xA2, 0x04, 0x00, // LDX 4
    0x08, // loop: XTA
    0x18, // CLC
    0x69, 0xFF, 0xFF, // ADC 0xFFFF
    0xAA, // TAX
    0xE0, 0x00, 0x00, // CPX 0
    0xD0, 0xF5, // BNE loop
    0x00, // BRK
];

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

fn fingerprint(result: &RunResult) -> String {
    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    hash_bytes(&mut hash, &result.trace.len().to_le_bytes());

    for entry in &result.trace {
        hash_bytes(&mut hash, &[entry.opcode, u8::from(entry.halted)]);
        if let Some(after) = entry.after {
            hash_bytes(&mut hash, &after.pc.to_le_bytes());
            hash_bytes(&mut hash, &after.a.to_le_bytes());
            hash_bytes(&mut hash, &after.x.to_le_bytes());
            hash_bytes(&mut hash, &[after.p]);
            hash_bytes(&mut hash, &after.cycles.to_le_bytes());
        }
        for cell in &entry.memory_used {
            hash_bytes(&mut hash, &cell.address.to_le_bytes());
            hash_bytes(&mut hash, &cell.value.to_le_bytes());
        }
    }

    for output in &result.outputs {
        hash_bytes(&mut hash, &output.value.to_le_bytes());
        hash_bytes(&mut hash, &output.address.to_le_bytes());
    }

    let halt_tag = match (result.halted, result.error) {
        (false, _) => 0x10,
        (true, None) => 0x11,
        (true, Some(_)) => 0x12,
    };
    hash_bytes(&mut hash, &[halt_tag]);

    format!("{hash:016x}")
}

fn main() {
    let program = Program::from(PROGRAM);
    let result = run(&program, &[6, 7], 1000);
    println!("{}", fingerprint(&result));
}
