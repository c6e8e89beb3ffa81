//! Property tests: bounded, deterministic runs and total decoding.

use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

use cpu16_core::{run, run_with_config, CoreConfig, Decoder, Program, RuntimeError};
use proptest::prelude::*;

proptest! {
    #[test]
    fn trace_never_exceeds_step_bound(
        bytes in proptest::collection::vec(any::<u8>(), 0..64),
        inputs in proptest::collection::vec(any::<u16>(), 0..8),
        max_steps in 0usize..200,
    ) {
        let result = run(&Program::from(bytes), &inputs, max_steps);
        prop_assert!(result.trace.len() <= max_steps);
        if !result.halted {
            prop_assert_eq!(result.trace.len(), max_steps);
            prop_assert!(result.error.is_none());
        }
    }

    #[test]
    fn runs_are_deterministic(
        bytes in proptest::collection::vec(any::<u8>(), 0..64),
        inputs in proptest::collection::vec(any::<u16>(), 0..8),
    ) {
        let program = Program::from(bytes);
        let first = run(&program, &inputs, 300);
        let second = run(&program, &inputs, 300);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn only_the_last_entry_can_halt_or_fail(
        bytes in proptest::collection::vec(any::<u8>(), 1..64),
    ) {
        let result = run(&Program::from(bytes), &[], 300);
        if let Some((last, rest)) = result.trace.split_last() {
            prop_assert!(rest.iter().all(|entry| !entry.halted && entry.error.is_none()));
            prop_assert_eq!(last.error, result.error);
            if result.error.is_some() {
                prop_assert!(last.after.is_none());
                prop_assert_eq!(last.before, result.final_state);
            }
        }
        for (index, entry) in result.trace.iter().enumerate() {
            prop_assert_eq!(entry.step, index);
        }
    }

    #[test]
    fn cycle_counter_never_decreases(
        bytes in proptest::collection::vec(any::<u8>(), 1..64),
    ) {
        let result = run(&Program::from(bytes), &[1, 2, 3], 300);
        for entry in &result.trace {
            if let Some(after) = entry.after {
                prop_assert!(after.cycles > entry.before.cycles);
            }
        }
    }

    #[test]
    fn decode_is_total_over_arbitrary_bytes(
        bytes in proptest::collection::vec(any::<u8>(), 0..8),
        pc in 0u16..10,
    ) {
        match Decoder::decode(&bytes, pc) {
            Ok(instr) => {
                prop_assert_eq!(instr.pc, pc);
                prop_assert!(usize::from(pc) + usize::from(instr.size()) <= bytes.len());
            }
            Err(RuntimeError::InvalidOpcode { pc: at, .. }
                | RuntimeError::TruncatedInstruction { pc: at }) => prop_assert_eq!(at, pc),
            Err(other) => prop_assert!(false, "unexpected decode error {other}"),
        }
    }

    #[test]
    fn memory_faults_name_the_configured_limit(words in 1usize..64, address in any::<u16>()) {
        // LSA address / BRK
        let [lo, hi] = address.to_le_bytes();
        let program = Program::from(vec![0x02, lo, hi, 0x00]);
        let config = CoreConfig::new(10, words).expect("valid config");
        let result = run_with_config(&program, &[], &config);
        if usize::from(address) < words {
            prop_assert!(result.error.is_none());
        } else {
            prop_assert_eq!(
                result.error,
                Some(RuntimeError::AddressOutOfRange { address, limit: words })
            );
        }
    }
}
