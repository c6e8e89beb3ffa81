#![no_main]

use cpu16_core::{disassemble, run_with_config, CoreConfig, Decoder, Program};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&header, bytes)) = data.split_first() else {
        return;
    };

    // low six bits pick the memory size
    let words = usize::from(header & 0x3F) + 1;
    let Ok(config) = CoreConfig::new(256, words) else {
        return;
    };

    let inputs: Vec<u16> = bytes
        .chunks_exact(2)
        .take(4)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    let program = Program::from(bytes);
    let result = run_with_config(&program, &inputs, &config);
    assert!(result.trace.len() <= config.max_steps());
    assert_eq!(result, run_with_config(&program, &inputs, &config));

    let _ = Decoder::decode(bytes, 0);
    let _ = disassemble(bytes);
});
