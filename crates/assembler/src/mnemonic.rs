//! Mnemonic resolution derived from the core opcode catalog.

use std::collections::HashMap;
use std::sync::OnceLock;

use cpu16_core::{OpcodeDescriptor, OPCODE_TABLE};

fn mnemonic_index() -> &'static HashMap<&'static str, &'static OpcodeDescriptor> {
    static INDEX: OnceLock<HashMap<&'static str, &'static OpcodeDescriptor>> = OnceLock::new();
    INDEX.get_or_init(|| {
        OPCODE_TABLE
            .iter()
            .map(|entry| (entry.mnemonic, entry))
            .collect()
    })
}

/// Resolves a mnemonic to its catalog entry, ignoring ASCII case.
#[must_use]
pub fn resolve_mnemonic(name: &str) -> Option<&'static OpcodeDescriptor> {
    mnemonic_index()
        .get(name.to_ascii_uppercase().as_str())
        .copied()
}
