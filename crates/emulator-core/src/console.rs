//! Console device: a finite input queue and an ordered output log.

use crate::api::ConsoleBus;

/// One value written by `OTT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ConsoleOutput {
    /// Word read from memory.
    pub value: u16,
    /// Memory address the word came from.
    pub address: u16,
}

/// Console backed by the caller's input list.
///
/// Inputs are consumed front to back through a cursor and never replenished.
/// Reading past the end yields `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Console<'a> {
    inputs: &'a [u16],
    cursor: usize,
    outputs: Vec<ConsoleOutput>,
}

impl<'a> Console<'a> {
    /// Creates a console over `inputs` with an empty output log.
    #[must_use]
    pub const fn new(inputs: &'a [u16]) -> Self {
        Self {
            inputs,
            cursor: 0,
            outputs: Vec::new(),
        }
    }

    /// Number of inputs not yet consumed.
    #[must_use]
    pub const fn remaining_inputs(&self) -> usize {
        self.inputs.len().saturating_sub(self.cursor)
    }

    /// Outputs in the order they were written.
    #[must_use]
    pub fn outputs(&self) -> &[ConsoleOutput] {
        &self.outputs
    }

    /// Consumes the console and returns its output log.
    #[must_use]
    pub fn into_outputs(self) -> Vec<ConsoleOutput> {
        self.outputs
    }
}

impl ConsoleBus for Console<'_> {
    fn read_input(&mut self) -> u16 {
        let value = self.inputs.get(self.cursor).copied().unwrap_or(0);
        self.cursor = self.cursor.saturating_add(1).min(self.inputs.len());
        value
    }

    fn write_output(&mut self, output: ConsoleOutput) {
        self.outputs.push(output);
    }
}
