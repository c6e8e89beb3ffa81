//! Assembly error reporting.
//!
//! Every failure carries the 1-based source line that caused it and formats
//! as `line N: message`. Assembly is all-or-nothing: the first error aborts
//! and no partial program is returned.

use std::fmt;

/// Error produced by any assembler phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleError {
    /// Kind of error.
    pub kind: AssembleErrorKind,
    /// 1-based source line where the error occurred.
    pub line: usize,
}

impl AssembleError {
    /// Creates an error for `line`.
    #[must_use]
    pub const fn new(kind: AssembleErrorKind, line: usize) -> Self {
        Self { kind, line }
    }

    /// Renders the error followed by the offending source line.
    ///
    /// Falls back to the bare message when `line` is not in `source`.
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        source
            .lines()
            .nth(self.line.saturating_sub(1))
            .map_or_else(
                || self.to_string(),
                |text| format!("{self}\n  {:>4} | {}", self.line, text.trim_end()),
            )
    }
}

/// Classification of assembly errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembleErrorKind {
    /// Mnemonic is not in the opcode catalog.
    UnknownOpcode(String),
    /// Label defined more than once.
    DuplicateLabel {
        /// The label name.
        name: String,
        /// Line of the first definition.
        first_definition: usize,
    },
    /// Operand references a label that is never defined.
    UndefinedLabel(String),
    /// Branch target is too far for a signed 8-bit offset.
    OffsetOutOfRange {
        /// Absolute branch target.
        target: u16,
        /// Offset the branch would need.
        offset: i32,
    },
    /// Operand is neither a valid number nor a valid label reference.
    MalformedOperand(String),
    /// Instruction needs an operand but none was given.
    MissingOperand {
        /// Canonical mnemonic.
        mnemonic: &'static str,
    },
    /// Implied instruction was given an operand.
    UnexpectedOperand {
        /// Canonical mnemonic.
        mnemonic: &'static str,
    },
    /// Text before `:` is not a valid label name.
    InvalidLabel(String),
    /// Encoded program would exceed the 16-bit address space.
    ProgramTooLarge {
        /// Size in bytes the program would reach.
        size: usize,
    },
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl fmt::Display for AssembleErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOpcode(name) => write!(f, "unknown opcode '{name}'"),
            Self::DuplicateLabel {
                name,
                first_definition,
            } => write!(
                f,
                "duplicate label '{name}' (first defined at line {first_definition})"
            ),
            Self::UndefinedLabel(name) => write!(f, "undefined label '{name}'"),
            Self::OffsetOutOfRange { target, offset } => write!(
                f,
                "branch target 0x{target:04X} out of range: offset {offset} not in -128..=127"
            ),
            Self::MalformedOperand(text) => write!(f, "malformed operand '{text}'"),
            Self::MissingOperand { mnemonic } => write!(f, "{mnemonic} expects an operand"),
            Self::UnexpectedOperand { mnemonic } => write!(f, "{mnemonic} takes no operand"),
            Self::InvalidLabel(name) => write!(f, "invalid label name '{name}'"),
            Self::ProgramTooLarge { size } => write!(
                f,
                "program too large: {size} bytes exceeds {} byte limit",
                cpu16_core::Program::MAX_BYTES
            ),
        }
    }
}

impl std::error::Error for AssembleError {}
