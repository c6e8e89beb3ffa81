//! Assembly source line parser.
//!
//! Converts raw source lines into structured [`ParsedLine`] items ready for
//! address assignment and encoding. A line holds an optional `name:` label,
//! an optional mnemonic and at most one operand; anything after `#` or `;`
//! is a comment.
//!
//! Numeric literals are decimal, `$`/`0x` hex or `%`/`0b` binary, each in
//! `0..=65535`. Any other operand must be a label reference.

use cpu16_core::{AddressingClass, OpcodeDescriptor};

use crate::errors::{AssembleError, AssembleErrorKind};
use crate::mnemonic::resolve_mnemonic;

/// Operand as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandToken {
    /// Numeric literal.
    Number(u16),
    /// Reference to a label, resolved in pass 2.
    Label(String),
}

/// An instruction with its resolved catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInstruction {
    /// Catalog entry for the mnemonic.
    pub descriptor: &'static OpcodeDescriptor,
    /// Operand, present exactly when the class takes one.
    pub operand: Option<OperandToken>,
}

impl ParsedInstruction {
    /// Encoded size in bytes.
    #[must_use]
    pub const fn size(&self) -> u16 {
        self.descriptor.encoded_size()
    }
}

/// Parsed representation of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Empty or comment-only line.
    Blank,
    /// Label definition on its own line.
    Label {
        /// Label name.
        name: String,
    },
    /// Instruction, optionally preceded by a label on the same line.
    Instruction {
        /// Label defined at the instruction's address.
        label: Option<String>,
        /// The instruction.
        instruction: ParsedInstruction,
    },
}

impl ParsedLine {
    /// Label this line defines, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Blank | Self::Instruction { label: None, .. } => None,
            Self::Label { name }
            | Self::Instruction {
                label: Some(name), ..
            } => Some(name),
        }
    }

    /// Instruction on this line, if any.
    #[must_use]
    pub const fn instruction(&self) -> Option<&ParsedInstruction> {
        match self {
            Self::Instruction { instruction, .. } => Some(instruction),
            Self::Blank | Self::Label { .. } => None,
        }
    }
}

/// Parses a single source line.
///
/// # Errors
///
/// Returns an [`AssembleError`] tagged with `line_number` when the label name
/// is invalid, the mnemonic is unknown, or the operand is missing, unexpected
/// or malformed.
pub fn parse_line(line: &str, line_number: usize) -> Result<ParsedLine, AssembleError> {
    let err = |kind| AssembleError::new(kind, line_number);
    let trimmed = strip_comment(line).trim();

    if trimmed.is_empty() {
        return Ok(ParsedLine::Blank);
    }

    let (label, rest) = match split_label(trimmed) {
        Some((name, rest)) => {
            if !is_valid_label(name) {
                return Err(err(AssembleErrorKind::InvalidLabel(name.to_string())));
            }
            (Some(name.to_string()), rest.trim())
        }
        None => (None, trimmed),
    };

    if rest.is_empty() {
        return Ok(label.map_or(ParsedLine::Blank, |name| ParsedLine::Label { name }));
    }

    let instruction = parse_instruction(rest, line_number)?;
    Ok(ParsedLine::Instruction { label, instruction })
}

/// Parses a numeric literal.
///
/// Accepts decimal, `$`/`0x` hex and `%`/`0b` binary; `None` for anything
/// else, including values above 65535.
#[must_use]
pub fn parse_number(text: &str) -> Option<u16> {
    let (digits, radix) = if let Some(hex) = text
        .strip_prefix('$')
        .or_else(|| text.strip_prefix("0x"))
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if let Some(bin) = text
        .strip_prefix('%')
        .or_else(|| text.strip_prefix("0b"))
        .or_else(|| text.strip_prefix("0B"))
    {
        (bin, 2)
    } else {
        (text, 10)
    };

    // from_str_radix tolerates a leading sign
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    u16::from_str_radix(digits, radix).ok()
}

/// True when `name` can be used as a label.
#[must_use]
pub fn is_valid_label(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn strip_comment(line: &str) -> &str {
    line.find(['#', ';']).map_or(line, |pos| &line[..pos])
}

fn split_label(text: &str) -> Option<(&str, &str)> {
    let colon_pos = text.find(':')?;
    Some((text[..colon_pos].trim(), &text[colon_pos + 1..]))
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

fn parse_instruction(text: &str, line_number: usize) -> Result<ParsedInstruction, AssembleError> {
    let err = |kind| AssembleError::new(kind, line_number);
    let tokens = tokenize(text);
    let Some((&mnemonic, operands)) = tokens.split_first() else {
        return Err(err(AssembleErrorKind::MalformedOperand(text.to_string())));
    };

    let descriptor = resolve_mnemonic(mnemonic)
        .ok_or_else(|| err(AssembleErrorKind::UnknownOpcode(mnemonic.to_string())))?;

    let operand = match (descriptor.class, operands) {
        (AddressingClass::Implied, []) => None,
        (AddressingClass::Implied, _) => {
            return Err(err(AssembleErrorKind::UnexpectedOperand {
                mnemonic: descriptor.mnemonic,
            }));
        }
        (_, []) => {
            return Err(err(AssembleErrorKind::MissingOperand {
                mnemonic: descriptor.mnemonic,
            }));
        }
        (_, [single]) => Some(parse_operand(single, line_number)?),
        (_, many) => {
            return Err(err(AssembleErrorKind::MalformedOperand(many.join(" "))));
        }
    };

    Ok(ParsedInstruction {
        descriptor,
        operand,
    })
}

fn parse_operand(token: &str, line_number: usize) -> Result<OperandToken, AssembleError> {
    let starts_numeric = token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '$' || c == '%');

    if starts_numeric {
        return parse_number(token).map(OperandToken::Number).ok_or_else(|| {
            AssembleError::new(
                AssembleErrorKind::MalformedOperand(token.to_string()),
                line_number,
            )
        });
    }

    if is_valid_label(token) {
        return Ok(OperandToken::Label(token.to_string()));
    }

    Err(AssembleError::new(
        AssembleErrorKind::MalformedOperand(token.to_string()),
        line_number,
    ))
}
