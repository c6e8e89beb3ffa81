//! Symbol table and pass-1 address assignment.
//!
//! Walks parsed lines in order with a running byte address starting at 0,
//! records each label at the address of the next instruction and advances
//! the address by every instruction's encoded size.

use std::collections::HashMap;

use cpu16_core::Program;

use crate::errors::{AssembleError, AssembleErrorKind};
use crate::parser::ParsedLine;

/// A label with its assigned address and definition line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    /// The address assigned to this label.
    pub address: u16,
    /// Source line number where the label was defined.
    pub defined_at: usize,
}

/// Symbol table mapping label names to their definitions.
///
/// Names are case-sensitive.
pub type SymbolTable = HashMap<String, Symbol>;

/// A line with its assigned address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressedLine {
    /// Address where this line's bytes begin.
    pub address: u16,
    /// Encoded size in bytes; zero for blank and label-only lines.
    pub size: u16,
    /// The parsed line.
    pub parsed: ParsedLine,
    /// 1-based source line number.
    pub source_line: usize,
}

/// Result of pass-1 address assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// All lines with their assigned addresses.
    pub lines: Vec<AddressedLine>,
    /// Label definitions.
    pub symbols: SymbolTable,
    /// Total program size in bytes.
    pub end_address: usize,
}

/// Byte size of a parsed line.
#[must_use]
pub const fn line_size(parsed: &ParsedLine) -> u16 {
    match parsed {
        ParsedLine::Blank | ParsedLine::Label { .. } => 0,
        ParsedLine::Instruction { instruction, .. } => instruction.size(),
    }
}

/// Performs pass-1 address assignment.
///
/// `lines[i]` is taken to come from source line `i + 1`.
///
/// # Errors
///
/// Returns `DuplicateLabel` for a second definition of a name and
/// `ProgramTooLarge` when the layout passes [`Program::MAX_BYTES`].
pub fn assign_addresses(lines: &[ParsedLine]) -> Result<Assignment, AssembleError> {
    let mut symbols = SymbolTable::new();
    let mut addressed = Vec::with_capacity(lines.len());
    let mut pc: usize = 0;

    for (index, parsed) in lines.iter().enumerate() {
        let source_line = index + 1;
        let size = line_size(parsed);
        let next = pc + usize::from(size);
        if next > Program::MAX_BYTES {
            return Err(AssembleError::new(
                AssembleErrorKind::ProgramTooLarge { size: next },
                source_line,
            ));
        }
        let address = u16::try_from(pc).map_err(|_| {
            AssembleError::new(AssembleErrorKind::ProgramTooLarge { size: pc }, source_line)
        })?;

        if let Some(name) = parsed.label() {
            if let Some(existing) = symbols.get(name) {
                return Err(AssembleError::new(
                    AssembleErrorKind::DuplicateLabel {
                        name: name.to_string(),
                        first_definition: existing.defined_at,
                    },
                    source_line,
                ));
            }
            symbols.insert(
                name.to_string(),
                Symbol {
                    address,
                    defined_at: source_line,
                },
            );
        }

        addressed.push(AddressedLine {
            address,
            size,
            parsed: parsed.clone(),
            source_line,
        });
        pc = next;
    }

    Ok(Assignment {
        lines: addressed,
        symbols,
        end_address: pc,
    })
}
