//! Top-level assembler pipeline.
//!
//! 1. **Parse** every line ([`parse_line`]).
//! 2. **Pass 1** lays out addresses and collects labels ([`assign_addresses`]).
//! 3. **Pass 2** encodes each instruction against the finished symbol table.
//!
//! The whole pipeline is a pure function of the source text.

use cpu16_core::Program;

use crate::encoder::encode_instruction;
use crate::errors::AssembleError;
use crate::parser::{parse_line, ParsedLine};
use crate::symbols::{assign_addresses, Assignment, SymbolTable};

/// An entry in the address-to-source listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Address of the first byte.
    pub address: u16,
    /// Encoded bytes.
    pub bytes: Vec<u8>,
    /// 1-based source line.
    pub line: usize,
    /// Source line text with surrounding whitespace removed.
    pub source: String,
}

/// Assembled program together with its listing and labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    /// Encoded program.
    pub program: Program,
    /// One entry per instruction, in address order.
    pub listing: Vec<ListingEntry>,
    /// Label definitions.
    pub symbols: SymbolTable,
}

/// Assembles source text into a program.
///
/// # Errors
///
/// Returns the first [`AssembleError`] in line order from parsing, then
/// pass 1, then pass 2. No partial program is produced.
pub fn assemble(source: &str) -> Result<Program, AssembleError> {
    assemble_with_listing(source).map(|assembly| assembly.program)
}

/// Assembles source text and keeps the listing and symbol table.
///
/// # Errors
///
/// Same as [`assemble`].
pub fn assemble_with_listing(source: &str) -> Result<Assembly, AssembleError> {
    let parsed = source
        .lines()
        .enumerate()
        .map(|(index, line)| parse_line(line, index + 1))
        .collect::<Result<Vec<ParsedLine>, _>>()?;

    let assignment = assign_addresses(&parsed)?;
    let (bytes, listing) = encode_pass2(&assignment, source)?;

    Ok(Assembly {
        program: Program::new(bytes),
        listing,
        symbols: assignment.symbols,
    })
}

fn encode_pass2(
    assignment: &Assignment,
    source: &str,
) -> Result<(Vec<u8>, Vec<ListingEntry>), AssembleError> {
    let texts: Vec<&str> = source.lines().collect();
    let mut binary = Vec::with_capacity(assignment.end_address);
    let mut listing = Vec::new();

    for addressed in &assignment.lines {
        let Some(instruction) = addressed.parsed.instruction() else {
            continue;
        };

        let bytes = encode_instruction(
            instruction,
            &assignment.symbols,
            addressed.address,
            addressed.source_line,
        )?;

        binary.extend_from_slice(&bytes);
        listing.push(ListingEntry {
            address: addressed.address,
            bytes,
            line: addressed.source_line,
            source: texts
                .get(addressed.source_line - 1)
                .map_or_else(String::new, |text| text.trim().to_string()),
        });
    }

    Ok((binary, listing))
}
