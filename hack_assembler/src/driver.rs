//! Two-pass assembler driver.
//!
//! Pass 1 binds every label to its ROM address. Pass 2 re-parses the same
//! lines, resolving symbols and emitting one 16-character binary line per
//! A/C instruction. L-instructions contribute no output.

use crate::code;
use crate::error::Error;
use crate::parser::{is_valid_symbol, CommandType, ParserLines};
use crate::symbol_table::SymbolTable;

/// Runs both passes over `lines` and returns the emitted `.hack` lines.
///
/// # Errors
/// Propagates any [`Error`] raised while parsing or encoding an
/// instruction (syntax errors, label redefinition, address space
/// exhaustion, out-of-range numeric operands).
pub fn assemble(lines: &[String]) -> Result<Vec<String>, Error> {
    let mut symbols = SymbolTable::new();
    first_pass(lines, &mut symbols)?;
    second_pass(lines, &mut symbols)
}

/// Pass 1: record the ROM address of every label. L-instructions do not
/// advance the program counter; A/C instructions do.
fn first_pass(lines: &[String], symbols: &mut SymbolTable) -> Result<(), Error> {
    let mut rom_address: u16 = 0;
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance()? {
        match parser.command_type()? {
            CommandType::LCommand => {
                let label = parser.symbol()?;
                symbols.bind_label(label, rom_address, parser.line_number())?;
            }
            CommandType::ACommand | CommandType::CCommand => {
                rom_address += 1;
            }
        }
    }

    Ok(())
}

/// Pass 2: resolve every A-instruction operand and encode every real
/// instruction. Must not mutate label bindings established in pass 1.
fn second_pass(lines: &[String], symbols: &mut SymbolTable) -> Result<Vec<String>, Error> {
    let mut output = Vec::with_capacity(lines.len());
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance()? {
        match parser.command_type()? {
            CommandType::ACommand => {
                let symbol = parser.symbol()?;
                let line = parser.line_number();
                let address = resolve_a_operand(symbol, symbols, line)?;
                output.push(code::encode_a_instruction(address));
            }
            CommandType::CCommand => {
                let line = parser.line_number();
                let dest = parser.dest()?.unwrap_or("");
                let comp = parser.comp()?.unwrap_or("");
                let jump = parser.jump()?.unwrap_or("");
                output.push(code::encode_c_instruction(dest, comp, jump, line)?);
            }
            CommandType::LCommand => {}
        }
    }

    Ok(output)
}

/// Resolves an A-instruction operand: a decimal literal in `[0, 32767]`, or
/// a symbol looked up (and allocated as a variable if first-seen).
fn resolve_a_operand(symbol: &str, symbols: &mut SymbolTable, line: usize) -> Result<u16, Error> {
    if symbol.bytes().all(|b| b.is_ascii_digit()) {
        let value: i64 = symbol.parse().map_err(|_| Error::Syntax {
            line,
            message: format!("malformed numeric operand {symbol:?}"),
        })?;
        if !(0..=32767).contains(&value) {
            return Err(Error::OutOfRange { value, line });
        }
        return Ok(value as u16);
    }

    if !is_valid_symbol(symbol) {
        return Err(Error::Syntax {
            line,
            message: format!("invalid symbol name {symbol:?}"),
        });
    }

    symbols.get_or_insert(symbol)
}
