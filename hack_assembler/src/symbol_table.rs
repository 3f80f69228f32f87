//! Symbol table module for Hack assembler
//!
//! Uses a hybrid approach for optimal performance:
//! - PHF (Perfect Hash Function) for predefined symbols - O(1) compile-time lookup
//! - Standard `HashMap` for user-defined symbols - dynamic insertion

use crate::error::Error;
use phf::phf_map;
use std::collections::HashMap;
use std::fmt;

const FIRST_VARIABLE_ADDRESS: u16 = 16;
const LAST_VARIABLE_ADDRESS: u16 = 16383;

/// Predefined symbols with compile-time perfect hash.
///
/// These symbols are built into the Hack platform and never change.
static PREDEFINED_SYMBOLS: phf::Map<&'static str, u16> = phf_map! {
    // Virtual registers
    "R0" => 0,
    "R1" => 1,
    "R2" => 2,
    "R3" => 3,
    "R4" => 4,
    "R5" => 5,
    "R6" => 6,
    "R7" => 7,
    "R8" => 8,
    "R9" => 9,
    "R10" => 10,
    "R11" => 11,
    "R12" => 12,
    "R13" => 13,
    "R14" => 14,
    "R15" => 15,

    // Special pointers
    "SP" => 0,
    "LCL" => 1,
    "ARG" => 2,
    "THIS" => 3,
    "THAT" => 4,

    // I/O pointers
    "SCREEN" => 16384,
    "KBD" => 24576,
};

/// Symbol table for the Hack assembler.
///
/// Maintains mappings between symbolic labels and numeric addresses.
/// Predefined symbols always win over user labels of the same name;
/// rebinding a predefined name is a silent no-op, not an error.
#[derive(Debug)]
pub struct SymbolTable {
    /// User-defined symbols (labels and variables).
    user_symbols: HashMap<String, u16>,
    next_variable: u16,
}

impl Default for SymbolTable {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolTable({} user symbols)", self.user_symbols.len())
    }
}

impl SymbolTable {
    /// Creates a new symbol table. Predefined symbols are available via
    /// PHF, so no initialization is needed for them; the variable
    /// allocator starts at RAM[16].
    #[must_use]
    pub fn new() -> Self {
        Self {
            user_symbols: HashMap::with_capacity(32),
            next_variable: FIRST_VARIABLE_ADDRESS,
        }
    }

    /// Checks if a symbol exists (either predefined or user-defined)
    #[inline]
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        PREDEFINED_SYMBOLS.contains_key(symbol) || self.user_symbols.contains_key(symbol)
    }

    /// Gets the address associated with a symbol, or `None` if unbound.
    #[inline]
    #[must_use]
    pub fn get_address(&self, symbol: &str) -> Option<u16> {
        PREDEFINED_SYMBOLS
            .get(symbol)
            .copied()
            .or_else(|| self.user_symbols.get(symbol).copied())
    }

    /// Binds a label (from an L-instruction) to a ROM address.
    ///
    /// If `symbol` collides with a predefined name, the predefined binding
    /// wins and this call is a silent no-op.
    /// Rebinding a label already bound to a *different* address is
    /// [`Error::Redefinition`]; rebinding it to the same address (e.g. a
    /// duplicate `(LOOP)` at the same spot) is a no-op.
    pub fn bind_label(&mut self, symbol: &str, address: u16, line: usize) -> Result<(), Error> {
        if PREDEFINED_SYMBOLS.contains_key(symbol) {
            return Ok(());
        }

        match self.user_symbols.get(symbol) {
            Some(&existing) if existing != address => Err(Error::Redefinition {
                label: symbol.to_string(),
                line,
                existing,
            }),
            Some(_) => Ok(()),
            None => {
                self.user_symbols.insert(symbol.to_string(), address);
                Ok(())
            }
        }
    }

    /// Gets or allocates a variable address for `symbol`.
    ///
    /// This is the hot path for A-instruction resolution in pass 2:
    /// predefined symbols and previously-bound labels/variables are
    /// returned as-is; a first-seen symbol is allocated the next free
    /// RAM address starting at 16.
    ///
    /// # Errors
    /// Returns [`Error::AddressSpace`] if the variable allocator has
    /// exhausted the `[16, 16383]` range.
    pub fn get_or_insert(&mut self, symbol: &str) -> Result<u16, Error> {
        if let Some(&addr) = PREDEFINED_SYMBOLS.get(symbol) {
            return Ok(addr);
        }

        use std::collections::hash_map::Entry;
        match self.user_symbols.entry(symbol.to_string()) {
            Entry::Occupied(e) => Ok(*e.get()),
            Entry::Vacant(e) => {
                if self.next_variable > LAST_VARIABLE_ADDRESS {
                    return Err(Error::AddressSpace {
                        symbol: symbol.to_string(),
                    });
                }
                let addr = self.next_variable;
                self.next_variable += 1;
                Ok(*e.insert(addr))
            }
        }
    }

    /// Returns the number of user-defined symbols (labels + variables).
    #[inline]
    #[must_use]
    pub fn user_symbol_count(&self) -> usize {
        self.user_symbols.len()
    }

    /// Returns the total number of predefined symbols (23).
    #[inline]
    #[must_use]
    pub const fn predefined_symbol_count() -> usize {
        PREDEFINED_SYMBOLS.len()
    }

    #[cfg(test)]
    pub(crate) fn set_next_variable_for_test(&mut self, value: u16) {
        self.next_variable = value;
    }
}
