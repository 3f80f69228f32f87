//! Error types for the Hack assembler pipeline.
//!
//! Every fatal condition (I/O, syntax, address space exhaustion, label
//! redefinition, out-of-range operand) gets its own variant so callers can
//! match on failure kind instead of parsing message text.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("address space exhausted allocating variable {symbol:?}")]
    AddressSpace { symbol: String },

    #[error("label {label:?} redefined at line {line} (was bound to {existing})")]
    Redefinition {
        label: String,
        line: usize,
        existing: u16,
    },

    #[error("numeric operand {value} out of range 0..=32767 at line {line}")]
    OutOfRange { value: i64, line: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
