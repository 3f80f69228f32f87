//! Error taxonomy for the VM translator.

use thiserror::Error;

/// Fatal error raised while parsing or translating a VM module.
///
/// Every variant that originates from a specific input line carries the
/// originating module name and the 1-based line number within that
/// module's original (pre-strip) text, so the message can point back at
/// the source even though blank lines and comments never reach the
/// parser.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("syntax error in {module} line {line}: {message}")]
    Syntax {
        module: String,
        line: usize,
        message: String,
    },

    #[error("cannot pop into constant segment ({module} line {line})")]
    PopConstant { module: String, line: usize },

    #[error("temp index {index} out of range 0..8 ({module} line {line})")]
    TempIndex {
        index: u16,
        module: String,
        line: usize,
    },

    #[error("pointer index {index} not in {{0,1}} ({module} line {line})")]
    PointerIndex {
        index: u16,
        module: String,
        line: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
