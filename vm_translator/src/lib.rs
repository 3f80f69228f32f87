//! VM Translator for the `Nand2Tetris` course
//!
//! Lowers the stack-based VM language onto Hack assembly.
//!
//! # Architecture
//!
//! - [`parser`]: Zero-copy tokenizing of VM commands
//! - [`codegen`]: Emits Hack assembly for every command, segment, and the
//!   full function-call protocol
//! - [`driver`]: Single-file vs. directory mode selection, bootstrap,
//!   module enumeration
//! - [`error`]: The fatal error taxonomy (IO, Syntax, PopConstant,
//!   TempIndex, PointerIndex)
//!
//! # Example
//!
//! ```rust
//! use vm_translator::driver::{translate_single_file, Module};
//!
//! let module = Module {
//!     name: "Test".to_string(),
//!     lines: vec!["push constant 7".to_string()],
//! };
//! let asm = translate_single_file(&module).unwrap();
//! assert!(String::from_utf8(asm).unwrap().contains("INFINITE_LOOP"));
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::inline_always,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod codegen;
pub mod driver;
pub mod error;
pub mod parser;

pub use error::Error;
pub use parser::{Command, Segment};
