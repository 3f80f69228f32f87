//! Parser module for the VM language.
//!
//! Tokenizes whitespace-delimited VM commands with zero-copy string
//! slicing, mirroring the line-stripping idiom of the Hack assembler's
//! own parser: `//` comments and blank lines never reach the caller, and
//! the original (pre-strip) line number is retained for error messages.

use crate::error::Error;

/// One of the eight VM memory segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Argument,
    Local,
    Static,
    Constant,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    #[must_use]
    pub fn from_str(segment: &str) -> Option<Self> {
        match segment {
            "argument" => Some(Self::Argument),
            "local" => Some(Self::Local),
            "static" => Some(Self::Static),
            "constant" => Some(Self::Constant),
            "this" => Some(Self::This),
            "that" => Some(Self::That),
            "pointer" => Some(Self::Pointer),
            "temp" => Some(Self::Temp),
            _ => None,
        }
    }
}

/// The nine arithmetic/logic opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl ArithmeticOp {
    fn from_str(op: &str) -> Option<Self> {
        match op {
            "add" => Some(Self::Add),
            "sub" => Some(Self::Sub),
            "neg" => Some(Self::Neg),
            "eq" => Some(Self::Eq),
            "gt" => Some(Self::Gt),
            "lt" => Some(Self::Lt),
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "not" => Some(Self::Not),
            _ => None,
        }
    }
}

/// A fully parsed VM command, borrowing names/segments from the input line.
#[derive(Debug, Clone, Copy)]
pub enum Command<'a> {
    Arithmetic(ArithmeticOp),
    Push { segment: Segment, index: u16 },
    Pop { segment: Segment, index: u16 },
    Label(&'a str),
    Goto(&'a str),
    IfGoto(&'a str),
    Function { name: &'a str, n_vars: u16 },
    Call { name: &'a str, n_args: u16 },
    Return,
}

/// Parser over a slice of raw input lines belonging to a single module.
///
/// `module` is carried purely for error messages (static-variable scoping
/// lives in codegen, not here) and is attached to every [`Error`] raised.
pub struct ParserLines<'a> {
    lines: std::iter::Enumerate<std::slice::Iter<'a, String>>,
    module: &'a str,
    current_line: &'a str,
    current_line_number: usize,
}

impl<'a> ParserLines<'a> {
    #[must_use]
    pub fn new(lines: &'a [String], module: &'a str) -> Self {
        Self {
            lines: lines.iter().enumerate(),
            module,
            current_line: "",
            current_line_number: 0,
        }
    }

    /// Advances to the next non-blank, comment-stripped line.
    pub fn advance(&mut self) -> bool {
        for (idx, line) in self.lines.by_ref() {
            let stripped = Self::strip_comment(line);
            let trimmed = stripped.trim();
            if !trimmed.is_empty() {
                self.current_line = trimmed;
                self.current_line_number = idx + 1;
                return true;
            }
        }
        false
    }

    #[inline]
    fn strip_comment(line: &str) -> &str {
        line.find("//").map_or(line, |pos| &line[..pos])
    }

    /// Returns the 1-based original line number of the current command.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.current_line_number
    }

    /// Parses the current line into a [`Command`].
    ///
    /// # Errors
    /// Returns [`Error::Syntax`] for an unrecognized opcode, an
    /// unrecognized segment name, a malformed numeric argument, or a
    /// token count that does not match the opcode's fixed arity.
    pub fn command(&self) -> Result<Command<'a>, Error> {
        let tokens: Vec<&'a str> = self.current_line.split_whitespace().collect();
        let opcode = tokens.first().ok_or_else(|| self.syntax("empty command"))?;

        if let Some(op) = ArithmeticOp::from_str(opcode) {
            self.expect_arity(&tokens, 1)?;
            return Ok(Command::Arithmetic(op));
        }

        match *opcode {
            "push" | "pop" => {
                self.expect_arity(&tokens, 3)?;
                let segment = Segment::from_str(tokens[1])
                    .ok_or_else(|| self.syntax(format!("unknown segment {:?}", tokens[1])))?;
                let index = self.parse_index(tokens[2])?;
                if *opcode == "push" {
                    Ok(Command::Push { segment, index })
                } else {
                    Ok(Command::Pop { segment, index })
                }
            }
            "label" => {
                self.expect_arity(&tokens, 2)?;
                Ok(Command::Label(tokens[1]))
            }
            "goto" => {
                self.expect_arity(&tokens, 2)?;
                Ok(Command::Goto(tokens[1]))
            }
            "if-goto" => {
                self.expect_arity(&tokens, 2)?;
                Ok(Command::IfGoto(tokens[1]))
            }
            "function" => {
                self.expect_arity(&tokens, 3)?;
                let n_vars = self.parse_index(tokens[2])?;
                Ok(Command::Function {
                    name: tokens[1],
                    n_vars,
                })
            }
            "call" => {
                self.expect_arity(&tokens, 3)?;
                let n_args = self.parse_index(tokens[2])?;
                Ok(Command::Call {
                    name: tokens[1],
                    n_args,
                })
            }
            "return" => {
                self.expect_arity(&tokens, 1)?;
                Ok(Command::Return)
            }
            other => Err(self.syntax(format!("unknown opcode {other:?}"))),
        }
    }

    fn expect_arity(&self, tokens: &[&str], arity: usize) -> Result<(), Error> {
        if tokens.len() != arity {
            return Err(self.syntax(format!(
                "expected {} token(s), found {}",
                arity,
                tokens.len()
            )));
        }
        Ok(())
    }

    fn parse_index(&self, token: &str) -> Result<u16, Error> {
        token
            .parse()
            .map_err(|_| self.syntax(format!("invalid numeric argument {token:?}")))
    }

    fn syntax(&self, message: impl Into<String>) -> Error {
        Error::Syntax {
            module: self.module.to_string(),
            line: self.current_line_number,
            message: message.into(),
        }
    }
}
