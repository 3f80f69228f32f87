//! Parser module for Hack assembly language
//!
//! Provides zero-copy parsing with performance optimizations:
//! - Byte-level comment detection for speed
//! - Manual whitespace trimming to avoid allocations

use crate::error::Error;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // Command suffix is intentional and clear
pub enum CommandType {
    /// @Xxx where Xxx is either a symbol or a decimal number
    ACommand,
    /// dest=comp;jump
    CCommand,
    /// (Xxx) where Xxx is a symbol
    LCommand,
}

/// Parser for assembly lines with zero-copy string slicing.
///
/// Tracks the 1-based original line number of the current command so
/// callers can produce error messages that point back at the source file
/// even though blank lines and comments are invisible past this point.
pub struct ParserLines<'a> {
    lines: std::iter::Enumerate<std::slice::Iter<'a, String>>,
    current_line: &'a str,
    current_line_number: usize,
    current_command_type: Option<CommandType>,
}

impl<'a> ParserLines<'a> {
    /// Creates a new parser from a slice of lines
    #[inline]
    #[must_use]
    pub fn from_lines(lines: &'a [String]) -> Self {
        Self {
            lines: lines.iter().enumerate(),
            current_line: "",
            current_line_number: 0,
            current_command_type: None,
        }
    }

    /// Advances to the next valid command, skipping comments and whitespace
    #[inline]
    pub fn advance(&mut self) -> Result<bool, Error> {
        for (idx, line) in self.lines.by_ref() {
            if line.is_empty() {
                continue;
            }

            let clean_line = Self::strip_comment(line);
            let trimmed = clean_line.trim();

            if !trimmed.is_empty() {
                self.current_line = trimmed;
                self.current_line_number = idx + 1;
                self.current_command_type = Some(Self::classify_command(trimmed));
                self.validate_current()?;
                return Ok(true);
            }
        }

        self.current_command_type = None;
        Ok(false)
    }

    /// Checks that the classified line is well-formed: L-instructions must
    /// close their parenthesis.
    fn validate_current(&self) -> Result<(), Error> {
        if self.current_command_type == Some(CommandType::LCommand)
            && !self.current_line.ends_with(')')
        {
            return Err(Error::Syntax {
                line: self.current_line_number,
                message: format!("unterminated label {:?}", self.current_line),
            });
        }
        Ok(())
    }

    /// Strips comments from a line using optimized byte scanning
    #[inline]
    fn strip_comment(line: &str) -> &str {
        let bytes = line.as_bytes();

        for i in 0..bytes.len().saturating_sub(1) {
            if bytes[i] == b'/' && bytes[i + 1] == b'/' {
                return &line[..i];
            }
        }

        line
    }

    /// Classifies command type based on first character
    #[inline]
    fn classify_command(line: &str) -> CommandType {
        let first_byte = line.as_bytes()[0];
        match first_byte {
            b'@' => CommandType::ACommand,
            b'(' => CommandType::LCommand,
            _ => CommandType::CCommand,
        }
    }

    /// Returns the current command type
    #[inline]
    pub fn command_type(&self) -> Result<CommandType, Error> {
        self.current_command_type.ok_or_else(|| Error::Syntax {
            line: self.current_line_number,
            message: "no current line available".to_string(),
        })
    }

    /// Returns the 1-based line number of the current command within the
    /// original input.
    #[inline]
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.current_line_number
    }

    /// Returns the symbol from A-command or L-command
    #[inline]
    pub fn symbol(&self) -> Result<&'a str, Error> {
        match self.current_command_type {
            Some(CommandType::ACommand) => Ok(&self.current_line[1..]),
            Some(CommandType::LCommand) => {
                let len = self.current_line.len();
                Ok(&self.current_line[1..len - 1])
            }
            Some(CommandType::CCommand) => Err(Error::Syntax {
                line: self.current_line_number,
                message: "symbol() called on C-command".to_string(),
            }),
            None => Err(Error::Syntax {
                line: self.current_line_number,
                message: "no current line available".to_string(),
            }),
        }
    }

    /// Returns the dest part of a C-command. Empty string means null dest.
    #[inline]
    pub fn dest(&self) -> Result<Option<&'a str>, Error> {
        match self.current_command_type {
            Some(CommandType::CCommand) => Ok(Some(
                self.current_line
                    .find('=')
                    .map_or("", |pos| &self.current_line[..pos]),
            )),
            Some(_) => Ok(None),
            None => Err(Error::Syntax {
                line: self.current_line_number,
                message: "no current line available".to_string(),
            }),
        }
    }

    /// Returns the comp part of a C-command
    #[inline]
    pub fn comp(&self) -> Result<Option<&'a str>, Error> {
        match self.current_command_type {
            Some(CommandType::CCommand) => {
                let start = self.current_line.find('=').map_or(0, |pos| pos + 1);
                let end = self
                    .current_line
                    .find(';')
                    .unwrap_or(self.current_line.len());
                Ok(Some(&self.current_line[start..end]))
            }
            Some(_) => Ok(None),
            None => Err(Error::Syntax {
                line: self.current_line_number,
                message: "no current line available".to_string(),
            }),
        }
    }

    /// Returns the jump part of a C-command. Empty string means no jump.
    #[inline]
    pub fn jump(&self) -> Result<Option<&'a str>, Error> {
        match self.current_command_type {
            Some(CommandType::CCommand) => Ok(Some(
                self.current_line
                    .find(';')
                    .map_or("", |pos| &self.current_line[pos + 1..]),
            )),
            Some(_) => Ok(None),
            None => Err(Error::Syntax {
                line: self.current_line_number,
                message: "no current line available".to_string(),
            }),
        }
    }
}

/// Returns `true` if `symbol` is a syntactically valid symbol name: first
/// character non-digit, remaining characters from `[A-Za-z0-9_.$:]`.
#[must_use]
pub fn is_valid_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => return false,
        Some(c) if is_symbol_char(c) => {}
        _ => return false,
    }
    chars.all(is_symbol_char)
}

#[inline]
fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_classification() {
        assert_eq!(ParserLines::classify_command("@100"), CommandType::ACommand);
        assert_eq!(
            ParserLines::classify_command("(LOOP)"),
            CommandType::LCommand
        );
        assert_eq!(ParserLines::classify_command("D=M"), CommandType::CCommand);
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(ParserLines::strip_comment("@100 // comment"), "@100 ");
        assert_eq!(ParserLines::strip_comment("D=M"), "D=M");
        assert_eq!(ParserLines::strip_comment("// only comment"), "");
    }

    #[test]
    fn test_parser_advance() {
        let lines = vec![
            "// comment".to_string(),
            String::new(),
            "@100".to_string(),
            "D=M // inline comment".to_string(),
        ];
        let mut parser = ParserLines::from_lines(&lines);

        assert!(parser.advance().unwrap());
        assert_eq!(parser.command_type().unwrap(), CommandType::ACommand);
        assert_eq!(parser.symbol().unwrap(), "100");
        assert_eq!(parser.line_number(), 3);

        assert!(parser.advance().unwrap());
        assert_eq!(parser.command_type().unwrap(), CommandType::CCommand);
        assert_eq!(parser.dest().unwrap(), Some("D"));
        assert_eq!(parser.comp().unwrap(), Some("M"));

        assert!(!parser.advance().unwrap());
    }

    #[test]
    fn test_c_command_parsing() {
        let lines = vec!["MD=D+1;JMP".to_string()];
        let mut parser = ParserLines::from_lines(&lines);
        parser.advance().unwrap();

        assert_eq!(parser.dest().unwrap(), Some("MD"));
        assert_eq!(parser.comp().unwrap(), Some("D+1"));
        assert_eq!(parser.jump().unwrap(), Some("JMP"));
    }

    #[test]
    fn test_c_command_no_dest() {
        let lines = vec!["D+1;JMP".to_string()];
        let mut parser = ParserLines::from_lines(&lines);
        parser.advance().unwrap();

        assert_eq!(parser.dest().unwrap(), Some(""));
        assert_eq!(parser.comp().unwrap(), Some("D+1"));
        assert_eq!(parser.jump().unwrap(), Some("JMP"));
    }

    #[test]
    fn test_c_command_no_jump() {
        let lines = vec!["D=D+1".to_string()];
        let mut parser = ParserLines::from_lines(&lines);
        parser.advance().unwrap();

        assert_eq!(parser.dest().unwrap(), Some("D"));
        assert_eq!(parser.comp().unwrap(), Some("D+1"));
        assert_eq!(parser.jump().unwrap(), Some(""));
    }

    #[test]
    fn test_l_command_parsing() {
        let lines = vec!["(LOOP)".to_string()];
        let mut parser = ParserLines::from_lines(&lines);
        parser.advance().unwrap();

        assert_eq!(parser.command_type().unwrap(), CommandType::LCommand);
        assert_eq!(parser.symbol().unwrap(), "LOOP");
    }

    #[test]
    fn test_unterminated_label_is_syntax_error() {
        let lines = vec!["(LOOP".to_string()];
        let mut parser = ParserLines::from_lines(&lines);
        let err = parser.advance().unwrap_err();
        assert!(matches!(err, Error::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_whitespace_handling() {
        let lines = vec!["   @100   ".to_string(), "  D=M  // comment  ".to_string()];
        let mut parser = ParserLines::from_lines(&lines);

        assert!(parser.advance().unwrap());
        assert_eq!(parser.symbol().unwrap(), "100");

        assert!(parser.advance().unwrap());
        assert_eq!(parser.dest().unwrap(), Some("D"));
    }

    #[test]
    fn test_is_valid_symbol() {
        assert!(is_valid_symbol("LOOP"));
        assert!(is_valid_symbol("_var"));
        assert!(is_valid_symbol("a.b$c:d"));
        assert!(!is_valid_symbol("1abc"));
        assert!(!is_valid_symbol(""));
        assert!(!is_valid_symbol("bad char"));
    }
}
