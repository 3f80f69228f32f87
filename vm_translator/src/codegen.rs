//! Code generation: lowers VM commands to Hack assembly.
//!
//! `CodeGenerator<W>` writes through any `impl Write`, so multiple
//! modules' output can be concatenated into one stream and tests can
//! capture output in a `Vec<u8>` instead of touching disk.

use std::collections::HashMap;
use std::io::Write;

use crate::error::Error;
use crate::parser::{ArithmeticOp, Command, Segment};

/// Per-translation-unit state that must outlive any single command:
/// the comparison counter and call-site counter are monotonic across the
/// *entire* output (directory or single file), never reset per module or
/// per function, so generated labels stay unique.
pub struct CodeGenerator<W: Write> {
    writer: W,
    module: String,
    current_function: Option<String>,
    comparison_counter: u32,
    call_site_counter: HashMap<String, u32>,
}

impl<W: Write> CodeGenerator<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            module: String::new(),
            current_function: None,
            comparison_counter: 0,
            call_site_counter: HashMap::new(),
        }
    }

    /// Scopes subsequent `static` push/pop to `module` (e.g. `Foo.3`).
    pub fn set_module(&mut self, module: impl Into<String>) {
        self.module = module.into();
    }

    /// Lowers one VM command. `line` is the 1-based original line number,
    /// used only to enrich error messages for segment/index faults.
    pub fn write_command(&mut self, command: Command, line: usize) -> Result<(), Error> {
        writeln!(self.writer, "// {command:?}")?;
        match command {
            Command::Arithmetic(op) => self.write_arithmetic(op)?,
            Command::Push { segment, index } => self.write_push(segment, index, line)?,
            Command::Pop { segment, index } => self.write_pop(segment, index, line)?,
            Command::Label(name) => self.write_label(name)?,
            Command::Goto(name) => self.write_goto(name)?,
            Command::IfGoto(name) => self.write_if_goto(name)?,
            Command::Function { name, n_vars } => self.write_function(name, n_vars)?,
            Command::Call { name, n_args } => self.write_call(name, n_args)?,
            Command::Return => self.write_return()?,
        }
        Ok(())
    }

    /// Emits `SP = 256; call Sys.init 0`, the prefix used only in
    /// directory (multi-module) mode.
    pub fn write_bootstrap(&mut self) -> Result<(), Error> {
        write!(self.writer, "@256\nD=A\n@SP\nM=D\n")?;
        self.write_call("Sys.init", 0)?;
        Ok(())
    }

    /// Appends an infinite loop, the terminator used only in single-file
    /// mode so the CPU halts cleanly after the last real instruction.
    pub fn write_infinite_loop(&mut self) -> Result<(), Error> {
        write!(self.writer, "(INFINITE_LOOP)\n@INFINITE_LOOP\n0;JMP\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.writer.flush()?;
        Ok(())
    }

    /// Exposes the underlying writer, e.g. so a caller holding a
    /// `CodeGenerator<Vec<u8>>` can reclaim the buffer once translation
    /// is complete.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    fn write_arithmetic(&mut self, op: ArithmeticOp) -> std::io::Result<()> {
        match op {
            ArithmeticOp::Add => self.write_binary("+"),
            ArithmeticOp::Sub => self.write_binary("-"),
            ArithmeticOp::And => self.write_binary("&"),
            ArithmeticOp::Or => self.write_binary("|"),
            ArithmeticOp::Neg => self.write_unary("-D"),
            ArithmeticOp::Not => self.write_unary("!D"),
            ArithmeticOp::Eq => self.write_comparison("JEQ"),
            ArithmeticOp::Gt => self.write_comparison("JGT"),
            ArithmeticOp::Lt => self.write_comparison("JLT"),
        }
    }

    /// Pops y then x, computes `D = x {op} y` via the R13/R14 scratch
    /// pair, and pushes the result.
    fn write_binary(&mut self, op: &str) -> std::io::Result<()> {
        write!(
            self.writer,
            "@SP\nM=M-1\nA=M\nD=M\n\
             @R14\nM=D\n\
             @SP\nM=M-1\nA=M\nD=M\n\
             @R13\nM=D\n\
             @R13\nD=M\n\
             @R14\nD=D{op}M\n"
        )?;
        self.write_push_d()
    }

    fn write_unary(&mut self, comp: &str) -> std::io::Result<()> {
        self.write_pop_to_d()?;
        writeln!(self.writer, "D={comp}")?;
        self.write_push_d()
    }

    /// Pops y then x, compares `x - y` against zero, and pushes `-1`
    /// (true) or `0` (false). Labels derive from the monotonic
    /// `comparison_counter`, which is never reset, to guarantee
    /// uniqueness across the whole translation unit.
    fn write_comparison(&mut self, jump: &str) -> std::io::Result<()> {
        let k = self.comparison_counter;
        self.comparison_counter += 1;

        write!(
            self.writer,
            "@SP\nM=M-1\nA=M\nD=M\n\
             @R14\nM=D\n\
             @SP\nM=M-1\nA=M\nD=M\n\
             @R13\nM=D\n\
             @R13\nD=M\n\
             @R14\nD=D-M\n\
             @TRUE.{k}\n\
             D;{jump}\n\
             @SP\nA=M\nM=0\n\
             @SP\nM=M+1\n\
             @CONT.{k}\n\
             0;JMP\n\
             (TRUE.{k})\n\
             @SP\nA=M\nM=-1\n\
             @SP\nM=M+1\n\
             (CONT.{k})\n"
        )
    }

    fn write_push(&mut self, segment: Segment, index: u16, line: usize) -> Result<(), Error> {
        match segment {
            Segment::Constant => {
                write!(self.writer, "@{index}\nD=A\n")?;
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = Self::base_symbol(segment);
                write!(self.writer, "@{base}\nD=M\n@{index}\nA=D+A\nD=M\n")?;
            }
            Segment::Temp => {
                let addr = self.temp_address(index, line)?;
                write!(self.writer, "@{addr}\nD=M\n")?;
            }
            Segment::Pointer => {
                let symbol = self.pointer_symbol(index, line)?;
                write!(self.writer, "@{symbol}\nD=M\n")?;
            }
            Segment::Static => {
                write!(self.writer, "@{}.{index}\nD=M\n", self.module)?;
            }
        }
        self.write_push_d()?;
        Ok(())
    }

    fn write_pop(&mut self, segment: Segment, index: u16, line: usize) -> Result<(), Error> {
        match segment {
            Segment::Constant => {
                return Err(Error::PopConstant {
                    module: self.module.clone(),
                    line,
                });
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = Self::base_symbol(segment);
                write!(self.writer, "@{base}\nD=M\n@{index}\nD=D+A\n@R13\nM=D\n")?;
                self.write_pop_to_d()?;
                write!(self.writer, "@R13\nA=M\nM=D\n")?;
            }
            Segment::Temp => {
                let addr = self.temp_address(index, line)?;
                self.write_pop_to_d()?;
                write!(self.writer, "@{addr}\nM=D\n")?;
            }
            Segment::Pointer => {
                let symbol = self.pointer_symbol(index, line)?;
                self.write_pop_to_d()?;
                write!(self.writer, "@{symbol}\nM=D\n")?;
            }
            Segment::Static => {
                self.write_pop_to_d()?;
                write!(self.writer, "@{}.{index}\nM=D\n", self.module)?;
            }
        }
        Ok(())
    }

    fn base_symbol(segment: Segment) -> &'static str {
        match segment {
            Segment::Local => "LCL",
            Segment::Argument => "ARG",
            Segment::This => "THIS",
            Segment::That => "THAT",
            _ => unreachable!("base_symbol called on a non-pointer-based segment"),
        }
    }

    fn temp_address(&self, index: u16, line: usize) -> Result<u16, Error> {
        if index >= 8 {
            return Err(Error::TempIndex {
                index,
                module: self.module.clone(),
                line,
            });
        }
        Ok(5 + index)
    }

    fn pointer_symbol(&self, index: u16, line: usize) -> Result<&'static str, Error> {
        match index {
            0 => Ok("THIS"),
            1 => Ok("THAT"),
            _ => Err(Error::PointerIndex {
                index,
                module: self.module.clone(),
                line,
            }),
        }
    }

    fn write_push_d(&mut self) -> std::io::Result<()> {
        write!(self.writer, "@SP\nA=M\nM=D\n@SP\nM=M+1\n")
    }

    fn write_pop_to_d(&mut self) -> std::io::Result<()> {
        write!(self.writer, "@SP\nM=M-1\nA=M\nD=M\n")
    }

    /// Branch targets are namespaced `FunctionName$label` inside a
    /// function; labels outside any function context use the bare name.
    fn qualify(&self, label: &str) -> String {
        match &self.current_function {
            Some(f) => format!("{f}${label}"),
            None => label.to_string(),
        }
    }

    fn write_label(&mut self, name: &str) -> std::io::Result<()> {
        let label = self.qualify(name);
        writeln!(self.writer, "({label})")
    }

    fn write_goto(&mut self, name: &str) -> std::io::Result<()> {
        let label = self.qualify(name);
        write!(self.writer, "@{label}\n0;JMP\n")
    }

    fn write_if_goto(&mut self, name: &str) -> std::io::Result<()> {
        let label = self.qualify(name);
        self.write_pop_to_d()?;
        write!(self.writer, "@{label}\nD;JNE\n")
    }

    fn write_function(&mut self, name: &str, n_vars: u16) -> std::io::Result<()> {
        writeln!(self.writer, "({name})")?;
        for _ in 0..n_vars {
            write!(self.writer, "@SP\nA=M\nM=0\n@SP\nM=M+1\n")?;
        }
        self.current_function = Some(name.to_string());
        Ok(())
    }

    /// `call g nArgs`: pushes retAddr, LCL, ARG, THIS, THAT, rewires ARG
    /// and LCL, then jumps to `g`. The return-address label is unique per
    /// call site, indexed by a counter keyed on the callee name that
    /// grows monotonically across the whole translation unit.
    fn write_call(&mut self, name: &str, n_args: u16) -> std::io::Result<()> {
        let site = self.call_site_counter.entry(name.to_string()).or_insert(0);
        let k = *site;
        *site += 1;
        let ret_label = format!("{name}$ret.{k}");

        write!(
            self.writer,
            "@{ret_label}\nD=A\n@SP\nA=M\nM=D\n@SP\nM=M+1\n"
        )?;
        for segment in ["LCL", "ARG", "THIS", "THAT"] {
            write!(self.writer, "@{segment}\nD=M\n@SP\nA=M\nM=D\n@SP\nM=M+1\n")?;
        }
        write!(
            self.writer,
            "@SP\nD=M\n@{offset}\nD=D-A\n@ARG\nM=D\n",
            offset = n_args + 5
        )?;
        write!(self.writer, "@SP\nD=M\n@LCL\nM=D\n")?;
        write!(self.writer, "@{name}\n0;JMP\n")?;
        writeln!(self.writer, "({ret_label})")
    }

    /// `return`: captures `retAddr = *(frame - 5)` before any restore
    /// touches `LCL`, since restoring `LCL` first would make that
    /// computation impossible to redo (and, when `nArgs = 0`, the
    /// retAddr slot and `argument 0` occupy the same address once the
    /// frame is torn down).
    fn write_return(&mut self) -> std::io::Result<()> {
        write!(self.writer, "@LCL\nD=M\n@R13\nM=D\n")?;
        write!(self.writer, "@5\nA=D-A\nD=M\n@R14\nM=D\n")?;
        self.write_pop_to_d()?;
        write!(self.writer, "@ARG\nA=M\nM=D\n")?;
        write!(self.writer, "@ARG\nD=M+1\n@SP\nM=D\n")?;
        for segment in ["THAT", "THIS", "ARG", "LCL"] {
            write!(self.writer, "@R13\nAM=M-1\nD=M\n@{segment}\nM=D\n")?;
        }
        write!(self.writer, "@R14\nA=M\n0;JMP\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserLines;

    fn gen_output(module: &str, lines: &[&str]) -> String {
        let lines: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
        let mut parser = ParserLines::new(&lines, module);
        let mut gen = CodeGenerator::new(Vec::new());
        gen.set_module(module);
        while parser.advance() {
            let command = parser.command().unwrap();
            gen.write_command(command, parser.line_number()).unwrap();
        }
        gen.flush().unwrap();
        String::from_utf8(gen.writer).unwrap()
    }

    #[test]
    fn push_constant_emits_literal_load() {
        let out = gen_output("Test", &["push constant 7"]);
        assert!(out.contains("@7"));
        assert!(out.contains("D=A"));
    }

    #[test]
    fn pop_constant_is_an_error() {
        let lines = vec!["pop constant 0".to_string()];
        let mut parser = ParserLines::new(&lines, "Test");
        let mut gen = CodeGenerator::new(Vec::new());
        gen.set_module("Test");
        parser.advance();
        let command = parser.command().unwrap();
        let err = gen.write_command(command, parser.line_number()).unwrap_err();
        assert!(matches!(err, Error::PopConstant { .. }));
    }

    #[test]
    fn pointer_index_out_of_range_is_an_error() {
        let lines = vec!["push pointer 2".to_string()];
        let mut parser = ParserLines::new(&lines, "Test");
        let mut gen = CodeGenerator::new(Vec::new());
        gen.set_module("Test");
        parser.advance();
        let command = parser.command().unwrap();
        let err = gen.write_command(command, parser.line_number()).unwrap_err();
        assert!(matches!(err, Error::PointerIndex { .. }));
    }

    #[test]
    fn temp_index_out_of_range_is_an_error() {
        let lines = vec!["push temp 8".to_string()];
        let mut parser = ParserLines::new(&lines, "Test");
        let mut gen = CodeGenerator::new(Vec::new());
        gen.set_module("Test");
        parser.advance();
        let command = parser.command().unwrap();
        let err = gen.write_command(command, parser.line_number()).unwrap_err();
        assert!(matches!(err, Error::TempIndex { .. }));
    }

    #[test]
    fn pointer_push_dispatches_this_and_that_distinctly() {
        let this_out = gen_output("Test", &["push pointer 0"]);
        let that_out = gen_output("Test", &["push pointer 1"]);
        assert!(this_out.contains("@THIS"));
        assert!(!this_out.contains("@THAT"));
        assert!(that_out.contains("@THAT"));
        assert!(!that_out.contains("@THIS"));
    }

    #[test]
    fn comparison_labels_are_unique_across_calls() {
        let out = gen_output("Test", &["push constant 1", "push constant 1", "eq", "push constant 1", "push constant 2", "eq"]);
        assert!(out.contains("TRUE.0"));
        assert!(out.contains("TRUE.1"));
        assert!(!out.contains("TRUE.2"));
    }

    #[test]
    fn labels_are_namespaced_by_current_function() {
        let out = gen_output("Main", &["function Main.loop 0", "label START", "goto START"]);
        assert!(out.contains("(Main.loop)"));
        assert!(out.contains("(Main.loop$START)"));
        assert!(out.contains("@Main.loop$START"));
    }

    #[test]
    fn static_segment_is_scoped_to_module() {
        let foo = gen_output("Foo", &["push static 3"]);
        let bar = gen_output("Bar", &["push static 3"]);
        assert!(foo.contains("@Foo.3"));
        assert!(bar.contains("@Bar.3"));
        assert!(!foo.contains("@Bar.3"));
    }
}
