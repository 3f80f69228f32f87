//! Mode selection and orchestration for the VM translator.
//!
//! Implements the single-file-vs-directory rule: a lone `.vm` file gets
//! an infinite-loop terminator and no bootstrap; a directory gets a
//! bootstrap (`SP=256; call Sys.init 0`) followed by every module's
//! translation, concatenated in one output stream, in directory-listing
//! order (module order carries no semantic weight once bootstrap wires
//! up `Sys.init`).

use std::fs;
use std::path::{Path, PathBuf};

use crate::codegen::CodeGenerator;
use crate::error::Error;
use crate::parser::ParserLines;

/// A discovered translation unit: its module name (for static scoping and
/// error messages) and its raw lines.
pub struct Module {
    pub name: String,
    pub lines: Vec<String>,
}

/// Whether `input` names a single `.vm` file or a directory of them.
pub enum Mode {
    SingleFile(PathBuf),
    Directory(PathBuf),
}

/// Resolves `input` to a [`Mode`]: a path to a single `.vm` file is
/// single-file mode; anything else (a directory) is directory mode.
pub fn resolve_mode(input: &Path) -> Mode {
    if input.is_file() {
        Mode::SingleFile(input.to_path_buf())
    } else {
        Mode::Directory(input.to_path_buf())
    }
}

/// Computes the output `.asm` path for a resolved mode.
#[must_use]
pub fn output_path(mode: &Mode) -> PathBuf {
    match mode {
        Mode::SingleFile(path) => path.with_extension("asm"),
        Mode::Directory(dir) => {
            let name = dir.file_name().map_or_else(
                || "out".to_string(),
                |n| n.to_string_lossy().into_owned(),
            );
            dir.join(format!("{name}.asm"))
        }
    }
}

/// Reads a single `.vm` file into a [`Module`] named after its stem.
pub fn read_module(path: &Path) -> Result<Module, Error> {
    let name = path
        .file_stem()
        .map_or_else(|| "Module".to_string(), |s| s.to_string_lossy().into_owned());
    let text = fs::read_to_string(path)?;
    let lines = text.lines().map(str::to_string).collect();
    Ok(Module { name, lines })
}

/// Enumerates every `.vm` file directly inside `dir`, sorted by path for
/// determinism, and reads each into a [`Module`].
pub fn read_directory(dir: &Path) -> Result<Vec<Module>, Error> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("vm"))
        .collect();
    paths.sort();

    paths.iter().map(|path| read_module(path)).collect()
}

/// Translates a single module, appending an infinite-loop terminator.
/// Used in single-file mode, where there is no `Sys.init` bootstrap to
/// hand control to.
pub fn translate_single_file(module: &Module) -> Result<Vec<u8>, Error> {
    let mut gen = CodeGenerator::new(Vec::new());
    translate_module(&mut gen, module)?;
    gen.write_infinite_loop()?;
    gen.flush()?;
    Ok(into_inner(gen))
}

/// Translates every module in `modules`, prefixed by the bootstrap.
/// Used in directory mode, where `Sys.init` is the entry point and the
/// CPU never falls off the end of the program in the single-file sense.
pub fn translate_directory(modules: &[Module]) -> Result<Vec<u8>, Error> {
    let mut gen = CodeGenerator::new(Vec::new());
    gen.write_bootstrap()?;
    for module in modules {
        translate_module(&mut gen, module)?;
    }
    gen.flush()?;
    Ok(into_inner(gen))
}

fn translate_module(gen: &mut CodeGenerator<Vec<u8>>, module: &Module) -> Result<(), Error> {
    gen.set_module(module.name.clone());
    let mut parser = ParserLines::new(&module.lines, &module.name);
    while parser.advance() {
        let command = parser.command()?;
        gen.write_command(command, parser.line_number())?;
    }
    Ok(())
}

fn into_inner(mut gen: CodeGenerator<Vec<u8>>) -> Vec<u8> {
    // `flush` on a `Vec<u8>` writer is a no-op; the buffer already holds
    // everything written. Calling it again here keeps this function
    // infallible so callers don't need to thread another `Result`.
    let _ = gen.flush();
    std::mem::take(gen.writer_mut())
}
