//! VM Translator - Main Entry Point
//!
//! Lowers VM language commands to Hack assembly.
//!
//! # Usage
//! ```bash
//! vm-translator <input.vm | directory>
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use clap::Parser as ClapParser;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use vm_translator::driver::{self, Mode};
use vm_translator::Error;

/// Translates the stack-based VM language into Hack assembly.
#[derive(ClapParser, Debug)]
#[command(name = "vm-translator")]
struct Cli {
    /// A single `.vm` file, or a directory of `.vm` files. Defaults to
    /// the current working directory.
    input: Option<PathBuf>,
}

fn run(input: &std::path::Path) -> Result<PathBuf, Error> {
    let mode = driver::resolve_mode(input);
    let bytes = match &mode {
        Mode::SingleFile(path) => {
            let module = driver::read_module(path)?;
            driver::translate_single_file(&module)?
        }
        Mode::Directory(dir) => {
            let modules = driver::read_directory(dir)?;
            driver::translate_directory(&modules)?
        }
    };

    let out_path = driver::output_path(&mode);
    let mut file = File::create(&out_path)?;
    file.write_all(&bytes)?;
    file.flush()?;

    Ok(out_path)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let input = cli
        .input
        .unwrap_or_else(|| std::env::current_dir().expect("cannot read current directory"));

    log::info!("translating {}", input.display());
    match run(&input) {
        Ok(out_path) => {
            println!("Translation complete. Output written to {}", out_path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("translation failed: {err}");
            eprintln!("Error: {err}");
            let mode = driver::resolve_mode(&input);
            let orphan = driver::output_path(&mode);
            if orphan.exists() {
                let _ = fs::remove_file(&orphan);
            }
            ExitCode::FAILURE
        }
    }
}
