//! Hack Assembler - Main Entry Point
//!
//! A two-pass assembler for the Hack assembly language.
//!
//! # Usage
//! ```bash
//! hack-assembler <input.asm>
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use clap::Parser as ClapParser;
use hack_assembler::driver;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Symbolic Hack assembly to 16-bit binary machine code.
#[derive(ClapParser, Debug)]
#[command(name = "hack-assembler")]
struct Cli {
    /// Path to the `.asm` source file. Output is written alongside it with
    /// a `.hack` extension.
    input: PathBuf,
}

fn read_lines(path: &std::path::Path) -> std::io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    reader.lines().collect()
}

fn output_path(input: &std::path::Path) -> PathBuf {
    input.with_extension("hack")
}

fn run(input: &std::path::Path) -> Result<PathBuf, hack_assembler::Error> {
    let lines = read_lines(input)?;
    let output = driver::assemble(&lines)?;

    let output_path = output_path(input);
    let file = File::create(&output_path)?;
    let mut writer = BufWriter::new(file);
    for line in &output {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;

    Ok(output_path)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    log::info!("assembling {}", cli.input.display());
    match run(&cli.input) {
        Ok(output_path) => {
            println!(
                "Assembly completed. Output written to {}",
                output_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("assembly failed: {err}");
            eprintln!("Error: {err}");
            let orphan = output_path(&cli.input);
            if orphan.exists() {
                let _ = fs::remove_file(&orphan);
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_generation() {
        assert_eq!(
            output_path(std::path::Path::new("test.asm")),
            PathBuf::from("test.hack")
        );
        assert_eq!(
            output_path(std::path::Path::new("dir/file.asm")),
            PathBuf::from("dir/file.hack")
        );
    }
}
