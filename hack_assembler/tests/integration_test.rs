use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn run_assembler(asm_path: &std::path::Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_hack-assembler"))
        .arg(asm_path)
        .output()
        .expect("failed to run hack-assembler")
}

#[test]
fn assembles_max_program_to_expected_hack() {
    let dir = tempdir().unwrap();
    let asm_path = dir.path().join("Max.asm");
    fs::write(
        &asm_path,
        "\
// Computes max(R0, R1) and stores it in R2.
@R0
D=M
@R1
D=D-M
@ELSE
D;JGT
@R1
D=M
@R2
M=D
@END
0;JMP
(ELSE)
@R0
D=M
@R2
M=D
(END)
",
    )
    .unwrap();

    let output = run_assembler(&asm_path);
    assert!(output.status.success(), "{:?}", output);

    let hack_path = dir.path().join("Max.hack");
    let generated = fs::read_to_string(&hack_path).unwrap();
    let lines: Vec<&str> = generated.lines().collect();

    // 15 A/C instructions, zero L-instructions in the output.
    assert_eq!(lines.len(), 15);
    assert!(lines.iter().all(|l| l.len() == 16));
    assert!(lines.iter().all(|l| l.chars().all(|c| c == '0' || c == '1')));
}

#[test]
fn fatal_error_leaves_no_output_file() {
    let dir = tempdir().unwrap();
    let asm_path = dir.path().join("Bad.asm");
    fs::write(&asm_path, "D=D%A\n").unwrap();

    let output = run_assembler(&asm_path);
    assert!(!output.status.success());

    let hack_path = dir.path().join("Bad.hack");
    assert!(!hack_path.exists());
}

#[test]
fn missing_input_argument_is_an_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_hack-assembler"))
        .output()
        .expect("failed to run hack-assembler");
    assert!(!output.status.success());
}
