use std::io::Write;
use std::process::{Command, Output};

fn nargs(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nargs"))
        .args(args)
        .output()
        .expect("failed to run nargs")
}

fn commands(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_commands"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run commands")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

// ---------------------------------------------------------------------------
// nargs
// ---------------------------------------------------------------------------

#[test]
fn nargs_collects_every_form() {
    let output = nargs(&[
        "-s", "a", "--string2", "--strings", "x", "y", "--int", "7", "--int2", "--ints", "1",
        "2", "--ints3", "4", "5", "--strings3", "p", "q", "r",
    ]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "--int: 7\n\
         --int2: 5\n\
         --ints: [1 2]\n\
         --ints2: []\n\
         --ints3: [4 5]\n\
         --string: a\n\
         --string2: \n\
         --strings: [x y]\n\
         --strings2: []\n\
         --strings3: [p q r]\n"
    );
}

#[test]
fn nargs_help_exits_zero() {
    let output = nargs(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.starts_with("usage: print [-h|--help]"), "{}", out);
    assert!(out.contains("Prints provided string to stdout"));
    assert!(out.contains("      --int2      Requires 0 or 1 arguments, Default value set. Default: 5\n"));
}

#[test]
fn nargs_error_prints_usage() {
    let output = nargs(&["--ints3", "1"]);
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.starts_with("not enough arguments for --ints3\nusage: print"), "{}", out);
}

#[test]
fn nargs_bad_integer() {
    let output = nargs(&["-i", "x"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("[-i|--int] bad integer value [x]\n"));
}

// ---------------------------------------------------------------------------
// commands
// ---------------------------------------------------------------------------

#[test]
fn command_with_global_counter() {
    let output = commands(&["log", "-c", "3", "-vv"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "verbose: 2\ndry-run: false\nlog 3\n");
}

#[test]
fn command_defaults() {
    let output = commands(&["log", "-c"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "verbose: 0\ndry-run: false\nlog 10\n");
}

#[test]
fn command_is_required() {
    let output = commands(&["-n"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("[repo] command is required\nusage: repo <Command>"));
}

#[test]
fn command_required_argument() {
    let output = commands(&["init"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("[--name] is required\n"));

    let output = commands(&["init", "--name", "demo", "--layout", "flat"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output)
        .starts_with("bad value for [-l|--layout]. Allowed values are [bare full]\n"));

    let output = commands(&["init", "--name", "demo", "-n"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "verbose: 0\ndry-run: true\ninit demo (full)\n");
}

#[test]
fn command_opens_files() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"hello").unwrap();
    let path = file.path().to_str().unwrap();

    let output = commands(&["add", "-w", "2.5", "--files", path, path]);
    assert!(output.status.success(), "{}", stdout(&output));
    assert_eq!(
        stdout(&output),
        "verbose: 0\ndry-run: false\nadd 5 bytes at weight 2.5\nadd 5 bytes at weight 2.5\n"
    );
}

#[test]
fn command_validation_error() {
    let output = commands(&["log", "--count", "0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("count must be positive, got 0\n"));
}

#[test]
fn command_help_hides_disabled_arguments() {
    let output = commands(&["log", "-h"]);
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.starts_with("usage: repo log [-c|--count <integer>]"), "{}", out);
    assert!(out.contains("  -c  --count    Number of entries. Default: 10\n"), "{}", out);
    assert!(!out.contains("--format"));
    assert!(!out.contains("Commands:"));
}

#[test]
fn debug_logging_goes_to_stderr() {
    let output = Command::new(env!("CARGO_BIN_EXE_commands"))
        .args(["log"])
        .env("RUST_LOG", "argparse=debug")
        .output()
        .expect("failed to run commands");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("descending into command"), "{}", stderr);
    assert!(!stdout(&output).contains("descending"));
}
