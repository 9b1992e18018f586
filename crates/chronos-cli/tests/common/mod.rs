//! Shared harness for chronos-cli integration tests.
//!
//! Identity, date and home directory are pinned so commit ids are the same
//! on every machine.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured output from running a command.
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Path to the compiled `chronos` binary.
pub fn chronos_bin() -> PathBuf {
    let mut path = std::env::current_exe()
        .unwrap()
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf();
    path.push("chronos");
    path
}

fn pin_env(cmd: &mut Command, dir: &Path) {
    cmd.env("CHRONOS_AUTHOR_NAME", "Test Author")
        .env("CHRONOS_AUTHOR_EMAIL", "test@example.com")
        .env("CHRONOS_AUTHOR_DATE", "1234567890 +0000")
        .env("HOME", dir.join(".no-home"))
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("CHRONOS_LOG")
        .env("TZ", "UTC")
        .env("LC_ALL", "C");
}

/// Run the chronos binary in `dir`.
pub fn chronos(dir: &Path, args: &[&str]) -> CommandResult {
    let mut cmd = Command::new(chronos_bin());
    cmd.args(args).current_dir(dir);
    pin_env(&mut cmd, dir);
    let output = cmd.output().expect("failed to run chronos");
    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    }
}

/// Run chronos and assert it succeeded.
pub fn chronos_ok(dir: &Path, args: &[&str]) -> CommandResult {
    let result = chronos(dir, args);
    assert_eq!(
        result.exit_code, 0,
        "chronos {:?} failed:\nstdout: {}\nstderr: {}",
        args, result.stdout, result.stderr
    );
    result
}

/// Initialize a repository in `dir`.
pub fn setup_empty_repo(dir: &Path) {
    chronos_ok(dir, &["init"]);
}

/// A repository with `a.txt` = `hi` committed as "first".
pub fn setup_committed_repo(dir: &Path) {
    setup_empty_repo(dir);
    std::fs::write(dir.join("a.txt"), "hi").unwrap();
    chronos_ok(dir, &["add", "a.txt"]);
    chronos_ok(dir, &["commit", "-m", "first"]);
}
