use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use bstr::ByteSlice;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct CheckIgnoreArgs {
    /// Paths to check
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

pub fn run(args: &CheckIgnoreArgs) -> Result<i32> {
    let repo = open_repo()?;
    let rules = repo.ignore_rules(&repo.load_index()?)?;

    let mut out = io::stdout().lock();
    let mut any = false;
    for path in &args.paths {
        let relative = repo.relative_path(path)?;
        if rules.is_ignored(relative.as_bstr())? {
            writeln!(out, "{}", path.display())?;
            any = true;
        }
    }
    Ok(if any { 0 } else { 1 })
}
