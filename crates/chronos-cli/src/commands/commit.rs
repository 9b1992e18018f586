use std::io::{self, Write};

use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct CommitArgs {
    /// Commit message
    #[arg(short = 'm', long = "message", required = true)]
    message: String,
}

pub fn run(args: &CommitArgs) -> Result<i32> {
    let repo = open_repo()?;
    let outcome = repo.commit(&args.message)?;

    let branch = match &outcome.branch {
        Some(branch) => branch.short_name().to_string(),
        None => "detached HEAD".to_string(),
    };
    writeln!(
        io::stdout().lock(),
        "[{} {}] {}",
        branch,
        outcome.oid.short_hex(),
        outcome.summary
    )?;
    Ok(0)
}
