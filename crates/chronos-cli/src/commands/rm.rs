use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct RmArgs {
    /// Only remove from the index, keep the working tree file
    #[arg(long)]
    cached: bool,

    /// Files to remove
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

pub fn run(args: &RmArgs) -> Result<i32> {
    let repo = open_repo()?;
    repo.rm(&args.paths, !args.cached, false)?;
    Ok(0)
}
