use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct CheckoutArgs {
    /// The commit or tree to check out
    commit: String,

    /// An empty or missing directory to write into
    path: PathBuf,
}

pub fn run(args: &CheckoutArgs) -> Result<i32> {
    let repo = open_repo()?;
    repo.checkout(&args.commit, &args.path)?;
    Ok(0)
}
