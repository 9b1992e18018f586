use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use chronos_repository::Repository;
use clap::Args;

#[derive(Args)]
pub struct InitArgs {
    /// Be quiet, only report errors
    #[arg(short, long)]
    quiet: bool,

    /// Directory to create the repository in
    #[arg(default_value = ".")]
    directory: PathBuf,
}

pub fn run(args: &InitArgs) -> Result<i32> {
    let repo = Repository::init(&args.directory)?;
    if !args.quiet {
        let mut out = io::stdout().lock();
        writeln!(
            out,
            "Initialized empty chronos repository in {}/",
            repo.git_dir().display()
        )?;
    }
    Ok(0)
}
