use std::io::{self, Write};

use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct ShowRefArgs {
    /// Only show refs under refs/heads
    #[arg(long)]
    heads: bool,

    /// Only show refs under refs/tags
    #[arg(long)]
    tags: bool,
}

pub fn run(args: &ShowRefArgs) -> Result<i32> {
    let repo = open_repo()?;

    let mut prefixes = Vec::new();
    if args.heads {
        prefixes.push("refs/heads/");
    }
    if args.tags {
        prefixes.push("refs/tags/");
    }
    if prefixes.is_empty() {
        prefixes.push("refs/");
    }

    let mut out = io::stdout().lock();
    let mut found = false;
    for prefix in prefixes {
        for (name, oid) in repo.refs().list_refs(prefix)? {
            writeln!(out, "{oid} {name}")?;
            found = true;
        }
    }
    Ok(if found { 0 } else { 1 })
}
