use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct TagArgs {
    /// Create an annotated tag object
    #[arg(short = 'a')]
    annotate: bool,

    /// Message for an annotated tag
    #[arg(short = 'm', value_name = "message")]
    message: Option<String>,

    /// Name of the tag to create; lists tags when omitted
    name: Option<String>,

    /// The object the tag points at
    #[arg(default_value = "HEAD")]
    object: String,
}

pub fn run(args: &TagArgs) -> Result<i32> {
    let repo = open_repo()?;

    let Some(name) = &args.name else {
        if args.annotate || args.message.is_some() {
            bail!("tag name required");
        }
        let mut out = io::stdout().lock();
        for tag in repo.tag_names()? {
            writeln!(out, "{tag}")?;
        }
        return Ok(0);
    };

    let annotation = if args.annotate || args.message.is_some() {
        Some(
            args.message
                .clone()
                .unwrap_or_else(|| format!("Tag {name}")),
        )
    } else {
        None
    };
    repo.create_tag(name, &args.object, annotation.as_deref())?;
    Ok(0)
}
