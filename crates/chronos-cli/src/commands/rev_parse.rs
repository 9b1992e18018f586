use std::io::{self, Write};

use anyhow::Result;
use clap::Args;

use super::{open_repo, parse_object_type};

#[derive(Args)]
pub struct RevParseArgs {
    /// Require (peeling if needed) an object of this type
    #[arg(long = "type", value_name = "type")]
    object_type: Option<String>,

    /// The name to resolve
    name: String,
}

pub fn run(args: &RevParseArgs) -> Result<i32> {
    let repo = open_repo()?;
    let expected = args
        .object_type
        .as_deref()
        .map(parse_object_type)
        .transpose()?;
    let oid = repo.resolve(&args.name, expected, true)?;
    writeln!(io::stdout().lock(), "{oid}")?;
    Ok(0)
}
