use std::io::{self, Write};

use anyhow::Result;
use clap::Args;

use super::{open_repo, parse_object_type};

#[derive(Args)]
pub struct CatFileArgs {
    /// Expected type: blob, tree, commit or tag
    #[arg(value_name = "type")]
    object_type: String,

    /// The object to display
    object: String,
}

pub fn run(args: &CatFileArgs) -> Result<i32> {
    let repo = open_repo()?;
    let object_type = parse_object_type(&args.object_type)?;
    let oid = repo.resolve(&args.object, Some(object_type), true)?;
    let object = repo.read_object(&oid)?;

    let mut out = io::stdout().lock();
    out.write_all(&object.serialize_content())?;
    out.flush()?;
    Ok(0)
}
