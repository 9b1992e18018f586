use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chronos_object::Object;
use chronos_store::ObjectStore;
use clap::Args;

use super::{open_repo, parse_object_type};

#[derive(Args)]
pub struct HashObjectArgs {
    /// Object type
    #[arg(short = 't', value_name = "type", default_value = "blob")]
    object_type: String,

    /// Actually write the object into the object store
    #[arg(short = 'w')]
    write: bool,

    /// File to hash
    path: PathBuf,
}

pub fn run(args: &HashObjectArgs) -> Result<i32> {
    let object_type = parse_object_type(&args.object_type)?;
    let data = std::fs::read(&args.path)
        .with_context(|| format!("could not read '{}'", args.path.display()))?;

    // Refuse payloads that would not read back as the claimed type.
    Object::parse_content(object_type, &data)?;

    let oid = if args.write {
        open_repo()?.store().write_raw(object_type, &data)?
    } else {
        ObjectStore::hash_only(object_type, &data)?
    };

    writeln!(io::stdout().lock(), "{oid}")?;
    Ok(0)
}
