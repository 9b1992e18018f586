use std::io::{self, Write};

use anyhow::Result;
use bstr::{BString, ByteVec};
use chronos_hash::ObjectId;
use chronos_object::{ObjectError, ObjectType};
use chronos_repository::Repository;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct LsTreeArgs {
    /// Recurse into subtrees, listing only files
    #[arg(short = 'r')]
    recursive: bool,

    /// A tree, or anything that peels to one
    tree: String,
}

pub fn run(args: &LsTreeArgs) -> Result<i32> {
    let repo = open_repo()?;
    let tree = repo.resolve(&args.tree, Some(ObjectType::Tree), true)?;
    let mut out = io::stdout().lock();
    list_tree(&repo, &tree, args.recursive, &BString::default(), &mut out)?;
    Ok(0)
}

fn list_tree(
    repo: &Repository,
    oid: &ObjectId,
    recursive: bool,
    prefix: &BString,
    out: &mut impl Write,
) -> Result<()> {
    let tree = repo.read_tree(oid)?;
    for entry in tree.iter() {
        let kind = entry.mode.object_type().ok_or_else(|| ObjectError::CorruptTree {
            offset: 0,
            reason: format!("weird tree leaf mode {} for '{}'", entry.mode.to_padded(), entry.name),
        })?;

        let mut path = prefix.clone();
        if !path.is_empty() {
            path.push_byte(b'/');
        }
        path.push_str(&entry.name);

        if recursive && kind == ObjectType::Tree {
            list_tree(repo, &entry.oid, recursive, &path, out)?;
        } else {
            writeln!(out, "{} {} {}\t{}", entry.mode.to_padded(), kind, entry.oid, path)?;
        }
    }
    Ok(())
}
