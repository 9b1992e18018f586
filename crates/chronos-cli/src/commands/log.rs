use std::collections::HashSet;
use std::io::{self, Write};

use anyhow::Result;
use chronos_object::ObjectType;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct LogArgs {
    /// Commit to start at
    #[arg(default_value = "HEAD")]
    commit: String,
}

/// Escape a label for a double-quoted Graphviz string.
fn escape_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

pub fn run(args: &LogArgs) -> Result<i32> {
    let repo = open_repo()?;
    let start = repo.resolve(&args.commit, Some(ObjectType::Commit), true)?;

    let mut out = io::stdout().lock();
    writeln!(out, "digraph chronoslog{{")?;
    writeln!(out, "  node[shape=rect]")?;

    let mut seen = HashSet::new();
    let mut pending = vec![start];
    while let Some(oid) = pending.pop() {
        if !seen.insert(oid) {
            continue;
        }
        let commit = repo.read_commit(&oid)?;
        let summary = escape_label(&commit.summary().to_string());
        writeln!(out, "  c_{oid} [label=\"{}: {summary}\"]", oid.short_hex())?;

        for parent in commit.parents() {
            writeln!(out, "  c_{oid} -> c_{parent}")?;
        }
        pending.extend(commit.parents().iter().rev().copied());
    }

    writeln!(out, "}}")?;
    Ok(0)
}
