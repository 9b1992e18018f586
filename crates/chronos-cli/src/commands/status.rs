use std::io::{self, Write};

use anyhow::Result;
use chronos_ref::Head;
use chronos_status::{status, Change};
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct StatusArgs {}

fn write_changes(out: &mut impl Write, title: &str, changes: &[Change]) -> io::Result<()> {
    writeln!(out, "{title}")?;
    for change in changes {
        writeln!(out, "  {:<10}{}", format!("{}:", change.kind), change.path)?;
    }
    Ok(())
}

pub fn run(_args: &StatusArgs) -> Result<i32> {
    let repo = open_repo()?;
    let st = status(&repo)?;
    let mut out = io::stdout().lock();

    match &st.head {
        Head::Branch(branch) => writeln!(out, "On branch {}.", branch.short_name())?,
        Head::Detached(oid) => writeln!(out, "HEAD detached at {oid}")?,
    }

    write_changes(&mut out, "Changes to be committed:", &st.staged)?;
    writeln!(out)?;
    write_changes(&mut out, "Changes not staged for commit:", &st.unstaged)?;
    writeln!(out)?;
    writeln!(out, "Untracked files:")?;
    for path in &st.untracked {
        writeln!(out, "  {path}")?;
    }
    Ok(0)
}
