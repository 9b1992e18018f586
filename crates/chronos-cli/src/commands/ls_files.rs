use std::io::{self, Write};

use anyhow::Result;
use chronos_utils::date::Timestamp;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct LsFilesArgs {
    /// Show everything the index records about each entry
    #[arg(long)]
    verbose: bool,
}

fn format_time(secs: u32, nsecs: u32) -> String {
    format!("{} ({nsecs} ns)", Timestamp::new(i64::from(secs), 0).format_iso())
}

pub fn run(args: &LsFilesArgs) -> Result<i32> {
    let repo = open_repo()?;
    let index = repo.load_index()?;
    let mut out = io::stdout().lock();

    if args.verbose {
        writeln!(
            out,
            "Index file format v{}, containing {} entries.",
            index.version(),
            index.len()
        )?;
    }

    for entry in index.iter() {
        writeln!(out, "{}", entry.path)?;
        if !args.verbose {
            continue;
        }
        let stat = &entry.stat;
        writeln!(out, "  {} with perms: {:o}", entry.mode_type, entry.mode_perms)?;
        writeln!(out, "  on blob: {}", entry.oid)?;
        writeln!(
            out,
            "  created: {}, modified: {}",
            format_time(stat.ctime_secs, stat.ctime_nsecs),
            format_time(stat.mtime_secs, stat.mtime_nsecs)
        )?;
        writeln!(out, "  device: {}, inode: {}", stat.dev, stat.ino)?;
        writeln!(out, "  user: {}  group: {}", stat.uid, stat.gid)?;
        writeln!(
            out,
            "  flags: stage={} assume_valid={}",
            entry.stage.as_u8(),
            entry.assume_valid
        )?;
    }
    Ok(0)
}
