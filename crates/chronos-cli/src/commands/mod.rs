pub mod add;
pub mod cat_file;
pub mod check_ignore;
pub mod checkout;
pub mod commit;
pub mod hash_object;
pub mod init;
pub mod log;
pub mod ls_files;
pub mod ls_tree;
pub mod rev_parse;
pub mod rm;
pub mod show_ref;
pub mod status;
pub mod tag;

use anyhow::{anyhow, Result};
use chronos_object::ObjectType;
use chronos_repository::Repository;
use clap::Subcommand;
use tracing::debug;

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty repository
    Init(init::InitArgs),
    /// Provide content of repository objects
    CatFile(cat_file::CatFileArgs),
    /// Compute object ID and optionally create an object from a file
    HashObject(hash_object::HashObjectArgs),
    /// Print the commit history as a Graphviz graph
    Log(log::LogArgs),
    /// List the contents of a tree object
    LsTree(ls_tree::LsTreeArgs),
    /// Write a commit or tree into an empty directory
    Checkout(checkout::CheckoutArgs),
    /// List references
    ShowRef(show_ref::ShowRefArgs),
    /// List or create tags
    Tag(tag::TagArgs),
    /// Resolve a name to an object ID
    RevParse(rev_parse::RevParseArgs),
    /// Show the files in the index
    LsFiles(ls_files::LsFilesArgs),
    /// Report which paths are ignored
    CheckIgnore(check_ignore::CheckIgnoreArgs),
    /// Remove files from the working tree and from the index
    Rm(rm::RmArgs),
    /// Add file contents to the index
    Add(add::AddArgs),
    /// Record the index as a new commit
    Commit(commit::CommitArgs),
    /// Show the working tree status
    Status(status::StatusArgs),
}

/// Find the repository containing the current directory.
pub fn open_repo() -> Result<Repository> {
    let repo = Repository::discover(".")?;
    debug!(git_dir = %repo.git_dir().display(), "opened repository");
    Ok(repo)
}

/// Parse an object type name given on the command line.
pub fn parse_object_type(name: &str) -> Result<ObjectType> {
    ObjectType::from_bytes(name.as_bytes()).map_err(|_| anyhow!("invalid object type '{name}'"))
}

pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Init(args) => init::run(args),
        Commands::CatFile(args) => cat_file::run(args),
        Commands::HashObject(args) => hash_object::run(args),
        Commands::Log(args) => log::run(args),
        Commands::LsTree(args) => ls_tree::run(args),
        Commands::Checkout(args) => checkout::run(args),
        Commands::ShowRef(args) => show_ref::run(args),
        Commands::Tag(args) => tag::run(args),
        Commands::RevParse(args) => rev_parse::run(args),
        Commands::LsFiles(args) => ls_files::run(args),
        Commands::CheckIgnore(args) => check_ignore::run(args),
        Commands::Rm(args) => rm::run(args),
        Commands::Add(args) => add::run(args),
        Commands::Commit(args) => commit::run(args),
        Commands::Status(args) => status::run(args),
    }
}
