//! Repository discovery, initialization, and the operations that tie the
//! object store, refs, index and config together.

mod checkout;
mod commit;
mod discover;
mod error;
mod ignore;
mod init;
mod resolve;
mod stage;
mod tag;
mod tree_builder;

pub use commit::CommitOutcome;
pub use error::RepoError;
pub use tree_builder::TreeLeaf;

use std::path::{Path, PathBuf};

use chronos_config::ConfigSet;
use chronos_hash::ObjectId;
use chronos_index::Index;
use chronos_object::{Blob, Commit, Object, ObjectType, Tree};
use chronos_ref::{FileRefStore, Head, RefName};
use chronos_store::ObjectStore;
use chronos_utils::date::{Signature, Timestamp};

pub type Result<T> = std::result::Result<T, RepoError>;

/// Name of the metadata directory inside a working tree.
pub const DOT_DIR: &str = ".git";

/// The only repository format version understood.
pub const FORMAT_VERSION: i64 = 0;

/// The central repository struct tying all subsystems together.
pub struct Repository {
    /// Path to the metadata directory.
    git_dir: PathBuf,
    /// Path to the working tree root.
    work_tree: PathBuf,
    store: ObjectStore,
    refs: FileRefStore,
    /// Merged configuration.
    config: ConfigSet,
    index_path: PathBuf,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("git_dir", &self.git_dir)
            .field("work_tree", &self.work_tree)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Open the repository whose working tree root is `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let (work_tree, git_dir) = discover::open_work_tree(path.as_ref())?;
        Self::from_paths(work_tree, git_dir)
    }

    /// Find a repository at `start` or any of its parents.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self> {
        let (work_tree, git_dir) = discover::discover_git_dir(start.as_ref())?;
        Self::from_paths(work_tree, git_dir)
    }

    /// Create a new repository at `path` and open it.
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let (work_tree, git_dir) = init::init_repository(path.as_ref())?;
        Self::from_paths(work_tree, git_dir)
    }

    fn from_paths(work_tree: PathBuf, git_dir: PathBuf) -> Result<Self> {
        let config = ConfigSet::load(Some(git_dir.as_path()))?;
        let version = config.get_int("core.repositoryformatversion")?.unwrap_or(0);
        if version != FORMAT_VERSION {
            return Err(RepoError::UnsupportedFormatVersion(version));
        }

        let mut store = ObjectStore::open(git_dir.join("objects"));
        if let Some(level) = config.get_int("core.compression")? {
            if let Ok(level) = u32::try_from(level) {
                store.set_compression_level(level.min(9));
            }
        }

        Ok(Self {
            refs: FileRefStore::new(&git_dir),
            index_path: git_dir.join("index"),
            store,
            config,
            work_tree,
            git_dir,
        })
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn refs(&self) -> &FileRefStore {
        &self.refs
    }

    pub fn config(&self) -> &ConfigSet {
        &self.config
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Read the index, or an empty one if none has been written yet.
    pub fn load_index(&self) -> Result<Index> {
        Ok(Index::read_or_default(&self.index_path)?)
    }

    /// Replace the index file wholesale.
    pub fn write_index(&self, index: &Index) -> Result<()> {
        index.write_to(&self.index_path)?;
        Ok(())
    }

    /// Where HEAD points: a branch (possibly unborn) or a detached id.
    pub fn head(&self) -> Result<Head> {
        Ok(self.refs.head()?)
    }

    /// The commit HEAD resolves to; `None` on an unborn branch.
    pub fn head_oid(&self) -> Result<Option<ObjectId>> {
        Ok(self.refs.resolve_ref(&RefName::head())?)
    }

    pub fn current_branch(&self) -> Result<Option<RefName>> {
        Ok(self.refs.current_branch()?)
    }

    pub fn read_object(&self, oid: &ObjectId) -> Result<Object> {
        Ok(self.store.read(oid)?)
    }

    /// Read `oid` and require it to be a commit.
    pub fn read_commit(&self, oid: &ObjectId) -> Result<Commit> {
        match self.read_object(oid)? {
            Object::Commit(commit) => Ok(commit),
            other => Err(RepoError::WrongObjectType {
                name: oid.to_hex(),
                expected: ObjectType::Commit,
                actual: other.object_type(),
            }),
        }
    }

    /// Read `oid` and require it to be a blob.
    pub fn read_blob(&self, oid: &ObjectId) -> Result<Blob> {
        match self.read_object(oid)? {
            Object::Blob(blob) => Ok(blob),
            other => Err(RepoError::WrongObjectType {
                name: oid.to_hex(),
                expected: ObjectType::Blob,
                actual: other.object_type(),
            }),
        }
    }

    /// Read `oid` and require it to be a tree.
    pub fn read_tree(&self, oid: &ObjectId) -> Result<Tree> {
        match self.read_object(oid)? {
            Object::Tree(tree) => Ok(tree),
            other => Err(RepoError::WrongObjectType {
                name: oid.to_hex(),
                expected: ObjectType::Tree,
                actual: other.object_type(),
            }),
        }
    }

    /// The configured `"Name <email>"` identity.
    pub fn identity(&self) -> Result<String> {
        self.config
            .user_identity()?
            .ok_or(RepoError::MissingIdentity)
    }

    /// The current time, or the pinned author date when one is set.
    pub fn timestamp(&self) -> Result<Timestamp> {
        Ok(chronos_config::env::author_date()?.unwrap_or_else(Timestamp::now))
    }

    pub fn signature(&self) -> Result<Signature> {
        Ok(Signature::from_identity(&self.identity()?, self.timestamp()?)?)
    }
}
