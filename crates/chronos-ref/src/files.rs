use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chronos_hash::ObjectId;
use chronos_utils::atomic::AtomicFile;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::RefError;
use crate::name::RefName;
use crate::{Head, Reference, Result};

/// Loose-file ref store rooted at a repository's metadata directory.
///
/// Updates replace the ref file through a rename. There is no lock protocol,
/// so concurrent writers to the same ref race with last-writer-wins.
pub struct FileRefStore {
    git_dir: PathBuf,
}

impl FileRefStore {
    pub fn new(git_dir: impl AsRef<Path>) -> Self {
        Self {
            git_dir: git_dir.as_ref().to_path_buf(),
        }
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// File system path of a ref.
    pub fn ref_path(&self, name: &RefName) -> PathBuf {
        name.as_str()
            .split('/')
            .fold(self.git_dir.clone(), |path, part| path.join(part))
    }

    /// Read one ref file without following it. `None` if there is no file.
    pub fn read_ref(&self, name: &RefName) -> Result<Option<Reference>> {
        let path = self.ref_path(name);
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            // A directory such as `refs/heads` is not a ref.
            Err(_) if path.is_dir() => return Ok(None),
            Err(e) => return Err(RefError::IoPath { path, source: e }),
        };

        let trimmed = contents.trim();
        if let Some(target) = trimmed.strip_prefix("ref: ") {
            let target = RefName::new(target.trim()).map_err(|e| RefError::Parse {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
            return Ok(Some(Reference::Symbolic(target)));
        }

        let oid = ObjectId::from_hex(trimmed).map_err(|e| RefError::Parse {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(Reference::Direct(oid)))
    }

    /// Follow `name` through any symbolic refs to an object id.
    ///
    /// A missing file anywhere along the chain yields `Ok(None)`: that is the
    /// state of `HEAD` in a repository without commits. Revisiting a ref
    /// already seen on the chain is [`RefError::SymrefCycle`].
    pub fn resolve_ref(&self, name: &RefName) -> Result<Option<ObjectId>> {
        let mut seen = HashSet::new();
        let mut current = name.clone();
        loop {
            if !seen.insert(current.clone()) {
                return Err(RefError::SymrefCycle(current.to_string()));
            }
            match self.read_ref(&current)? {
                None => return Ok(None),
                Some(Reference::Direct(oid)) => return Ok(Some(oid)),
                Some(Reference::Symbolic(target)) => current = target,
            }
        }
    }

    /// Point `name` directly at `oid`.
    pub fn write_ref(&self, name: &RefName, oid: &ObjectId) -> Result<()> {
        self.write_contents(name, &format!("{}\n", oid.to_hex()))?;
        debug!(%name, %oid, "updated ref");
        Ok(())
    }

    /// Make `name` a symbolic ref to `target`.
    pub fn write_symbolic_ref(&self, name: &RefName, target: &RefName) -> Result<()> {
        self.write_contents(name, &format!("ref: {target}\n"))?;
        debug!(%name, %target, "updated symbolic ref");
        Ok(())
    }

    /// Every ref below `prefix` (e.g. `refs` or `refs/tags`) with the id it
    /// resolves to, sorted by name. Refs that resolve to nothing are skipped.
    pub fn list_refs(&self, prefix: &str) -> Result<Vec<(RefName, ObjectId)>> {
        let root = prefix
            .split('/')
            .filter(|p| !p.is_empty())
            .fold(self.git_dir.clone(), |path, part| path.join(part));
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut refs = Vec::new();
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&self.git_dir) else {
                continue;
            };
            let parts: Option<Vec<&str>> =
                rel.components().map(|c| c.as_os_str().to_str()).collect();
            let Some(parts) = parts else {
                continue;
            };
            // Temp files left behind by an interrupted update are skipped here.
            let Ok(name) = RefName::new(parts.join("/")) else {
                continue;
            };
            if let Some(oid) = self.resolve_ref(&name)? {
                refs.push((name, oid));
            }
        }
        refs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(refs)
    }

    /// Where `HEAD` points.
    pub fn head(&self) -> Result<Head> {
        let head = RefName::head();
        match self.read_ref(&head)? {
            Some(Reference::Symbolic(target)) => Ok(Head::Branch(target)),
            Some(Reference::Direct(oid)) => Ok(Head::Detached(oid)),
            None => Err(RefError::NotFound(head.to_string())),
        }
    }

    /// The branch `HEAD` is attached to, `None` when detached.
    pub fn current_branch(&self) -> Result<Option<RefName>> {
        Ok(match self.head()? {
            Head::Branch(name) => Some(name),
            Head::Detached(_) => None,
        })
    }

    fn write_contents(&self, name: &RefName, contents: &str) -> Result<()> {
        let path = self.ref_path(name);
        let mut file = AtomicFile::create(&path)?;
        file.write_all(contents.as_bytes())
            .map_err(|source| RefError::IoPath { path, source })?;
        file.commit()?;
        Ok(())
    }
}
