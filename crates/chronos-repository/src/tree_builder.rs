//! Building tree objects from the index and flattening them back.

use std::collections::HashMap;

use bstr::{BStr, BString, ByteSlice, ByteVec};
use chronos_hash::ObjectId;
use chronos_index::{Index, Stage};
use chronos_object::{FileMode, Object, Tree, TreeEntry};
use tracing::debug;

use crate::{Repository, Result};

/// A non-tree entry reached by walking a tree recursively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLeaf {
    /// Path from the root tree, `/`-separated.
    pub path: BString,
    pub mode: FileMode,
    pub oid: ObjectId,
}

/// `a/b/c` -> (`a/b`, `c`), `c` -> (``, `c`).
fn split_path(path: &BStr) -> (&BStr, &BStr) {
    match path.rfind_byte(b'/') {
        Some(pos) => (path[..pos].as_bstr(), path[pos + 1..].as_bstr()),
        None => (BStr::new(b""), path),
    }
}

impl Repository {
    /// Write the trees for every stage-0 entry of `index` and return the
    /// root tree id.
    ///
    /// Directories are written deepest first so each parent can list the
    /// ids of its subtrees. Every ancestor of a file gets a tree even when
    /// it holds no files directly.
    pub fn write_tree(&self, index: &Index) -> Result<ObjectId> {
        let mut dirs: HashMap<BString, Vec<TreeEntry>> = HashMap::new();
        dirs.insert(BString::default(), Vec::new());

        for entry in index.iter().filter(|e| e.stage == Stage::Normal) {
            let (dir, name) = split_path(entry.path.as_bstr());
            dirs.entry(dir.to_owned()).or_default().push(TreeEntry {
                mode: entry.file_mode(),
                name: name.to_owned(),
                oid: entry.oid,
            });

            let mut ancestor = dir;
            while !ancestor.is_empty() {
                ancestor = split_path(ancestor).0;
                dirs.entry(ancestor.to_owned()).or_default();
            }
        }

        let mut paths: Vec<BString> = dirs.keys().filter(|p| !p.is_empty()).cloned().collect();
        paths.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        for path in paths {
            let entries = dirs.remove(&path).unwrap_or_default();
            let oid = self.store.write(&Object::Tree(Tree { entries }))?;
            let (parent, name) = split_path(path.as_bstr());
            dirs.entry(parent.to_owned()).or_default().push(TreeEntry {
                mode: FileMode::Tree,
                name: name.to_owned(),
                oid,
            });
        }

        let root = dirs.remove(BStr::new(b"")).unwrap_or_default();
        let oid = self.store.write(&Object::Tree(Tree { entries: root }))?;
        debug!(%oid, entries = index.len(), "wrote tree from index");
        Ok(oid)
    }

    /// Every non-tree entry below `tree`, in tree order, with full paths.
    pub fn flatten_tree(&self, tree: &ObjectId) -> Result<Vec<TreeLeaf>> {
        let mut leaves = Vec::new();
        self.collect_leaves(tree, b"", &mut leaves)?;
        Ok(leaves)
    }

    fn collect_leaves(&self, oid: &ObjectId, prefix: &[u8], out: &mut Vec<TreeLeaf>) -> Result<()> {
        let tree = self.read_tree(oid)?;
        for entry in &tree.entries {
            let mut path = BString::from(prefix);
            if !path.is_empty() {
                path.push_byte(b'/');
            }
            path.push_str(&entry.name);

            if entry.mode.is_tree() {
                self.collect_leaves(&entry.oid, &path, out)?;
            } else {
                out.push(TreeLeaf {
                    path,
                    mode: entry.mode,
                    oid: entry.oid,
                });
            }
        }
        Ok(())
    }
}
