use std::collections::BTreeMap;

use bstr::BString;
use chronos_hash::ObjectId;
use chronos_index::{Index, Stage};
use chronos_repository::Repository;

use crate::{Change, ChangeKind, Result};

/// Changes between HEAD's tree and `index`, sorted by path.
///
/// An unborn HEAD counts as an empty tree, so every entry is `Added`.
pub fn head_vs_index(repo: &Repository, index: &Index) -> Result<Vec<Change>> {
    let mut head: BTreeMap<BString, ObjectId> = match repo.head_oid()? {
        Some(commit) => {
            let tree = repo.read_commit(&commit)?.tree();
            repo.flatten_tree(&tree)?
                .into_iter()
                .map(|leaf| (leaf.path, leaf.oid))
                .collect()
        }
        None => BTreeMap::new(),
    };

    let mut changes = Vec::new();
    for entry in index.iter().filter(|e| e.stage == Stage::Normal) {
        match head.remove(&entry.path) {
            Some(oid) if oid != entry.oid => {
                changes.push(Change::new(ChangeKind::Modified, entry.path.clone()))
            }
            Some(_) => {}
            None => changes.push(Change::new(ChangeKind::Added, entry.path.clone())),
        }
    }
    changes.extend(
        head.into_keys()
            .map(|path| Change::new(ChangeKind::Deleted, path)),
    );
    changes.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(changes)
}
