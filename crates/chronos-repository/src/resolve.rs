//! Turning user-supplied names into object ids.

use chronos_hash::hex::is_hex_prefix;
use chronos_hash::{ObjectId, OID_HEX_LEN};
use chronos_object::{Object, ObjectType};
use chronos_ref::RefName;
use chronos_store::MINIMUM_ABBREV;
use tracing::trace;

use crate::{RepoError, Repository, Result};

/// Namespaces a short name is tried under, in order.
const REF_NAMESPACES: [&str; 3] = ["refs/tags/", "refs/heads/", "refs/remotes/"];

impl Repository {
    /// Every id `name` could mean.
    ///
    /// `HEAD` resolves on its own. Otherwise a 4 to 40 digit hex string is
    /// matched against stored object ids, and `refs/tags/<name>`,
    /// `refs/heads/<name>` and `refs/remotes/<name>` are tried. A full ref
    /// path such as `refs/heads/master` is also accepted. The caller decides
    /// what to do with more than one candidate.
    pub fn resolve_name(&self, name: &str) -> Result<Vec<ObjectId>> {
        let mut candidates = Vec::new();
        if name.is_empty() {
            return Ok(candidates);
        }

        if name == "HEAD" {
            candidates.extend(self.refs.resolve_ref(&RefName::head())?);
            return Ok(candidates);
        }

        if is_hex_prefix(name, MINIMUM_ABBREV, OID_HEX_LEN) {
            candidates.extend(self.store.find_by_prefix(name)?);
        }

        let literal = name.starts_with("refs/").then(|| name.to_string());
        let qualified = REF_NAMESPACES.iter().map(|ns| format!("{ns}{name}"));
        for full in literal.into_iter().chain(qualified) {
            let Ok(refname) = RefName::new(full) else {
                continue;
            };
            if let Some(oid) = self.refs.resolve_ref(&refname)? {
                trace!(name, refname = %refname, %oid, "ref candidate");
                if !candidates.contains(&oid) {
                    candidates.push(oid);
                }
            }
        }
        Ok(candidates)
    }

    /// Resolve `name` to exactly one id.
    ///
    /// With `expected` set, the object must be of that type. When `follow`
    /// is true, tags are peeled to their target and a commit stands in for
    /// its tree when a tree is wanted; this repeats since tags may point at
    /// tags.
    pub fn resolve(
        &self,
        name: &str,
        expected: Option<ObjectType>,
        follow: bool,
    ) -> Result<ObjectId> {
        let candidates = self.resolve_name(name)?;
        let mut oid = match candidates.as_slice() {
            [] => return Err(RepoError::NotFound(name.to_string())),
            [oid] => *oid,
            _ => {
                return Err(RepoError::AmbiguousReference {
                    name: name.to_string(),
                    candidates,
                })
            }
        };

        let Some(expected) = expected else {
            return Ok(oid);
        };

        loop {
            let (actual, _) = self.store.read_header(&oid)?;
            if actual == expected {
                return Ok(oid);
            }
            let mismatch = RepoError::WrongObjectType {
                name: name.to_string(),
                expected,
                actual,
            };
            if !follow {
                return Err(mismatch);
            }
            oid = match self.store.read(&oid)? {
                Object::Tag(tag) => tag.target(),
                Object::Commit(commit) if expected == ObjectType::Tree => commit.tree(),
                _ => return Err(mismatch),
            };
        }
    }
}
