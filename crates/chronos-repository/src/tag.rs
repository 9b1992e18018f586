use chronos_hash::ObjectId;
use chronos_object::{Object, Tag};
use chronos_ref::RefName;
use tracing::debug;

use crate::{RepoError, Repository, Result};

impl Repository {
    /// Point `refs/tags/<name>` at `target`.
    ///
    /// With `annotation` set, a tag object carrying that message is written
    /// first and the ref points at it. Returns the id the ref now holds.
    pub fn create_tag(&self, name: &str, target: &str, annotation: Option<&str>) -> Result<ObjectId> {
        let refname = RefName::tag(name)?;
        if self.refs.read_ref(&refname)?.is_some() {
            return Err(RepoError::TagExists(name.to_string()));
        }

        let target = self.resolve(target, None, true)?;
        let oid = match annotation {
            None => target,
            Some(message) => {
                let (target_type, _) = self.store.read_header(&target)?;
                let tag = Tag::new(
                    target,
                    target_type,
                    name,
                    &self.signature()?,
                    crate::commit::normalize_message(message),
                );
                self.store.write(&Object::Tag(tag))?
            }
        };

        self.refs.write_ref(&refname, &oid)?;
        debug!(tag = name, %oid, annotated = annotation.is_some(), "created tag");
        Ok(oid)
    }

    /// Short names of every tag, sorted.
    pub fn tag_names(&self) -> Result<Vec<String>> {
        Ok(self
            .refs
            .list_refs("refs/tags/")?
            .into_iter()
            .map(|(name, _)| name.short_name().to_string())
            .collect())
    }
}
