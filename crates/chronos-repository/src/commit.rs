use bstr::BString;
use chronos_hash::ObjectId;
use chronos_object::{Commit, Object};
use chronos_ref::{Head, RefName};
use chronos_utils::date::{Signature, Timestamp};
use tracing::debug;

use crate::{Repository, Result};

/// What `commit` did.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub oid: ObjectId,
    /// The branch that moved; `None` when HEAD is detached.
    pub branch: Option<RefName>,
    /// First line of the message.
    pub summary: BString,
    pub root_commit: bool,
}

/// Trim surrounding whitespace and end with exactly one newline.
pub(crate) fn normalize_message(message: &str) -> String {
    let mut message = message.trim().to_string();
    message.push('\n');
    message
}

impl Repository {
    /// Write a commit object. Author and committer are both `identity` at
    /// `when`.
    pub fn create_commit(
        &self,
        tree: ObjectId,
        parent: Option<ObjectId>,
        identity: &str,
        when: Timestamp,
        message: &str,
    ) -> Result<ObjectId> {
        let signature = Signature::from_identity(identity, when)?;
        let commit = Commit::new(tree, parent, &signature, &signature, normalize_message(message));
        let oid = self.store.write(&Object::Commit(commit))?;
        debug!(%oid, %tree, "wrote commit");
        Ok(oid)
    }

    /// Commit the index on top of HEAD and move the current branch, or
    /// HEAD itself when detached.
    pub fn commit(&self, message: &str) -> Result<CommitOutcome> {
        let index = self.load_index()?;
        let tree = self.write_tree(&index)?;
        let parent = self.head_oid()?;
        let oid = self.create_commit(tree, parent, &self.identity()?, self.timestamp()?, message)?;

        let branch = match self.head()? {
            Head::Branch(branch) => {
                self.refs.write_ref(&branch, &oid)?;
                Some(branch)
            }
            Head::Detached(_) => {
                self.refs.write_ref(&RefName::head(), &oid)?;
                None
            }
        };

        let summary = normalize_message(message)
            .lines()
            .next()
            .unwrap_or_default()
            .into();
        Ok(CommitOutcome {
            oid,
            branch,
            summary,
            root_commit: parent.is_none(),
        })
    }
}
