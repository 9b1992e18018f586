use bstr::{BStr, BString, ByteSlice};
use chronos_hash::ObjectId;
use chronos_utils::date::Signature;

use crate::{Kvlm, ObjectError, ObjectType};

/// A commit: KVLM headers with a validated `tree` and `parent` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    kvlm: Kvlm,
    tree: ObjectId,
    parents: Vec<ObjectId>,
}

fn parse_oid(value: &BStr) -> Result<ObjectId, ObjectError> {
    let hex = value
        .to_str()
        .map_err(|_| ObjectError::CorruptObject(format!("non-ASCII object id '{}'", value)))?;
    Ok(ObjectId::from_hex(hex)?)
}

impl Commit {
    /// Build a commit with a single optional parent.
    pub fn new(
        tree: ObjectId,
        parent: Option<ObjectId>,
        author: &Signature,
        committer: &Signature,
        message: impl Into<BString>,
    ) -> Self {
        let mut kvlm = Kvlm::new();
        kvlm.push("tree", tree.to_hex());
        if let Some(parent) = parent {
            kvlm.push("parent", parent.to_hex());
        }
        kvlm.push("author", author.to_bytes());
        kvlm.push("committer", committer.to_bytes());
        kvlm.set_message(message);
        Self {
            kvlm,
            tree,
            parents: parent.into_iter().collect(),
        }
    }

    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        Self::from_kvlm(Kvlm::parse(content)?)
    }

    /// Validate `tree` (exactly one) and every `parent`.
    pub fn from_kvlm(kvlm: Kvlm) -> Result<Self, ObjectError> {
        let tree = match kvlm.get_all("tree") {
            [tree] => parse_oid(tree.as_bstr())?,
            [] => {
                return Err(ObjectError::MissingField {
                    kind: ObjectType::Commit,
                    field: "tree",
                })
            }
            _ => return Err(ObjectError::CorruptObject("commit has several trees".into())),
        };
        let parents = kvlm
            .get_all("parent")
            .iter()
            .map(|p| parse_oid(p.as_bstr()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            kvlm,
            tree,
            parents,
        })
    }

    pub fn tree(&self) -> ObjectId {
        self.tree
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn author(&self) -> Option<&BStr> {
        self.kvlm.get("author")
    }

    pub fn committer(&self) -> Option<&BStr> {
        self.kvlm.get("committer")
    }

    pub fn message(&self) -> &BStr {
        self.kvlm.message()
    }

    /// First line of the message, trimmed.
    pub fn summary(&self) -> &BStr {
        let msg = self.message().trim();
        msg.lines().next().unwrap_or_default().as_bstr()
    }

    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }

    pub fn serialize_content(&self) -> Vec<u8> {
        self.kvlm.serialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronos_utils::date::Timestamp;

    const TREE: &str = "29ff16c9c14e2652b22f8b78bb08a5a07930c147";
    const PARENT: &str = "206941306e8a8af65b66eaaaea388a7ae24d49a0";

    fn sig() -> Signature {
        Signature::from_identity("A U Thor <author@example.com>", Timestamp::new(1112911993, 0))
            .unwrap()
    }

    #[test]
    fn new_commit_layout() {
        let c = Commit::new(
            ObjectId::from_hex(TREE).unwrap(),
            Some(ObjectId::from_hex(PARENT).unwrap()),
            &sig(),
            &sig(),
            "initial\n",
        );
        let expected = format!(
            "tree {TREE}\nparent {PARENT}\n\
author A U Thor <author@example.com> 1112911993 +0000\n\
committer A U Thor <author@example.com> 1112911993 +0000\n\ninitial\n"
        );
        assert_eq!(c.serialize_content(), expected.as_bytes());
        assert_eq!(Commit::parse(expected.as_bytes()).unwrap(), c);
    }

    #[test]
    fn root_commit_has_no_parents() {
        let c = Commit::new(ObjectId::from_hex(TREE).unwrap(), None, &sig(), &sig(), "root\n");
        assert!(c.parents().is_empty());
        assert!(c.kvlm().get("parent").is_none());
    }

    #[test]
    fn merge_commit_keeps_every_parent() {
        let raw = format!("tree {TREE}\nparent {PARENT}\nparent {TREE}\n\nmerge\n");
        let c = Commit::parse(raw.as_bytes()).unwrap();
        assert_eq!(c.parents().len(), 2);
        assert_eq!(c.serialize_content(), raw.as_bytes());
    }

    #[test]
    fn missing_tree_rejected() {
        let err = Commit::parse(b"author x\n\nmsg").unwrap_err();
        assert!(matches!(err, ObjectError::MissingField { field: "tree", .. }));
    }

    #[test]
    fn bad_parent_rejected() {
        let raw = format!("tree {TREE}\nparent nothex\n\nmsg");
        assert!(Commit::parse(raw.as_bytes()).is_err());
    }

    #[test]
    fn summary_is_first_line() {
        let raw = format!("tree {TREE}\n\n\nFix the thing\n\nLonger body.\n");
        let c = Commit::parse(raw.as_bytes()).unwrap();
        assert_eq!(c.summary(), "Fix the thing");
    }
}
