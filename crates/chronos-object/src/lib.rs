//! Object model for chronos.
//!
//! Objects are a closed set of four kinds. Each is framed on disk as
//! `"<kind> <len>\0<payload>"`; the SHA-1 of that framed string is the
//! object's id. Commits and tags share the key-value-list-plus-message
//! ([`Kvlm`]) payload format, trees use the binary entry list in [`tree`].

mod blob;
mod commit;
pub mod header;
pub mod kvlm;
mod tag;
mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use kvlm::Kvlm;
pub use tag::Tag;
pub use tree::{FileMode, Tree, TreeEntry};

use bstr::BString;
use chronos_hash::HashError;

/// Errors produced by object encoding and decoding.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("unknown object type: {0}")]
    UnknownObjectType(BString),

    #[error("corrupt object: {0}")]
    CorruptObject(String),

    #[error("corrupt tree entry at offset {offset}: {reason}")]
    CorruptTree { offset: usize, reason: String },

    #[error("malformed message at offset {offset}: {reason}")]
    MalformedMessage { offset: usize, reason: String },

    #[error("invalid {kind}: missing '{field}' header")]
    MissingField {
        kind: ObjectType,
        field: &'static str,
    },

    #[error("invalid file mode: {0}")]
    InvalidFileMode(String),

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// The four object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectType {
    /// Parse the literal used in object headers.
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        match s {
            b"blob" => Ok(Self::Blob),
            b"tree" => Ok(Self::Tree),
            b"commit" => Ok(Self::Commit),
            b"tag" => Ok(Self::Tag),
            _ => Err(ObjectError::UnknownObjectType(BString::from(s))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
        }
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObjectType {
    type Err = ObjectError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

/// A decoded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl Object {
    /// Decode a framed object (header + payload).
    ///
    /// The declared length must equal the number of payload bytes exactly.
    pub fn decode(data: &[u8]) -> Result<Self, ObjectError> {
        let (obj_type, size, header_len) = header::parse_header(data)?;
        let payload = &data[header_len..];
        if payload.len() != size {
            return Err(ObjectError::CorruptObject(format!(
                "declared length {} but payload is {} bytes",
                size,
                payload.len()
            )));
        }
        Self::parse_content(obj_type, payload)
    }

    /// Decode a payload whose kind is already known.
    pub fn parse_content(obj_type: ObjectType, payload: &[u8]) -> Result<Self, ObjectError> {
        match obj_type {
            ObjectType::Blob => Ok(Self::Blob(Blob::parse(payload))),
            ObjectType::Tree => Ok(Self::Tree(Tree::parse(payload)?)),
            ObjectType::Commit => Ok(Self::Commit(Commit::parse(payload)?)),
            ObjectType::Tag => Ok(Self::Tag(Tag::parse(payload)?)),
        }
    }

    /// Frame the payload: `"<kind> <len>\0<payload>"`.
    pub fn encode(&self) -> Vec<u8> {
        let payload = self.serialize_content();
        let mut out = header::write_header(self.object_type(), payload.len());
        out.extend_from_slice(&payload);
        out
    }

    /// The payload alone, without the header.
    pub fn serialize_content(&self) -> Vec<u8> {
        match self {
            Self::Blob(b) => b.data.clone(),
            Self::Tree(t) => t.serialize_content(),
            Self::Commit(c) => c.serialize_content(),
            Self::Tag(t) => t.serialize_content(),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Blob(_) => ObjectType::Blob,
            Self::Tree(_) => ObjectType::Tree,
            Self::Commit(_) => ObjectType::Commit,
            Self::Tag(_) => ObjectType::Tag,
        }
    }
}
