use bstr::{BStr, BString, ByteSlice};
use chronos_hash::ObjectId;
use chronos_utils::date::Signature;

use crate::{Kvlm, ObjectError, ObjectType};

/// An annotated tag: KVLM headers naming a target object and its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    kvlm: Kvlm,
    target: ObjectId,
    target_type: ObjectType,
}

impl Tag {
    pub fn new(
        target: ObjectId,
        target_type: ObjectType,
        name: &str,
        tagger: &Signature,
        message: impl Into<BString>,
    ) -> Self {
        let mut kvlm = Kvlm::new();
        kvlm.push("object", target.to_hex());
        kvlm.push("type", target_type.as_str());
        kvlm.push("tag", name);
        kvlm.push("tagger", tagger.to_bytes());
        kvlm.set_message(message);
        Self {
            kvlm,
            target,
            target_type,
        }
    }

    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        Self::from_kvlm(Kvlm::parse(content)?)
    }

    pub fn from_kvlm(kvlm: Kvlm) -> Result<Self, ObjectError> {
        let missing = |field| ObjectError::MissingField {
            kind: ObjectType::Tag,
            field,
        };
        let object = kvlm.get("object").ok_or_else(|| missing("object"))?;
        let hex = object
            .to_str()
            .map_err(|_| ObjectError::CorruptObject("non-ASCII tag target".into()))?;
        let target = ObjectId::from_hex(hex)?;
        let target_type = ObjectType::from_bytes(kvlm.get("type").ok_or_else(|| missing("type"))?)?;
        Ok(Self {
            kvlm,
            target,
            target_type,
        })
    }

    pub fn target(&self) -> ObjectId {
        self.target
    }

    pub fn target_type(&self) -> ObjectType {
        self.target_type
    }

    pub fn name(&self) -> Option<&BStr> {
        self.kvlm.get("tag")
    }

    pub fn tagger(&self) -> Option<&BStr> {
        self.kvlm.get("tagger")
    }

    pub fn message(&self) -> &BStr {
        self.kvlm.message()
    }

    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }

    pub fn serialize_content(&self) -> Vec<u8> {
        self.kvlm.serialize()
    }
}
