//! Key-value list with message: the payload format of commits and tags.
//!
//! ```text
//! tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147
//! parent 206941306e8a8af65b66eaaaea388a7ae24d49a0
//! gpgsig -----BEGIN PGP SIGNATURE-----
//!  <continuation lines start with one space>
//!
//! free-form message
//! ```
//!
//! Each header is `key SP value LF`. A line starting with a space continues
//! the previous value; the space is dropped and the value gains an embedded
//! newline. A key that appears more than once keeps every value, in order.
//! A single empty line ends the headers and everything after it is the
//! message, verbatim.

use bstr::{BStr, BString, ByteSlice};

use crate::ObjectError;

/// Ordered headers plus message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kvlm {
    fields: Vec<(BString, Vec<BString>)>,
    message: BString,
}

impl Kvlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a payload. `serialize(parse(x)) == x` for any input whose
    /// repeated keys are adjacent.
    pub fn parse(raw: &[u8]) -> Result<Self, ObjectError> {
        let mut kvlm = Self::new();
        let mut pos = 0;

        loop {
            let line_end = raw[pos..]
                .find_byte(b'\n')
                .map(|p| p + pos)
                .ok_or_else(|| ObjectError::MalformedMessage {
                    offset: pos,
                    reason: "headers not terminated by a blank line".into(),
                })?;

            if line_end == pos {
                kvlm.message = BString::from(&raw[pos + 1..]);
                return Ok(kvlm);
            }

            let space = raw[pos..line_end]
                .find_byte(b' ')
                .map(|p| p + pos)
                .filter(|&s| s > pos)
                .ok_or_else(|| ObjectError::MalformedMessage {
                    offset: pos,
                    reason: "expected 'key value'".into(),
                })?;

            // Extend over continuation lines.
            let mut end = line_end;
            while raw.get(end + 1) == Some(&b' ') {
                end = raw[end + 1..]
                    .find_byte(b'\n')
                    .map(|p| p + end + 1)
                    .ok_or_else(|| ObjectError::MalformedMessage {
                        offset: end + 1,
                        reason: "unterminated continuation line".into(),
                    })?;
            }

            let value = raw[space + 1..end].replace("\n ", "\n");
            kvlm.push(&raw[pos..space], value);
            pos = end + 1;
        }
    }

    /// Inverse of [`parse`](Kvlm::parse).
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (key, values) in &self.fields {
            for value in values {
                out.extend_from_slice(key);
                out.push(b' ');
                out.extend_from_slice(&value.replace("\n", "\n "));
                out.push(b'\n');
            }
        }
        out.push(b'\n');
        out.extend_from_slice(&self.message);
        out
    }

    /// Append a value under `key`, after any existing values.
    pub fn push(&mut self, key: impl AsRef<[u8]>, value: impl Into<BString>) {
        let key = key.as_ref();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| k.as_slice() == key) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((BString::from(key), vec![value])),
        }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&BStr> {
        self.get_all(key).first().map(|v| v.as_bstr())
    }

    /// Every value for `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> &[BString] {
        self.fields
            .iter()
            .find(|(k, _)| k.as_slice() == key.as_bytes())
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    /// Keys in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &BStr> {
        self.fields.iter().map(|(k, _)| k.as_bstr())
    }

    pub fn message(&self) -> &BStr {
        self.message.as_bstr()
    }

    pub fn set_message(&mut self, message: impl Into<BString>) {
        self.message = message.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMIT: &[u8] = b"tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147\n\
parent 206941306e8a8af65b66eaaaea388a7ae24d49a0\n\
author Thibault Polge <thibault@thb.lt> 1527025023 +0200\n\
committer Thibault Polge <thibault@thb.lt> 1527025044 +0200\n\
gpgsig -----BEGIN PGP SIGNATURE-----\n \n iQIzBAABCAAdFiEExwXquOM8bWb4Q2zVGxM2FxoLkGQFAlsEjZQACgkQGxM2FxoL\n -----END PGP SIGNATURE-----\n\
\n\
Create first draft\n";

    #[test]
    fn parses_headers_and_message() {
        let kvlm = Kvlm::parse(COMMIT).unwrap();
        assert_eq!(
            kvlm.get("tree").unwrap(),
            "29ff16c9c14e2652b22f8b78bb08a5a07930c147"
        );
        assert_eq!(kvlm.message(), "Create first draft\n");
        let keys: Vec<_> = kvlm.keys().collect();
        assert_eq!(keys, ["tree", "parent", "author", "committer", "gpgsig"]);
    }

    #[test]
    fn continuation_lines_become_embedded_newlines() {
        let kvlm = Kvlm::parse(COMMIT).unwrap();
        let sig = kvlm.get("gpgsig").unwrap();
        assert!(sig.starts_with(b"-----BEGIN PGP SIGNATURE-----\n\niQIz"));
        assert!(sig.ends_with(b"\n-----END PGP SIGNATURE-----"));
    }

    #[test]
    fn roundtrip_is_exact() {
        let kvlm = Kvlm::parse(COMMIT).unwrap();
        assert_eq!(kvlm.serialize(), COMMIT);
    }

    #[test]
    fn repeated_keys_accumulate() {
        let raw = b"parent aaa\nparent bbb\nauthor x\n\nmsg";
        let kvlm = Kvlm::parse(raw).unwrap();
        assert_eq!(kvlm.get_all("parent"), ["aaa", "bbb"]);
        assert_eq!(kvlm.get("parent").unwrap(), "aaa");
        assert_eq!(kvlm.serialize(), raw);
    }

    #[test]
    fn empty_headers() {
        let kvlm = Kvlm::parse(b"\nonly a message\n").unwrap();
        assert_eq!(kvlm.keys().count(), 0);
        assert_eq!(kvlm.message(), "only a message\n");
    }

    #[test]
    fn missing_blank_line_is_malformed() {
        let err = Kvlm::parse(b"tree abc\n").unwrap_err();
        assert!(matches!(err, ObjectError::MalformedMessage { .. }));
    }

    #[test]
    fn line_without_value_is_malformed() {
        let err = Kvlm::parse(b"tree\n\nmsg").unwrap_err();
        assert!(matches!(err, ObjectError::MalformedMessage { offset: 0, .. }));
    }

    #[test]
    fn leading_space_without_key_is_malformed() {
        let err = Kvlm::parse(b" value\n\n").unwrap_err();
        assert!(matches!(err, ObjectError::MalformedMessage { .. }));
    }

    #[test]
    fn built_fields_serialize_in_order() {
        let mut kvlm = Kvlm::new();
        kvlm.push("object", "abc");
        kvlm.push("type", "commit");
        kvlm.push("note", "line one\nline two");
        kvlm.set_message("hello\n");
        assert_eq!(
            kvlm.serialize(),
            b"object abc\ntype commit\nnote line one\n line two\n\nhello\n"
        );
    }
}
