use bstr::BString;
use chronos_hash::hasher::Hasher;
use chronos_hash::ObjectId;
use chronos_object::{Blob, Commit, FileMode, Kvlm, Object, ObjectType, Tag, Tree, TreeEntry};
use chronos_utils::date::{Signature, Timestamp};
use proptest::prelude::*;

fn sig(ts: i64) -> Signature {
    Signature::from_identity("Test Author <test@example.com>", Timestamp::new(ts, -300)).unwrap()
}

fn oid(n: u8) -> ObjectId {
    ObjectId::from_bytes(&[n; 20]).unwrap()
}

fn oid_of(obj: &Object) -> ObjectId {
    Hasher::hash_object(obj.object_type().as_str(), &obj.serialize_content()).unwrap()
}

fn roundtrip(obj: &Object) {
    let encoded = obj.encode();
    let decoded = Object::decode(&encoded).unwrap();
    assert_eq!(&decoded, obj);
    assert_eq!(decoded.encode(), encoded);
}

#[test]
fn blob_roundtrip() {
    roundtrip(&Object::Blob(Blob::new(b"hello world\n".to_vec())));
    roundtrip(&Object::Blob(Blob::new(vec![])));
    roundtrip(&Object::Blob(Blob::new(b"\0\0binary\0".to_vec())));
}

#[test]
fn tree_roundtrip() {
    roundtrip(&Object::Tree(Tree {
        entries: vec![
            TreeEntry { mode: FileMode::Regular, name: BString::from("README.md"), oid: oid(1) },
            TreeEntry { mode: FileMode::Executable, name: BString::from("run.sh"), oid: oid(2) },
            TreeEntry { mode: FileMode::Tree, name: BString::from("src"), oid: oid(3) },
        ],
    }));
}

#[test]
fn commit_roundtrip() {
    roundtrip(&Object::Commit(Commit::new(oid(1), Some(oid(2)), &sig(1), &sig(2), "msg\n")));
    roundtrip(&Object::Commit(Commit::new(oid(1), None, &sig(1), &sig(1), "root\n")));
}

#[test]
fn commit_with_multivalue_and_multiline_headers() {
    let raw = format!(
        "tree {}\nparent {}\nparent {}\nauthor a <a@b> 1 +0000\ncommitter a <a@b> 1 +0000\n\
gpgsig -----BEGIN-----\n line two\n \n -----END-----\n\nbody\n",
        oid(1),
        oid(2),
        oid(3)
    );
    let obj = Object::parse_content(ObjectType::Commit, raw.as_bytes()).unwrap();
    match &obj {
        Object::Commit(c) => {
            assert_eq!(c.parents(), [oid(2), oid(3)]);
            assert_eq!(
                c.kvlm().get("gpgsig").unwrap(),
                "-----BEGIN-----\nline two\n\n-----END-----"
            );
        }
        other => panic!("expected commit, got {other:?}"),
    }
    roundtrip(&obj);
    assert_eq!(obj.serialize_content(), raw.as_bytes());
}

#[test]
fn tag_roundtrip() {
    roundtrip(&Object::Tag(Tag::new(oid(9), ObjectType::Commit, "v1", &sig(5), "release\n")));
}

#[test]
fn identical_content_identical_id() {
    let a = Object::Blob(Blob::new(b"same".to_vec()));
    let b = Object::Blob(Blob::new(b"same".to_vec()));
    assert_eq!(oid_of(&a), oid_of(&b));
}

fn arb_value() -> impl Strategy<Value = String> {
    // Values may span lines; a line may start with spaces.
    "[a-z0-9 <>@]{0,12}(\n[a-z0-9 ]{0,12}){0,2}"
}

proptest! {
    #[test]
    fn kvlm_roundtrip(
        fields in proptest::collection::vec(("[a-z]{1,6}", proptest::collection::vec(arb_value(), 1..3)), 0..5),
        message in "[ -~\n]{0,40}",
    ) {
        let mut kvlm = Kvlm::new();
        for (key, values) in &fields {
            for v in values {
                kvlm.push(key, v.as_str());
            }
        }
        kvlm.set_message(message.as_str());
        let bytes = kvlm.serialize();
        let parsed = Kvlm::parse(&bytes).unwrap();
        prop_assert_eq!(&parsed, &kvlm);
        prop_assert_eq!(parsed.serialize(), bytes);
    }

    #[test]
    fn blob_encode_decode(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let obj = Object::Blob(Blob::new(data));
        prop_assert_eq!(Object::decode(&obj.encode()).unwrap(), obj);
    }
}
