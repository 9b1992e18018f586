use bstr::BString;
use chronos_hash::ObjectId;
use chronos_object::{Commit, FileMode, Kvlm, Tree, TreeEntry};
use chronos_utils::date::{Signature, Timestamp};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sample_commit_bytes() -> Vec<u8> {
    let author = Signature::from_identity("Alice Author <alice@example.com>", Timestamp::new(1700000000, 0))
        .unwrap();
    let committer = Signature::from_identity("Bob Committer <bob@example.com>", Timestamp::new(1700000100, 0))
        .unwrap();
    Commit::new(
        ObjectId::from_bytes(&[0xda; 20]).unwrap(),
        Some(ObjectId::from_bytes(&[0x01; 20]).unwrap()),
        &author,
        &committer,
        "Implement feature X\n\nThis commit adds the feature X with full test coverage.\n",
    )
    .serialize_content()
}

fn sample_tree_bytes() -> Vec<u8> {
    let entries = (0..64)
        .map(|i| TreeEntry {
            mode: if i % 8 == 0 { FileMode::Tree } else { FileMode::Regular },
            name: BString::from(format!("file_{i:03}.rs")),
            oid: ObjectId::from_bytes(&[i as u8; 20]).unwrap(),
        })
        .collect();
    Tree { entries }.serialize_content()
}

fn parse_benches(c: &mut Criterion) {
    let commit = sample_commit_bytes();
    let tree = sample_tree_bytes();

    c.bench_function("kvlm_parse_commit", |b| b.iter(|| Kvlm::parse(black_box(&commit))));
    c.bench_function("commit_parse", |b| b.iter(|| Commit::parse(black_box(&commit))));
    c.bench_function("tree_parse_64", |b| b.iter(|| Tree::parse(black_box(&tree))));

    let parsed = Tree::parse(&tree).unwrap();
    c.bench_function("tree_serialize_64", |b| b.iter(|| black_box(&parsed).serialize_content()));
}

criterion_group!(benches, parse_benches);
criterion_main!(benches);
