use chronos_hash::hasher::Hasher;
use chronos_hash::hex::hex_to_string;
use chronos_hash::ObjectId;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn hash_throughput(c: &mut Criterion) {
    let data = vec![0xABu8; 1024 * 1024];

    let mut group = c.benchmark_group("hash_throughput");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("sha1_1mib", |b| b.iter(|| Hasher::digest(black_box(&data))));
    group.bench_function("blob_1mib", |b| {
        b.iter(|| Hasher::hash_object("blob", black_box(&data)))
    });
    group.finish();
}

fn hex_codec(c: &mut Criterion) {
    let bytes = [0x5a_u8; 20];
    let hex = hex_to_string(&bytes);

    let mut group = c.benchmark_group("hex");
    group.bench_function("encode_20bytes", |b| b.iter(|| hex_to_string(black_box(&bytes))));
    group.bench_function("parse_oid", |b| b.iter(|| ObjectId::from_hex(black_box(&hex))));
    group.finish();
}

criterion_group!(benches, hash_throughput, hex_codec);
criterion_main!(benches);
