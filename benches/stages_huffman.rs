
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hz::bits;
use hz::codec;
use hz::codes::CodeTable;
use hz::huffman::HuffmanTree;
use hz::pipeline;
use stages_common::{cap, get_test_data, SIZES_ALL, SIZES_SMALL};

fn bench_huffman(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman");
    cap(&mut group);
    for &size in SIZES_ALL {
        let data = get_test_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("build", size), &data, |b, data| {
            b.iter(|| CodeTable::from_tree(&HuffmanTree::from_data(data).unwrap()));
        });

        let tree = HuffmanTree::from_data(&data).unwrap();
        let table = CodeTable::from_tree(&tree);

        group.bench_with_input(BenchmarkId::new("encode", size), &data, |b, data| {
            b.iter(|| codec::encode(data, &table).unwrap());
        });

        let encoded = codec::encode(&data, &table).unwrap();
        group.bench_with_input(BenchmarkId::new("decode", size), &encoded, |b, encoded| {
            b.iter(|| codec::decode(encoded, &tree).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("pack", size), &encoded, |b, encoded| {
            b.iter(|| bits::pack(encoded));
        });

        let block = bits::pack(&encoded);
        group.bench_with_input(BenchmarkId::new("unpack", size), &block, |b, block| {
            b.iter(|| bits::unpack(block).unwrap());
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    cap(&mut group);
    for &size in SIZES_SMALL {
        let data = get_test_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("compress", size), &data, |b, data| {
            b.iter(|| pipeline::compress(data).unwrap());
        });

        let packed = pipeline::compress(&data).unwrap();
        group.bench_with_input(BenchmarkId::new("decompress", size), &packed, |b, packed| {
            b.iter(|| pipeline::decompress(packed).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_huffman, bench_pipeline);
criterion_main!(benches);
