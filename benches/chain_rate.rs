use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sockx_core::BufferConfig;
use sockx_dsa::RawBlock;
use sockx_transport::SocketBuffer;

fn bench_push_pop_cycle(c: &mut Criterion) {
    let config = BufferConfig::default();
    let mut arena = config.build_arena();
    let mut buffer = SocketBuffer::new();
    let payload = vec![0xABu8; 1024];

    c.bench_function("push_pop_4k_across_4_nodes", |b| {
        b.iter(|| {
            // # Verification: steady state must never allocate a new slab;
            // the four nodes cycle through the free chain every iteration.
            for _ in 0..4 {
                buffer.push(&mut arena, RawBlock::copy_of(&payload));
            }
            black_box(buffer.pop(&mut arena, 4096));
        })
    });
    assert_eq!(arena.slab_count(), 1);
}

fn bench_fragmented_line_scan(c: &mut Criterion) {
    let config = BufferConfig::default();
    let mut arena = config.build_arena();
    let mut buffer = SocketBuffer::new();

    c.bench_function("read_line_64_single_byte_nodes", |b| {
        b.iter(|| {
            for _ in 0..64 {
                buffer.push(&mut arena, RawBlock::copy_of(b"x"));
            }
            buffer.push(&mut arena, RawBlock::copy_of(b"\n"));
            black_box(buffer.read_line(&mut arena, b"\n"));
        })
    });
}

fn bench_head_fast_path(c: &mut Criterion) {
    let config = BufferConfig::default();
    let mut arena = config.build_arena();
    let mut buffer = SocketBuffer::new();
    let payload = vec![0xCDu8; 4096];

    c.bench_function("pop_within_head_node", |b| {
        b.iter(|| {
            buffer.push(&mut arena, RawBlock::copy_of(&payload));
            // Two pops inside one node: offset advance, then node recycle.
            black_box(buffer.pop(&mut arena, 1024));
            black_box(buffer.pop(&mut arena, 3072));
        })
    });
}

criterion_group!(
    benches,
    bench_push_pop_cycle,
    bench_fragmented_line_scan,
    bench_head_fast_path
);
criterion_main!(benches);
