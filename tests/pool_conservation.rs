//! # Pool Conservation Tests
//!
//! Audits the `NodeArena` lifecycle: the geometric growth sequence, the
//! conservation law (every node is either free or in exactly one queue),
//! double-release trapping, and teardown reclaim of in-flight blocks.

use std::time::Instant;

use sockx_core::BufferConfig;
use sockx_dsa::{NodeArena, RawBlock};
use sockx_transport::SocketBuffer;

/// The k-th slab holds `min(16 * 2^(k-1), 4096)` nodes.
#[test]
fn test_slab_growth_sequence() {
    let t = Instant::now();

    let mut arena = NodeArena::new(64, false);
    let mut handles = Vec::new();
    let mut expected_total = 0usize;

    for k in 0..10 {
        let slab_nodes = (16usize << k).min(4096);
        expected_total += slab_nodes;
        while handles.len() < expected_total {
            handles.push(arena.acquire(RawBlock::copy_of(b"x")));
        }
        assert_eq!(arena.slab_count(), k + 1, "slab count after slab {}", k + 1);
        assert_eq!(arena.capacity(), expected_total, "capacity after slab {}", k + 1);
        assert_eq!(arena.free_count(), 0, "every node is checked out");
    }

    // Return everything; the free chain must account for every node.
    for handle in handles {
        arena.release(handle);
    }
    assert_eq!(arena.free_count(), arena.capacity());

    println!("test_slab_growth_sequence: Testing Overhead = {:?}", t.elapsed());
}

/// Conservation across a realistic push/read workload: nodes allocated ==
/// nodes free + nodes linked, at every point.
#[test]
fn test_pool_conservation_through_reads() {
    let mut arena = NodeArena::new(64, false);
    let mut buffer = SocketBuffer::new();

    for i in 0..20u8 {
        buffer.push(&mut arena, RawBlock::from_vec(vec![i; 4]));
    }
    // 20 nodes in use out of 32 allocated (16 + 32 would be slab 2 at 17).
    assert_eq!(arena.capacity(), 48);
    assert_eq!(arena.free_count(), arena.capacity() - 20);

    // Pop exactly three blocks' worth: three nodes recycled.
    buffer.pop(&mut arena, 12).expect("12 bytes buffered");
    assert_eq!(arena.free_count(), arena.capacity() - 17);

    // Pop half a block: no node recycled, offset advances instead.
    buffer.pop(&mut arena, 2).expect("2 bytes buffered");
    assert_eq!(arena.free_count(), arena.capacity() - 17);

    // Drain the rest: every node comes home.
    buffer.read_all(&mut arena);
    assert_eq!(arena.free_count(), arena.capacity());
}

/// Recycled nodes are reused before any new slab is allocated.
#[test]
fn test_free_nodes_reused_before_growth() {
    let mut arena = NodeArena::new(64, false);
    let mut buffer = SocketBuffer::new();

    for round in 0..50 {
        for i in 0..8u8 {
            buffer.push(&mut arena, RawBlock::from_vec(vec![i; 8]));
        }
        buffer.read_all(&mut arena);
        assert_eq!(arena.slab_count(), 1, "round {} must not grow the pool", round);
    }
    assert_eq!(arena.capacity(), 16);
}

/// Releasing a node twice is a contract violation and must trap.
#[test]
fn test_double_release_traps() {
    let mut arena = NodeArena::new(64, false);
    let handle = arena.acquire(RawBlock::copy_of(b"once"));
    arena.release(handle);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        arena.release(handle);
    }));
    assert!(result.is_err(), "double release must panic");
}

/// Teardown walks every slab and reclaims blocks still linked into queues.
#[test]
fn test_teardown_reclaims_in_flight_blocks() {
    let t = Instant::now();

    let config = BufferConfig::default();
    let mut arena = config.build_arena();
    let mut buffer = SocketBuffer::new();

    buffer.push(&mut arena, RawBlock::copy_of(b"left"));
    buffer.push(&mut arena, RawBlock::copy_of(b"behind"));
    buffer.push(&mut arena, RawBlock::copy_of(b"here"));
    buffer.pop(&mut arena, 4).expect("consume one block");

    // The buffer is dropped without clear; its two remaining nodes still
    // hold blocks inside the arena.
    drop(buffer);
    let reclaimed = arena.teardown();
    assert_eq!(reclaimed, 2);

    println!("test_teardown_reclaims_in_flight_blocks: Testing Overhead = {:?}", t.elapsed());
}

/// A fully drained system tears down with nothing to reclaim.
#[test]
fn test_teardown_clean_after_drain() {
    let mut arena = NodeArena::new(64, false);
    let mut buffer = SocketBuffer::new();
    buffer.push(&mut arena, RawBlock::copy_of(b"transient"));
    buffer.read_all(&mut arena);
    drop(buffer);
    assert_eq!(arena.teardown(), 0);
}
