use core::marker::PhantomData;

use bytes::{Bytes, BytesMut};
use sockx_dsa::{NodeArena, NodeHandle, RawBlock};
use static_assertions::assert_not_impl_any;

/// Ordered chain of unread raw blocks for one connection.
///
/// The queue itself is four words: total unread size, a read offset into the
/// head node, and the head/tail links. The nodes live in the owning
/// `NodeArena`, so every operation takes the arena explicitly: one arena
/// serves all of a service's connections, and each connection gets its own
/// `SocketBuffer`.
///
/// ## Ownership discipline
/// A buffer is owned by exactly one consumer and is deliberately neither
/// `Send` nor `Sync`: serialization of access is the surrounding service's
/// job, not this type's. There is no internal locking to lean on.
///
/// ## Invariants
/// - `size` equals the unread byte count: head contributes
///   `len - offset`, every other node its full length.
/// - `offset` is nonzero only on the head node.
/// - `head.is_none() == tail.is_none()`, and both imply `size == 0`.
pub struct SocketBuffer {
    size: usize,
    offset: usize,
    head: Option<NodeHandle>,
    tail: Option<NodeHandle>,
    _single_owner: PhantomData<*const ()>,
}

assert_not_impl_any!(SocketBuffer: Send, Sync);

impl SocketBuffer {
    pub fn new() -> Self {
        Self {
            size: 0,
            offset: 0,
            head: None,
            tail: None,
            _single_owner: PhantomData,
        }
    }

    /// Unread bytes across the whole chain. O(1).
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Takes ownership of `block` and appends it to the chain.
    ///
    /// Returns the new total unread size. The block's own length is the
    /// trusted byte count; there is no error path.
    pub fn push(&mut self, arena: &mut NodeArena, block: RawBlock) -> usize {
        let len = block.len();
        let node = arena.acquire(block);
        match self.tail {
            Some(tail) => {
                arena.link(tail, node);
                self.tail = Some(node);
            }
            None => {
                debug_assert!(self.head.is_none());
                self.head = Some(node);
                self.tail = Some(node);
            }
        }
        self.size += len;
        self.size
    }

    /// Extracts exactly `sz` bytes from the front of the chain.
    ///
    /// `None` when `sz` is zero or more than is buffered: the recoverable
    /// "not yet" signal, with the queue left untouched. Fully consumed nodes
    /// are recycled as the read walks them.
    ///
    /// ## Performance
    /// One result allocation regardless of how many nodes the read spans;
    /// a read satisfied inside the head node copies once and never builds
    /// an intermediate.
    pub fn pop(&mut self, arena: &mut NodeArena, sz: usize) -> Option<Bytes> {
        if sz == 0 || sz > self.size {
            return None;
        }
        let out = self.extract(arena, sz, 0);
        self.size -= sz;
        Some(out)
    }

    /// Pure detection: is `sep` present in the unread bytes?
    ///
    /// Comparison walks node boundaries byte-wise without copying. State is
    /// untouched. An empty separator is never found.
    pub fn check_line(&self, arena: &NodeArena, sep: &[u8]) -> bool {
        self.find(arena, sep).is_some()
    }

    /// Consumes through the first occurrence of `sep`, returning the bytes
    /// before it. The separator itself is consumed but not returned.
    ///
    /// `None` when `sep` does not occur in the unread bytes (including the
    /// case of fewer unread bytes than the separator), with state untouched.
    pub fn read_line(&mut self, arena: &mut NodeArena, sep: &[u8]) -> Option<Bytes> {
        let at = self.find(arena, sep)?;
        let consumed = at + sep.len();
        let out = self.extract(arena, consumed, sep.len());
        self.size -= consumed;
        Some(out)
    }

    /// Drains every unread byte into a single result, recycling all nodes.
    pub fn read_all(&mut self, arena: &mut NodeArena) -> Bytes {
        let mut out = BytesMut::with_capacity(self.size);
        while let Some(head) = self.head {
            out.extend_from_slice(&arena.block(head)[self.offset..]);
            self.return_head(arena);
        }
        self.size = 0;
        out.freeze()
    }

    /// Recycles every node without producing output and resets to empty.
    pub fn clear(&mut self, arena: &mut NodeArena) {
        while self.head.is_some() {
            self.return_head(arena);
        }
        self.size = 0;
    }

    /// Consumes `sz` bytes without copying them out.
    ///
    /// Returns false (and consumes nothing) when `sz` is zero or more than
    /// is buffered. Used by framing to step over an already-decoded prefix.
    pub fn skip(&mut self, arena: &mut NodeArena, sz: usize) -> bool {
        if sz == 0 || sz > self.size {
            return false;
        }
        self.extract(arena, sz, sz);
        self.size -= sz;
        true
    }

    /// Copies the next `out.len()` unread bytes into `out` without consuming
    /// anything. False when fewer bytes are buffered.
    pub fn peek_into(&self, arena: &NodeArena, out: &mut [u8]) -> bool {
        if out.len() > self.size {
            return false;
        }
        let mut copied = 0;
        let mut cursor = self.head;
        let mut from = self.offset;
        while copied < out.len() {
            let Some(node) = cursor else {
                return false;
            };
            let blk = arena.block(node);
            let take = (blk.len() - from).min(out.len() - copied);
            out[copied..copied + take].copy_from_slice(&blk[from..from + take]);
            copied += take;
            cursor = arena.next(node);
            from = 0;
        }
        true
    }

    /// Detaches the head node, resets the read offset, and recycles it.
    fn return_head(&mut self, arena: &mut NodeArena) {
        let head = self
            .head
            .expect("SocketBuffer: recycling the head of an empty queue");
        self.offset = 0;
        self.head = arena.next(head);
        if self.head.is_none() {
            self.tail = None;
        }
        arena.release(head);
    }

    /// Copies out `sz` bytes from the front, dropping the trailing `skip`
    /// bytes from the result while still consuming them.
    ///
    /// Callers guarantee `skip <= sz <= size` and adjust `size` themselves.
    fn extract(&mut self, arena: &mut NodeArena, sz: usize, skip: usize) -> Bytes {
        let head = self
            .head
            .expect("SocketBuffer: extract from an empty queue");
        let avail = arena.block(head).len() - self.offset;
        // Fast path: the head node alone satisfies the request.
        if sz < avail {
            let out =
                Bytes::copy_from_slice(&arena.block(head)[self.offset..self.offset + sz - skip]);
            self.offset += sz;
            return out;
        }
        if sz == avail {
            let out =
                Bytes::copy_from_slice(&arena.block(head)[self.offset..self.offset + sz - skip]);
            self.return_head(arena);
            return out;
        }

        // Boundary-crossing walk: one result buffer, nodes recycled as they
        // empty, the final `skip` bytes consumed but not copied.
        let mut out = BytesMut::with_capacity(sz - skip);
        let mut want = sz;
        while let Some(current) = self.head {
            let avail = arena.block(current).len() - self.offset;
            if avail >= want {
                if want > skip {
                    out.extend_from_slice(
                        &arena.block(current)[self.offset..self.offset + want - skip],
                    );
                }
                self.offset += want;
                if avail == want {
                    self.return_head(arena);
                }
                break;
            }
            let wanted_out = want.saturating_sub(skip);
            if wanted_out > 0 {
                let take = wanted_out.min(avail);
                out.extend_from_slice(&arena.block(current)[self.offset..self.offset + take]);
            }
            self.return_head(arena);
            want -= avail;
        }
        out.freeze()
    }

    /// Byte index (relative to the read position) of the first occurrence of
    /// `sep`, or `None`. The scan stops once fewer unread bytes remain than
    /// the separator is long.
    fn find(&self, arena: &NodeArena, sep: &[u8]) -> Option<usize> {
        if sep.is_empty() || self.size < sep.len() {
            return None;
        }
        let mut current = self.head?;
        let mut from = self.offset;
        let mut avail = arena.block(current).len() - from;
        for i in 0..=(self.size - sep.len()) {
            while avail == 0 {
                current = arena.next(current)?;
                from = 0;
                avail = arena.block(current).len();
            }
            if Self::matches_at(arena, current, from, sep) {
                return Some(i);
            }
            from += 1;
            avail -= 1;
        }
        None
    }

    /// Compares `sep` against the bytes starting at (`node`, `from`),
    /// following queue links when the candidate straddles nodes.
    fn matches_at(arena: &NodeArena, mut node: NodeHandle, mut from: usize, mut sep: &[u8]) -> bool {
        loop {
            let blk = arena.block(node);
            let avail = blk.len() - from;
            if avail >= sep.len() {
                return &blk[from..from + sep.len()] == sep;
            }
            if avail > 0 && blk[from..] != sep[..avail] {
                return false;
            }
            node = match arena.next(node) {
                Some(n) => n,
                None => return false,
            };
            sep = &sep[avail..];
            from = 0;
        }
    }
}

impl Default for SocketBuffer {
    fn default() -> Self {
        Self::new()
    }
}
