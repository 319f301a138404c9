use zeroize::Zeroize;

/// An owned, contiguous byte block handed into the buffering layer.
///
/// A `RawBlock` is a move-only ownership token: it cannot be cloned, and the
/// only ways out of existence are consumption by a queue read, recycling via
/// `NodeArena::release`, or arena teardown. That makes release-exactly-once
/// a property of the type rather than a calling convention.
pub struct RawBlock {
    data: Box<[u8]>,
}

impl RawBlock {
    /// Takes ownership of an already-allocated payload.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data: data.into_boxed_slice(),
        }
    }

    /// Copies borrowed bytes into a fresh block.
    ///
    /// This is the entry point for callers that only hold a borrowed string
    /// or slice; inbound engine deliveries that already own their allocation
    /// use `from_vec` and skip the copy.
    pub fn copy_of(bytes: &[u8]) -> Self {
        Self {
            data: bytes.to_vec().into_boxed_slice(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Zeroes the payload in place. Used by arenas configured to scrub
    /// recycled blocks before their memory returns to the allocator.
    pub fn scrub(&mut self) {
        self.data.zeroize();
    }
}

impl std::fmt::Debug for RawBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawBlock").field("len", &self.len()).finish()
    }
}

impl From<Vec<u8>> for RawBlock {
    fn from(data: Vec<u8>) -> Self {
        Self::from_vec(data)
    }
}
