use std::collections::HashMap;

use bytes::Bytes;
use sockx_codec::decode_header;
use sockx_core::{BufferConfig, SockXError};
use sockx_dsa::{NodeArena, RawBlock};

use crate::buffer::SocketBuffer;
use crate::message::{InboundPayload, MessageKind, SocketMessage};

/// Per-service buffering table: one node arena shared by every connection,
/// one `SocketBuffer` per socket id.
///
/// Operations keyed by an unknown id are a caller bug and report
/// `InvalidOperand`, with the single exception of `clear`, which treats an
/// absent buffer as already cleared. That mirrors the teardown ordering
/// problem it exists for: a close racing a flush should not turn into an
/// error.
pub struct BufferDriver {
    arena: NodeArena,
    buffers: HashMap<i32, SocketBuffer>,
    buffer_limit: usize,
}

impl BufferDriver {
    pub fn new(config: &BufferConfig) -> Self {
        Self {
            arena: config.build_arena(),
            buffers: HashMap::new(),
            buffer_limit: config.buffer_limit,
        }
    }

    /// Registers a connection, creating its empty buffer. Re-opening an id
    /// keeps the existing buffer.
    pub fn open(&mut self, id: i32) {
        self.buffers.entry(id).or_default();
    }

    /// Drops a connection's buffer, recycling every node it still holds.
    pub fn close(&mut self, id: i32) {
        if let Some(mut buffer) = self.buffers.remove(&id) {
            buffer.clear(&mut self.arena);
        }
    }

    pub fn is_open(&self, id: i32) -> bool {
        self.buffers.contains_key(&id)
    }

    /// Appends an owned block to the connection's chain; returns the new
    /// unread total.
    pub fn push(&mut self, id: i32, block: RawBlock) -> Result<usize, SockXError> {
        let buffer = self
            .buffers
            .get_mut(&id)
            .ok_or(SockXError::InvalidOperand("buffer"))?;
        let total = buffer.push(&mut self.arena, block);
        if total > self.buffer_limit {
            tracing::warn!(
                id,
                total,
                limit = self.buffer_limit,
                "connection backlog exceeds the configured limit"
            );
        }
        Ok(total)
    }

    /// Exact-size read. `Ok(None)` means not enough is buffered yet.
    pub fn pop(&mut self, id: i32, sz: usize) -> Result<Option<Bytes>, SockXError> {
        let buffer = self
            .buffers
            .get_mut(&id)
            .ok_or(SockXError::InvalidOperand("buffer"))?;
        Ok(buffer.pop(&mut self.arena, sz))
    }

    /// Separator-terminated read; the separator is consumed, not returned.
    /// `Ok(None)` means no full line is buffered yet.
    pub fn read_line(&mut self, id: i32, sep: &[u8]) -> Result<Option<Bytes>, SockXError> {
        let buffer = self
            .buffers
            .get_mut(&id)
            .ok_or(SockXError::InvalidOperand("buffer"))?;
        Ok(buffer.read_line(&mut self.arena, sep))
    }

    /// Non-consuming separator probe.
    pub fn check_line(&self, id: i32, sep: &[u8]) -> Result<bool, SockXError> {
        let buffer = self
            .buffers
            .get(&id)
            .ok_or(SockXError::InvalidOperand("buffer"))?;
        Ok(buffer.check_line(&self.arena, sep))
    }

    /// Drains everything buffered for the connection.
    pub fn read_all(&mut self, id: i32) -> Result<Bytes, SockXError> {
        let buffer = self
            .buffers
            .get_mut(&id)
            .ok_or(SockXError::InvalidOperand("buffer"))?;
        Ok(buffer.read_all(&mut self.arena))
    }

    /// Recycles everything buffered for the connection. Unknown ids are a
    /// tolerated no-op, never an error.
    pub fn clear(&mut self, id: i32) {
        if let Some(buffer) = self.buffers.get_mut(&id) {
            buffer.clear(&mut self.arena);
        }
    }

    /// Unread byte count for the connection. O(1).
    pub fn size(&self, id: i32) -> Result<usize, SockXError> {
        let buffer = self
            .buffers
            .get(&id)
            .ok_or(SockXError::InvalidOperand("buffer"))?;
        Ok(buffer.len())
    }

    /// Framed read: a `header_len`-byte big-endian length prefix followed by
    /// the body.
    ///
    /// Peeks the prefix without consuming it, and only when the entire frame
    /// (prefix + body) is buffered steps over the prefix and pops the body.
    /// A partially arrived frame (even just a partial prefix) yields
    /// `Ok(None)` with nothing consumed, so the call is safely retried as
    /// data accumulates.
    pub fn read_frame(&mut self, id: i32, header_len: usize) -> Result<Option<Bytes>, SockXError> {
        if header_len == 0 || header_len > 4 {
            return Err(SockXError::InvalidHeader(header_len));
        }
        let arena = &mut self.arena;
        let buffer = self
            .buffers
            .get_mut(&id)
            .ok_or(SockXError::InvalidOperand("buffer"))?;

        let mut prefix = [0u8; 4];
        if !buffer.peek_into(arena, &mut prefix[..header_len]) {
            return Ok(None);
        }
        let body = decode_header(&prefix[..header_len])?;
        if buffer.len() < header_len + body {
            return Ok(None);
        }
        buffer.skip(arena, header_len);
        if body == 0 {
            return Ok(Some(Bytes::new()));
        }
        Ok(buffer.pop(arena, body))
    }

    /// Inbound dispatch from the socket engine.
    ///
    /// Data-bearing messages land in the connection's chain (inline payloads
    /// are copied into a fresh block first; the engine only hands off
    /// ownership for object-backed reads). Lifecycle messages open and close
    /// the table entry. Returns the new unread total for data messages.
    pub fn deliver(&mut self, msg: SocketMessage) -> Result<Option<usize>, SockXError> {
        match msg.kind {
            MessageKind::Data | MessageKind::Udp => {
                let block = match msg.payload {
                    InboundPayload::Block(block) => block,
                    InboundPayload::Inline(bytes) => RawBlock::copy_of(&bytes),
                };
                self.push(msg.id, block).map(Some)
            }
            MessageKind::Connect | MessageKind::Accept => {
                self.open(msg.id);
                Ok(None)
            }
            MessageKind::Close | MessageKind::Error => {
                self.close(msg.id);
                Ok(None)
            }
            MessageKind::Warning => {
                tracing::warn!(id = msg.id, ud = msg.ud, "socket warning from engine");
                Ok(None)
            }
        }
    }

    /// Shuts the whole table down.
    ///
    /// Buffers are dropped without clearing; the arena teardown walks every
    /// slab and reclaims whatever blocks were still linked, returning the
    /// count. After this the service owns nothing.
    pub fn shutdown(self) -> usize {
        drop(self.buffers);
        self.arena.teardown()
    }

    /// The shared arena, for diagnostics and tests.
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }
}
