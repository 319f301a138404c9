use std::net::IpAddr;

use sockx_core::SockXError;
use sockx_dsa::RawBlock;

/// Outbound payload description handed to the engine.
///
/// A borrowed slice is copied by the engine before the call returns; an
/// owned block transfers ownership outright, and the engine becomes
/// responsible for freeing it exactly once. The block carries its own
/// length, so no separate size argument exists to disagree with it.
pub enum SendBuffer<'a> {
    Slice(&'a [u8]),
    Block(RawBlock),
}

impl<'a> SendBuffer<'a> {
    pub fn len(&self) -> usize {
        match self {
            SendBuffer::Slice(s) => s.len(),
            SendBuffer::Block(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        match self {
            SendBuffer::Slice(s) => s,
            SendBuffer::Block(b) => b.as_slice(),
        }
    }
}

/// A piece of an outbound message assembled from heterogeneous parts.
///
/// Anything that can expose its bytes qualifies; a part that cannot aborts
/// the aggregation. Callers assembling from uniform byte types never see
/// the failure path.
pub trait SendFragment {
    fn as_bytes(&self) -> Option<&[u8]>;
}

impl SendFragment for &str {
    fn as_bytes(&self) -> Option<&[u8]> {
        Some(str::as_bytes(self))
    }
}

impl SendFragment for String {
    fn as_bytes(&self) -> Option<&[u8]> {
        Some(str::as_bytes(self))
    }
}

impl SendFragment for &[u8] {
    fn as_bytes(&self) -> Option<&[u8]> {
        Some(self)
    }
}

impl SendFragment for Vec<u8> {
    fn as_bytes(&self) -> Option<&[u8]> {
        Some(self.as_slice())
    }
}

/// Concatenates fragments into one freshly allocated block.
///
/// Sizing pass first, then a single copy pass into an exact-size
/// allocation. A fragment that cannot expose bytes fails the whole
/// aggregation with its index; the partially built block is freed before
/// the error propagates.
pub fn concat_fragments(parts: &[&dyn SendFragment]) -> Result<RawBlock, SockXError> {
    let mut total = 0usize;
    for (idx, part) in parts.iter().enumerate() {
        match part.as_bytes() {
            Some(bytes) => total += bytes.len(),
            None => return Err(SockXError::Aggregation(idx)),
        }
    }
    let mut data = Vec::with_capacity(total);
    for (idx, part) in parts.iter().enumerate() {
        match part.as_bytes() {
            Some(bytes) => data.extend_from_slice(bytes),
            None => return Err(SockXError::Aggregation(idx)),
        }
    }
    Ok(RawBlock::from_vec(data))
}

/// Aggregates `parts` and hands the result to the engine's high-priority
/// send queue. Returns the engine's accept/reject verdict.
pub fn send_fragments<E: SocketEngine + ?Sized>(
    engine: &mut E,
    id: i32,
    parts: &[&dyn SendFragment],
) -> Result<bool, SockXError> {
    let block = concat_fragments(parts)?;
    Ok(engine.send(id, SendBuffer::Block(block)))
}

/// Splits `"host:port"` or `"[v6host]:port"` into its parts.
pub fn split_address(addr: &str) -> Result<(&str, u16), SockXError> {
    let malformed = || SockXError::InvalidAddress(addr.to_string());
    if let Some(rest) = addr.strip_prefix('[') {
        let (host, tail) = rest.split_once(']').ok_or_else(malformed)?;
        let port = tail
            .strip_prefix(':')
            .and_then(|p| p.parse().ok())
            .ok_or_else(malformed)?;
        Ok((host, port))
    } else {
        let (host, port) = addr.rsplit_once(':').ok_or_else(malformed)?;
        let port = port.parse().map_err(|_| malformed())?;
        Ok((host, port))
    }
}

/// The narrow contract the buffering layer relies on from the socket
/// engine. Semantics live entirely on the engine side; nothing here is
/// validated or re-specified by this crate.
///
/// Ids are engine-assigned socket identifiers; a negative id from the
/// opening calls means the operation failed.
pub trait SocketEngine {
    fn connect(&mut self, host: &str, port: u16) -> i32;
    fn listen(&mut self, host: &str, port: u16, backlog: i32) -> i32;
    /// Adopts an already-open OS descriptor.
    fn bind(&mut self, fd: i32) -> i32;
    fn close(&mut self, id: i32);
    fn shutdown(&mut self, id: i32);
    /// Enables delivery for a socket returned by `listen`/`accept`.
    fn start(&mut self, id: i32);
    fn pause(&mut self, id: i32);
    fn nodelay(&mut self, id: i32);

    /// High-priority send. True when the engine accepted the buffer.
    fn send(&mut self, id: i32, buf: SendBuffer<'_>) -> bool;
    /// Low-priority send, drained only when the high-priority queue is idle.
    fn send_lowpriority(&mut self, id: i32, buf: SendBuffer<'_>) -> bool;

    fn udp_open(&mut self, host: Option<&str>, port: u16) -> i32;
    fn udp_connect(&mut self, id: i32, host: &str, port: u16) -> bool;
    fn udp_dial(&mut self, host: &str, port: u16) -> i32;
    fn udp_listen(&mut self, host: &str, port: u16) -> i32;
    /// `address` is the engine's packed address format, as delivered on
    /// inbound UDP messages.
    fn udp_send(&mut self, id: i32, address: &[u8], buf: SendBuffer<'_>) -> bool;

    fn resolve(&mut self, host: &str) -> Result<Vec<IpAddr>, SockXError>;
}
