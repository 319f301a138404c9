use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use bytes::Bytes;
use sockx_core::SockXError;
use sockx_dsa::RawBlock;

/// Kinds of inbound notifications the socket engine delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// TCP payload bytes.
    Data = 1,
    /// An outbound connect completed; the socket is usable.
    Connect = 2,
    /// The peer or the engine closed the socket.
    Close = 3,
    /// A listener produced a new connection.
    Accept = 4,
    /// The socket failed and is unusable.
    Error = 5,
    /// UDP payload bytes, with the packed sender address attached.
    Udp = 6,
    /// A non-fatal condition (send-queue pressure and the like).
    Warning = 7,
}

impl MessageKind {
    pub fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            1 => MessageKind::Data,
            2 => MessageKind::Connect,
            3 => MessageKind::Close,
            4 => MessageKind::Accept,
            5 => MessageKind::Error,
            6 => MessageKind::Udp,
            7 => MessageKind::Warning,
            _ => return None,
        })
    }
}

/// Payload of a data-bearing message.
///
/// Small reads arrive inline, already copied next to the notification;
/// larger or object-backed reads arrive as an owned block whose ownership
/// transfers to whoever consumes the message.
#[derive(Debug)]
pub enum InboundPayload {
    Inline(Bytes),
    Block(RawBlock),
}

/// One inbound notification from the socket engine.
#[derive(Debug)]
pub struct SocketMessage {
    pub kind: MessageKind,
    /// Socket id the notification concerns.
    pub id: i32,
    /// Kind-specific quantity: payload length for data, accepted id for
    /// accept, pending byte count for warnings.
    pub ud: i32,
    pub payload: InboundPayload,
    /// Packed sender address, present on `Udp` messages.
    pub udp_address: Option<Bytes>,
}

impl SocketMessage {
    pub fn data(id: i32, block: RawBlock) -> Self {
        let ud = block.len() as i32;
        Self {
            kind: MessageKind::Data,
            id,
            ud,
            payload: InboundPayload::Block(block),
            udp_address: None,
        }
    }

    pub fn inline(kind: MessageKind, id: i32, bytes: Bytes) -> Self {
        let ud = bytes.len() as i32;
        Self {
            kind,
            id,
            ud,
            payload: InboundPayload::Inline(bytes),
            udp_address: None,
        }
    }
}

/// Decodes the engine's packed UDP address: one family byte, a big-endian
/// port, then 4 (v4) or 16 (v6) address bytes.
pub fn parse_udp_address(raw: &[u8]) -> Result<(IpAddr, u16), SockXError> {
    let malformed = || SockXError::InvalidAddress(format!("{:02x?}", raw));
    if raw.len() != 1 + 2 + 4 && raw.len() != 1 + 2 + 16 {
        return Err(malformed());
    }
    let port = u16::from_be_bytes([raw[1], raw[2]]);
    let ip = if raw.len() == 1 + 2 + 4 {
        let mut octets = [0u8; 4];
        octets.copy_from_slice(&raw[3..7]);
        IpAddr::V4(Ipv4Addr::from(octets))
    } else {
        let mut octets = [0u8; 16];
        octets.copy_from_slice(&raw[3..19]);
        IpAddr::V6(Ipv6Addr::from(octets))
    };
    Ok((ip, port))
}
