//! # SOCK-X
//!
//! Inbound socket buffering: a slab-pooled chain of raw byte blocks per
//! connection, with exact-size extraction, cross-node separator scanning,
//! and a big-endian length-prefix codec for framed protocols.
//!
//! The facade re-exports the workspace crates; see `sockx-transport` for the
//! hot-path types.

pub use sockx_core::{BufferConfig, SockXError};
pub use sockx_dsa::{NodeArena, NodeHandle, RawBlock};
pub use sockx_codec::{decode_header, encode_header};
pub use sockx_transport::{
    concat_fragments, send_fragments, split_address, BufferDriver, InboundPayload, MessageKind,
    SendBuffer, SendFragment, SocketBuffer, SocketEngine, SocketMessage,
};
pub use sockx_transport::message::parse_udp_address;
