pub mod buffer;
pub mod driver;
pub mod engine;
pub mod message;

pub use buffer::SocketBuffer;
pub use driver::BufferDriver;
pub use engine::{concat_fragments, send_fragments, split_address, SendBuffer, SendFragment, SocketEngine};
pub use message::{InboundPayload, MessageKind, SocketMessage};
