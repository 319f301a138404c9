pub mod arena;
pub mod block;

pub use arena::{NodeArena, NodeHandle};
pub use block::RawBlock;
