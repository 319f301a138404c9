use serde::Deserialize;
use sockx_dsa::NodeArena;

use crate::error::SockXError;

/// Tunables for the per-service buffering layer.
///
/// Every field has a conservative default; services typically deserialize
/// this from the service-level TOML and hand it to `BufferDriver::new`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BufferConfig {
    /// Slab-count threshold past which every further pool allocation logs a
    /// warning. Runaway growth here almost always means the consumer stopped
    /// draining, not that the pool needs to be bigger.
    pub pool_warning_threshold: usize,
    /// Soft cap on one connection's unread backlog, in bytes. Exceeding it
    /// logs a warning; it never rejects a push.
    pub buffer_limit: usize,
    /// Default listen backlog handed to the engine.
    pub backlog: i32,
    /// Zero the payload of every recycled block before its memory is freed.
    pub scrub_on_release: bool,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            pool_warning_threshold: 32,
            buffer_limit: 256 * 1024,
            backlog: 32,
            scrub_on_release: false,
        }
    }
}

impl BufferConfig {
    pub fn from_toml(raw: &str) -> Result<Self, SockXError> {
        toml::from_str(raw).map_err(|e| SockXError::Config(e.to_string()))
    }

    /// Builds a node arena matching this configuration.
    pub fn build_arena(&self) -> NodeArena {
        NodeArena::new(self.pool_warning_threshold, self.scrub_on_release)
    }
}
