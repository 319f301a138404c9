use std::fmt;

/// Errors surfaced by the buffering layer.
///
/// Insufficient data is deliberately absent: `pop`/`read_line` signal it as
/// the empty arm of their return value, and callers retry once more bytes
/// arrive. Only structural violations become errors.
#[derive(Debug)]
pub enum SockXError {
    Transport(std::io::Error),
    /// Length-prefix header outside the 1..=4 byte range.
    InvalidHeader(usize),
    /// An operation was invoked against a missing buffer or pool reference.
    InvalidOperand(&'static str),
    InvalidAddress(String),
    /// Fragment aggregation hit a non-byte element at the given index.
    Aggregation(usize),
    Config(String),
}

impl fmt::Display for SockXError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SockXError::Transport(e) => write!(f, "transport failure: {}", e),
            SockXError::InvalidHeader(len) => {
                write!(f, "invalid header: {} bytes (expected 1..=4)", len)
            }
            SockXError::InvalidOperand(what) => write!(f, "need {} object", what),
            SockXError::InvalidAddress(addr) => write!(f, "invalid address {}", addr),
            SockXError::Aggregation(idx) => {
                write!(f, "invalid fragment at index {} during aggregation", idx)
            }
            SockXError::Config(reason) => write!(f, "configuration error: {}", reason),
        }
    }
}

impl std::error::Error for SockXError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SockXError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SockXError {
    fn from(e: std::io::Error) -> Self {
        SockXError::Transport(e)
    }
}
