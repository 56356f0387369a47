//! Error type shared by every subsystem in this crate.

/// Failure modes surfaced by signature building/loading and delta encoding.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller-supplied reader or writer failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The signature stream's magic number does not name a supported strong
    /// hash algorithm.
    #[error("unsupported signature magic number: {magic:#010x}")]
    UnsupportedSigType {
        /// The 32-bit magic number read from the stream.
        magic: u32,
    },

    /// `block_len` was zero, or `strong_len` exceeds the algorithm's maximum.
    #[error("invalid signature configuration: {reason}")]
    InvalidConfig {
        /// Human-readable explanation of which constraint was violated.
        reason: String,
    },

    /// A signature stream ended mid-record, or otherwise could not be parsed.
    #[error("malformed signature stream: {reason}")]
    Malformed {
        /// Human-readable explanation of where parsing failed.
        reason: String,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
