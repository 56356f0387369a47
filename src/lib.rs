//! Rolling-checksum, signature, and delta-encoding primitives for
//! rsync-style binary diffing.
//!
//! The public surface covers three operations: build a block signature of a
//! known ("old") file ([`build_signature`]), load one back from its
//! wire format ([`load_signature`]), and stream a new file against a loaded
//! signature to produce a compact delta opcode stream
//! ([`compute_delta`]). Applying a delta against the old file to reconstruct
//! the new one is intentionally out of scope: this crate produces deltas,
//! it does not consume them.

pub mod delta;
pub mod emit;
pub mod error;
pub mod index;
pub mod magic;
pub mod rolling_sum;
pub mod signature;
pub mod strong;

#[cfg(test)]
mod test_patch;

pub use delta::compute_delta;
pub use error::{Error, Result};
pub use index::Index;
pub use magic::{MagicNumber, BLAKE2_SIG_MAGIC, DELTA_MAGIC, MD4_SIG_MAGIC};
pub use rolling_sum::{weak_checksum, Rollsum};
pub use signature::{build_signature, load_signature, SignatureType};
pub use strong::strong_sum;
