//! Wire-format magic numbers (`spec.md` §6), matching the reference
//! librsync format byte-for-byte.

use crate::error::Error;

/// Prefix of every delta stream.
pub const DELTA_MAGIC: u32 = 0x7273_0236;
/// Signature stream whose strong sum is MD4.
pub const MD4_SIG_MAGIC: u32 = 0x7273_0136;
/// Signature stream whose strong sum is BLAKE2b-256.
pub const BLAKE2_SIG_MAGIC: u32 = 0x7273_0137;

/// Selects the strong-hash algorithm used by a signature stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MagicNumber {
    /// Strong sum is MD4, truncated to `strong_len` bytes.
    Md4,
    /// Strong sum is BLAKE2b-256, truncated to `strong_len` bytes.
    Blake2,
}

impl MagicNumber {
    /// Maximum number of leading strong-sum bytes this algorithm can supply.
    #[must_use]
    pub const fn max_strong_len(self) -> u32 {
        match self {
            Self::Md4 => 16,
            Self::Blake2 => 32,
        }
    }

    /// The 32-bit wire value for this algorithm's signature magic number.
    #[must_use]
    pub const fn wire_value(self) -> u32 {
        match self {
            Self::Md4 => MD4_SIG_MAGIC,
            Self::Blake2 => BLAKE2_SIG_MAGIC,
        }
    }

    /// Parses a signature magic number read off the wire.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedSigType`] for any value other than
    /// [`MD4_SIG_MAGIC`] or [`BLAKE2_SIG_MAGIC`].
    pub fn from_wire(value: u32) -> Result<Self, Error> {
        match value {
            MD4_SIG_MAGIC => Ok(Self::Md4),
            BLAKE2_SIG_MAGIC => Ok(Self::Blake2),
            magic => Err(Error::UnsupportedSigType { magic }),
        }
    }
}
