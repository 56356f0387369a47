//! Fixed-block signature builder and loader (`spec.md` §4.D, §4.D′).

use std::io::{Read, Write};

use crate::error::Error;
use crate::index::Index;
use crate::magic::MagicNumber;
use crate::rolling_sum::weak_checksum;
use crate::strong::strong_sum;

/// In-memory signature of a file: a header plus one (weak, strong) pair per
/// fixed-size block, and the two-level index built over them.
///
/// A signature produced by [`build_signature`] has an empty `index`; the
/// index is only populated by [`load_signature`], matching `spec.md` §4.D
/// step 5.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureType {
    sig_type: MagicNumber,
    block_len: u32,
    strong_len: u32,
    weak_sigs: Vec<u32>,
    strong_sigs: Vec<Vec<u8>>,
    index: Index,
}

impl SignatureType {
    /// The strong-hash algorithm this signature was built with.
    #[must_use]
    pub const fn sig_type(&self) -> MagicNumber {
        self.sig_type
    }

    /// The uniform block size used when this signature was built.
    #[must_use]
    pub const fn block_len(&self) -> u32 {
        self.block_len
    }

    /// Number of leading strong-hash bytes retained per block.
    #[must_use]
    pub const fn strong_len(&self) -> u32 {
        self.strong_len
    }

    /// Weak sum of the block at `block_idx`, in block order.
    #[must_use]
    pub fn weak_sigs(&self) -> &[u32] {
        &self.weak_sigs
    }

    /// Strong-sum prefix of the block at `block_idx`, in block order.
    #[must_use]
    pub fn strong_sigs(&self) -> &[Vec<u8>] {
        &self.strong_sigs
    }

    /// Number of blocks this signature describes.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.weak_sigs.len()
    }

    /// The two-level weak→strong→block-index lookup table. Empty unless
    /// this signature came from [`load_signature`].
    #[must_use]
    pub const fn index(&self) -> &Index {
        &self.index
    }
}

fn validate_config(sig_type: MagicNumber, block_len: u32, strong_len: u32) -> Result<(), Error> {
    if block_len == 0 {
        return Err(Error::InvalidConfig {
            reason: "block_len must be >= 1".to_string(),
        });
    }
    if strong_len == 0 || strong_len > sig_type.max_strong_len() {
        return Err(Error::InvalidConfig {
            reason: format!(
                "strong_len {strong_len} out of range for {sig_type:?} (max {})",
                sig_type.max_strong_len()
            ),
        });
    }
    Ok(())
}

/// Reads up to `buf.len()` bytes, stopping at EOF, and returns how many
/// bytes were actually read. Unlike [`Read::read_exact`], a short final read
/// is not an error: `spec.md` §4.D step 3 requires the final block to be
/// processed at its actual (possibly short) length.
fn fill_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, Error> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..])? {
            0 => break,
            n => total += n,
        }
    }
    Ok(total)
}

/// Builds a fixed-block signature of `input`, writing the wire-format
/// signature stream to `output`, and returns the in-memory
/// [`SignatureType`] (with an empty index; see [`load_signature`] to
/// obtain one with the index populated).
///
/// # Errors
/// Returns [`Error::InvalidConfig`] if `block_len == 0` or `strong_len`
/// exceeds `sig_type.max_strong_len()`. Returns [`Error::Io`] if `input` or
/// `output` fail.
pub fn build_signature<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    block_len: u32,
    strong_len: u32,
    sig_type: MagicNumber,
) -> Result<SignatureType, Error> {
    validate_config(sig_type, block_len, strong_len)?;

    output.write_all(&sig_type.wire_value().to_be_bytes())?;
    output.write_all(&block_len.to_be_bytes())?;
    output.write_all(&strong_len.to_be_bytes())?;

    let mut signature = SignatureType {
        sig_type,
        block_len,
        strong_len,
        weak_sigs: Vec::new(),
        strong_sigs: Vec::new(),
        index: Index::new(),
    };

    let mut block = vec![0u8; block_len as usize];
    loop {
        let n = fill_block(&mut input, &mut block)?;
        if n == 0 {
            break;
        }
        let data = &block[..n];

        let weak = weak_checksum(data);
        let strong = strong_sum(data, sig_type, strong_len)?;

        output.write_all(&weak.to_be_bytes())?;
        output.write_all(&strong)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(block_idx = signature.weak_sigs.len(), weak, "signed block");

        signature.weak_sigs.push(weak);
        signature.strong_sigs.push(strong);

        if n < block.len() {
            break;
        }
    }

    Ok(signature)
}

/// Parses a signature stream from `reader`, returning a [`SignatureType`]
/// with the two-level index fully populated.
///
/// # Errors
/// Returns [`Error::Malformed`] if the header or a (weak, strong) record is
/// truncated. Returns [`Error::UnsupportedSigType`] if the magic number does
/// not name MD4 or BLAKE2. Returns [`Error::Io`] if `reader` fails.
pub fn load_signature<R: Read>(mut reader: R) -> Result<SignatureType, Error> {
    let sig_type = MagicNumber::from_wire(read_u32(&mut reader, "sig_type")?)?;
    let block_len = read_u32(&mut reader, "block_len")?;
    let strong_len = read_u32(&mut reader, "strong_len")?;

    if block_len == 0 {
        return Err(Error::Malformed {
            reason: "block_len must be >= 1".to_string(),
        });
    }
    if strong_len == 0 || strong_len > sig_type.max_strong_len() {
        return Err(Error::Malformed {
            reason: format!(
                "strong_len {strong_len} out of range for {sig_type:?} (max {})",
                sig_type.max_strong_len()
            ),
        });
    }

    let mut signature = SignatureType {
        sig_type,
        block_len,
        strong_len,
        weak_sigs: Vec::new(),
        strong_sigs: Vec::new(),
        index: Index::new(),
    };

    loop {
        let mut weak_buf = [0u8; 4];
        let read = fill_block(&mut reader, &mut weak_buf)?;
        if read == 0 {
            break;
        }
        if read < 4 {
            return Err(Error::Malformed {
                reason: "signature stream ended mid weak-sum record".to_string(),
            });
        }
        let weak = u32::from_be_bytes(weak_buf);

        let mut strong = vec![0u8; strong_len as usize];
        let read = fill_block(&mut reader, &mut strong)?;
        if read < strong.len() {
            return Err(Error::Malformed {
                reason: "signature stream ended mid strong-sum record".to_string(),
            });
        }

        let block_idx = signature.weak_sigs.len();
        signature.index.insert(weak, &strong, block_idx);
        signature.weak_sigs.push(weak);
        signature.strong_sigs.push(strong);
    }

    Ok(signature)
}

fn read_u32<R: Read>(reader: &mut R, field: &str) -> Result<u32, Error> {
    let mut buf = [0u8; 4];
    let read = fill_block(reader, &mut buf)?;
    if read < 4 {
        return Err(Error::Malformed {
            reason: format!("signature header truncated while reading {field}"),
        });
    }
    Ok(u32::from_be_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn rejects_zero_block_len() {
        let err = build_signature(
            Cursor::new(Vec::<u8>::new()),
            Vec::new(),
            0,
            8,
            MagicNumber::Md4,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn rejects_strong_len_over_max() {
        let err = build_signature(
            Cursor::new(Vec::<u8>::new()),
            Vec::new(),
            64,
            17,
            MagicNumber::Md4,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn empty_input_produces_header_only_signature() {
        let mut out = Vec::new();
        let sig = build_signature(Cursor::new(Vec::<u8>::new()), &mut out, 64, 8, MagicNumber::Md4)
            .unwrap();
        assert_eq!(sig.block_count(), 0);
        assert_eq!(out.len(), 12);
    }

    #[test]
    fn signature_byte_length_matches_formula() {
        let block_len = 16u32;
        let strong_len = 8u32;
        let data: Vec<u8> = (0..=100u8).collect(); // 101 bytes, not a multiple of block_len
        let mut out = Vec::new();
        let sig = build_signature(
            Cursor::new(&data),
            &mut out,
            block_len,
            strong_len,
            MagicNumber::Blake2,
        )
        .unwrap();

        let expected_blocks = (data.len() as u32).div_ceil(block_len) as usize;
        assert_eq!(sig.block_count(), expected_blocks);
        assert_eq!(out.len(), 12 + expected_blocks * (4 + strong_len as usize));
    }

    #[test]
    fn build_then_load_round_trips_fields() {
        let data: Vec<u8> = (0..300u8 as u32).map(|i| i as u8).collect();
        let mut sig_bytes = Vec::new();
        let built =
            build_signature(Cursor::new(&data), &mut sig_bytes, 32, 16, MagicNumber::Md4).unwrap();

        let loaded = load_signature(Cursor::new(&sig_bytes)).unwrap();

        assert_eq!(loaded.sig_type(), built.sig_type());
        assert_eq!(loaded.block_len(), built.block_len());
        assert_eq!(loaded.strong_len(), built.strong_len());
        assert_eq!(loaded.weak_sigs(), built.weak_sigs());
        assert_eq!(loaded.strong_sigs(), built.strong_sigs());
        assert!(built.index().weak_sum_count() == 0);
        assert!(loaded.index().weak_sum_count() > 0);
    }

    #[test]
    fn load_rejects_truncated_header() {
        let err = load_signature(Cursor::new(vec![0u8; 6])).unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }));
    }

    #[test]
    fn load_rejects_truncated_strong_sum() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MagicNumber::Md4.wire_value().to_be_bytes());
        bytes.extend_from_slice(&64u32.to_be_bytes());
        bytes.extend_from_slice(&16u32.to_be_bytes());
        bytes.extend_from_slice(&1u32.to_be_bytes()); // weak sum
        bytes.extend_from_slice(&[0u8; 4]); // only 4 of 16 strong bytes

        let err = load_signature(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }));
    }

    #[test]
    fn load_rejects_unsupported_magic() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&crate::magic::DELTA_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&64u32.to_be_bytes());
        bytes.extend_from_slice(&16u32.to_be_bytes());

        let err = load_signature(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedSigType { .. }));
    }

    #[test]
    fn load_rejects_zero_block_len() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MagicNumber::Md4.wire_value().to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&16u32.to_be_bytes());

        let err = load_signature(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }));
    }
}
