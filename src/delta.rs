//! Delta encoder (`spec.md` §4.E): a byte-at-a-time streaming scanner with a
//! block-sized sliding window that decides match-or-literal and emits a
//! compact opcode stream.

use std::collections::VecDeque;
use std::io::{BufReader, Read, Write};

use crate::emit::Emitter;
use crate::error::Error;
use crate::magic::DELTA_MAGIC;
use crate::rolling_sum::Rollsum;
use crate::signature::SignatureType;
use crate::strong::strong_sum;

/// Streams `input` against `signature`, writing a delta opcode stream to
/// `output` sufficient to reconstruct `input` from the old file the
/// signature describes.
///
/// # Errors
/// Returns [`Error::Io`] if `input` or `output` fail. Strong-sum collisions
/// against `signature` are not an error (`spec.md` §7); the affected block
/// is silently treated as a non-match and scanning continues.
pub fn compute_delta<R: Read, W: Write>(
    signature: &SignatureType,
    input: R,
    output: W,
) -> Result<(), Error> {
    let block_len = u64::from(signature.block_len());
    let sig_type = signature.sig_type();
    let strong_len = signature.strong_len();

    let mut emitter = Emitter::new(output);
    emitter.write_raw(&DELTA_MAGIC.to_be_bytes())?;

    let mut reader = BufReader::new(input);
    let mut rolling = Rollsum::new();
    let mut window: VecDeque<u8> = VecDeque::with_capacity(block_len as usize);
    let mut prev_byte: u8 = 0;

    let mut byte_buf = [0u8; 1];
    loop {
        let n = reader.read(&mut byte_buf)?;
        if n == 0 {
            break;
        }
        let b = byte_buf[0];

        if let Some(&front) = window.front() {
            prev_byte = front;
        }
        window.push_back(b);
        rolling.rollin(b);

        if rolling.count() < block_len {
            continue;
        }

        if rolling.count() > block_len {
            emitter.add_literal(prev_byte)?;
            rolling.rollout(prev_byte);
            window.pop_front();
        }

        let candidate = rolling.digest();
        if let Some(inner) = signature.index().lookup_weak(candidate) {
            let window_bytes: Vec<u8> = window.iter().copied().collect();
            let strong2 = strong_sum(&window_bytes, sig_type, strong_len)?;
            if let Some(&block_idx) = inner.get(strong2.as_slice()) {
                if signature.strong_sigs()[block_idx] == strong2 {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(block_idx, "copy match");

                    rolling.reset();
                    window.clear();
                    emitter.add_copy(block_idx as u64 * block_len, block_len)?;
                }
            }
        }
    }

    for b in window.drain(..) {
        emitter.add_literal(b)?;
    }

    emitter.finish()
}
