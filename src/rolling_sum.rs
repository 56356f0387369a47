//! Rolling weak checksum (`spec.md` §3, §4.A): an Adler-like checksum that
//! supports O(1) window advance via `rollin`/`rollout`/`rotate`.

/// Constant folded into every byte before it is summed, chosen (as in
/// upstream rsync) for hashing quality rather than any deeper meaning.
const C: u16 = 31;

/// Rolling checksum state for a sliding window of bytes.
///
/// `count` tracks how many bytes are currently represented in `s1`/`s2`;
/// `s1`/`s2` are 16-bit accumulators that wrap on overflow, matching the
/// reference algorithm's modular-2^16 arithmetic exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rollsum {
    count: u64,
    s1: u16,
    s2: u16,
}

impl Rollsum {
    /// Returns a freshly reset rolling checksum.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: 0,
            s1: 0,
            s2: 0,
        }
    }

    /// Number of bytes currently folded into this checksum's window.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Combines the two accumulators into the 32-bit rolling digest.
    #[must_use]
    pub const fn digest(&self) -> u32 {
        ((self.s2 as u32) << 16) | (self.s1 as u32)
    }

    /// Re-zeroes the checksum to the empty-window state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Batch-initializes the checksum from an empty window, equivalent to
    /// calling [`Rollsum::rollin`] once per byte of `data` but unrolled 16
    /// bytes at a time for performance.
    pub fn update(&mut self, data: &[u8]) {
        let len = data.len();
        let mut n = 0;
        while n + 16 <= len {
            for i in 0..16 {
                self.s1 = self.s1.wrapping_add(u16::from(data[n + i]));
                self.s2 = self.s2.wrapping_add(self.s1);
            }
            n += 16;
        }
        while n < len {
            self.s1 = self.s1.wrapping_add(u16::from(data[n]));
            self.s2 = self.s2.wrapping_add(self.s1);
            n += 1;
        }

        let l = len as u64;
        let triangular = l.wrapping_mul(l.wrapping_add(1)) / 2;
        self.s1 = self.s1.wrapping_add((l.wrapping_mul(u64::from(C))) as u16);
        self.s2 = self
            .s2
            .wrapping_add((triangular.wrapping_mul(u64::from(C))) as u16);
        self.count = self.count.wrapping_add(l);
    }

    /// Extends the window on the right by one byte.
    pub fn rollin(&mut self, b: u8) {
        self.s1 = self.s1.wrapping_add(u16::from(b)).wrapping_add(C);
        self.s2 = self.s2.wrapping_add(self.s1);
        self.count += 1;
    }

    /// Removes one byte from the left of the window.
    pub fn rollout(&mut self, b: u8) {
        let weighted = u16::from(b).wrapping_add(C);
        self.s1 = self.s1.wrapping_sub(weighted);
        self.s2 = self
            .s2
            .wrapping_sub((self.count as u16).wrapping_mul(weighted));
        self.count -= 1;
    }

    /// Equivalent to `rollout(out)` followed by `rollin(in_)`, preserving
    /// `count`, but computed without an intermediate state.
    pub fn rotate(&mut self, out: u8, in_: u8) {
        self.s1 = self
            .s1
            .wrapping_add(u16::from(in_))
            .wrapping_sub(u16::from(out));
        let weighted_out = u16::from(out).wrapping_add(C);
        self.s2 = self
            .s2
            .wrapping_add(self.s1)
            .wrapping_sub((self.count as u16).wrapping_mul(weighted_out));
    }
}

/// Computes the weak checksum of a complete buffer in one shot.
#[must_use]
pub fn weak_checksum(data: &[u8]) -> u32 {
    let mut sum = Rollsum::new();
    sum.update(data);
    sum.digest()
}
