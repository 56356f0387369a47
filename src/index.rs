//! Two-level signature index (`spec.md` §3, §4.C): weak sum → strong sum →
//! block index, used by the delta encoder to confirm a weak-sum hit.

use std::collections::HashMap;

/// Maps a weak checksum to the strong sums of every block that shares it,
/// and each of those strong sums to the block's position in the old file.
///
/// The inner key is the raw strong-sum bytes, treated as an opaque binary
/// key, never as text, per `spec.md` §4.C.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Index {
    weak: HashMap<u32, HashMap<Vec<u8>, usize>>,
}

impl Index {
    /// Returns an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the block at `block_idx` has weak sum `weak` and strong
    /// sum `strong`. On a (weak, strong) collision the latest insertion
    /// wins; the delta encoder's explicit re-verification against
    /// `strong_sigs[block_idx]` (`spec.md` §4.E) is what makes this safe.
    pub fn insert(&mut self, weak: u32, strong: &[u8], block_idx: usize) {
        self.weak
            .entry(weak)
            .or_default()
            .insert(strong.to_vec(), block_idx);
    }

    /// Returns the block index whose weak and strong sums both match, if
    /// any.
    #[must_use]
    pub fn lookup(&self, weak: u32, strong: &[u8]) -> Option<usize> {
        self.weak.get(&weak)?.get(strong).copied()
    }

    /// Returns the inner strong-sum table for `weak`, if any block shares
    /// that weak sum. Exposed so the delta encoder can skip the strong-sum
    /// computation entirely on a weak-sum miss.
    #[must_use]
    pub fn lookup_weak(&self, weak: u32) -> Option<&HashMap<Vec<u8>, usize>> {
        self.weak.get(&weak)
    }

    /// Number of distinct weak sums currently indexed.
    #[must_use]
    pub fn weak_sum_count(&self) -> usize {
        self.weak.len()
    }
}
