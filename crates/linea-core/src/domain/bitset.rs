//! Block-based bitsets with an O(1) hash
//!
//! # Incremental Hashing
//!
//! XOR forms an abelian group, so the hash of a bitset can be kept up to
//! date in constant time: whenever a block changes, the old block value is
//! XOR-ed out of the hash and the new one XOR-ed in.
//!
//! ```text
//! hash = b[0] ^ b[1] ^ ... ^ b[n-1]
//!
//! set(pos):  old = b[i];  b[i] |= mask;  hash ^= old ^ b[i]
//! ```
//!
//! This matters because the search engine hashes the set of linearized
//! entries once per step; with the incremental scheme that costs the same
//! for a history of ten entries as for one of a million.
//!
//! # Equality
//!
//! Two bitsets are equal only if they have the same number of blocks and
//! identical block contents. A bitset with capacity for 64 positions is
//! never equal to one with capacity for 128, even when both have exactly
//! the same bits set.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Width of a block in bits
pub const BITS_PER_BLOCK: usize = u64::BITS as usize;

#[inline(always)]
const fn block_index(pos: usize) -> usize {
    pos / BITS_PER_BLOCK
}

#[inline(always)]
const fn blocks_size(max_pos: usize) -> usize {
    block_index(max_pos) + 1
}

#[inline(always)]
const fn bit_mask(pos: usize) -> u64 {
    1u64 << (pos % BITS_PER_BLOCK)
}

/// Fixed-capacity set of bits with persistence helpers
///
/// The capacity is chosen at construction and never changes; positions
/// beyond it read as unset and may not be written.
#[derive(Clone)]
pub struct Bitset {
    blocks: Vec<u64>,
    hash: u64,
    count: usize,
}

impl Bitset {
    /// Create an empty bitset that can hold positions `0..=max_pos`
    pub fn new(max_pos: usize) -> Self {
        Self {
            blocks: vec![0; blocks_size(max_pos)],
            hash: 0,
            count: 0,
        }
    }

    /// True if no bit is set
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of set bits
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of addressable positions
    #[inline]
    pub fn capacity(&self) -> usize {
        self.blocks.len() * BITS_PER_BLOCK
    }

    /// Constant-time hash of the block contents
    #[inline(always)]
    pub fn hash_code(&self) -> u64 {
        self.hash
    }

    #[inline(always)]
    fn update_hash(&mut self, old_block: u64, new_block: u64) {
        self.hash ^= old_block;
        self.hash ^= new_block;
    }

    fn block_mut(&mut self, pos: usize) -> &mut u64 {
        let i = block_index(pos);
        assert!(
            i < self.blocks.len(),
            "Bitset position {} out of bounds (capacity {})",
            pos,
            self.capacity()
        );
        &mut self.blocks[i]
    }

    /// Set the bit at `pos`
    ///
    /// Returns `true` if the bit was previously unset.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is beyond the capacity.
    pub fn set(&mut self, pos: usize) -> bool {
        let block = self.block_mut(pos);
        let old = *block;
        *block |= bit_mask(pos);
        let new = *block;

        self.update_hash(old, new);

        let changed = old != new;
        self.count += usize::from(changed);
        changed
    }

    /// Clear the bit at `pos`
    ///
    /// Returns `true` if the bit was previously set.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is beyond the capacity.
    pub fn reset(&mut self, pos: usize) -> bool {
        let block = self.block_mut(pos);
        let old = *block;
        *block &= !bit_mask(pos);
        let new = *block;

        self.update_hash(old, new);

        let changed = old != new;
        self.count -= usize::from(changed);
        changed
    }

    /// Copy of `self` with the bit at `pos` set
    #[must_use]
    pub fn with_set(&self, pos: usize) -> Self {
        let mut copy = self.clone();
        copy.set(pos);
        copy
    }

    /// Copy of `self` with the bit at `pos` cleared
    #[must_use]
    pub fn with_reset(&self, pos: usize) -> Self {
        let mut copy = self.clone();
        copy.reset(pos);
        copy
    }

    /// Is the bit at `pos` set? Positions beyond the capacity are unset.
    #[inline]
    pub fn is_set(&self, pos: usize) -> bool {
        self.blocks
            .get(block_index(pos))
            .is_some_and(|block| block & bit_mask(pos) != 0)
    }

    /// Iterate over the set positions in increasing order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.blocks.iter().enumerate().flat_map(|(i, &block)| {
            let mut bits = block;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let offset = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some(i * BITS_PER_BLOCK + offset)
            })
        })
    }

    /// Grow the block vector so that `pos` becomes addressable
    fn ensure_capacity(&mut self, pos: usize) {
        let needed = blocks_size(pos);
        if self.blocks.len() < needed {
            // new blocks are zero, which leaves the XOR hash unchanged
            self.blocks.resize(needed, 0);
        }
    }
}

impl PartialEq for Bitset {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.blocks == other.blocks
    }
}

impl Eq for Bitset {}

impl Hash for Bitset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Debug for Bitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitset")
            .field("capacity", &self.capacity())
            .field("hash", &format_args!("{:#018x}", self.hash))
            .field("bits", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

/// Growable bitset for sequential models
///
/// Starts with a single block and allocates more whenever `set` or `reset`
/// touches a position beyond the current capacity. Growth is visible to
/// equality: see the [module docs](self).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FlexibleBitset {
    bitset: Bitset,
}

impl FlexibleBitset {
    /// Empty bitset with a single block
    pub fn new() -> Self {
        Self {
            bitset: Bitset::new(1),
        }
    }

    /// Empty bitset preallocated for positions `0..=max_pos`
    pub fn with_max_pos(max_pos: usize) -> Self {
        Self {
            bitset: Bitset::new(max_pos),
        }
    }

    /// True if no bit is set
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bitset.is_empty()
    }

    /// Set the bit at `pos`, growing if needed. Returns `true` if it changed.
    pub fn set(&mut self, pos: usize) -> bool {
        self.bitset.ensure_capacity(pos);
        self.bitset.set(pos)
    }

    /// Clear the bit at `pos`, growing if needed. Returns `true` if it changed.
    pub fn reset(&mut self, pos: usize) -> bool {
        self.bitset.ensure_capacity(pos);
        self.bitset.reset(pos)
    }

    /// Is the bit at `pos` set?
    #[inline]
    pub fn is_set(&self, pos: usize) -> bool {
        self.bitset.is_set(pos)
    }

    /// Constant-time hash of the block contents
    #[inline(always)]
    pub fn hash_code(&self) -> u64 {
        self.bitset.hash_code()
    }

    /// Borrow the underlying fixed-capacity bitset
    pub fn as_bitset(&self) -> &Bitset {
        &self.bitset
    }
}

impl Default for FlexibleBitset {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FlexibleBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.bitset.iter()).finish()
    }
}
