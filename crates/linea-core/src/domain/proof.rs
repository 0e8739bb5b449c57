//! Kani Proofs for the Bitset
//!
//! The search relies on two bitset properties: the incremental hash always
//! equals the XOR of the blocks, and set/reset are exact inverses. Both are
//! checked here for every position of a two-block bitset.
//!
//! # Kani Limitations
//!
//! Vectors are kept to two blocks so that unwinding stays small.

#![cfg(kani)]

use super::bitset::{Bitset, BITS_PER_BLOCK};

// ============================================================================
// Bitset Proofs
// ============================================================================

/// Verify set/reset round trip for an arbitrary position
///
/// # Properties Verified
///
/// 1. `set` on a clear bit reports a change and sets it
/// 2. `reset` undoes `set` exactly (equality and hash)
#[kani::proof]
#[kani::unwind(4)]
fn proof_set_reset_round_trip() {
    let pos: usize = kani::any();
    kani::assume(pos < 2 * BITS_PER_BLOCK);

    let empty = Bitset::new(2 * BITS_PER_BLOCK - 1);
    let mut bitset = empty.clone();

    kani::assert(bitset.set(pos), "set on a clear bit is a change");
    kani::assert(bitset.is_set(pos), "bit is set");
    kani::assert(bitset.count() == 1, "one bit set");

    kani::assert(bitset.reset(pos), "reset on a set bit is a change");
    kani::assert(bitset == empty, "reset undoes set");
    kani::assert(bitset.hash_code() == 0, "hash returns to zero");
}

/// Verify that the hash of two set bits is the XOR of their masks
///
/// # Properties Verified
///
/// 1. Bits in different blocks both contribute to the hash
/// 2. Setting an already set bit leaves hash and count alone
#[kani::proof]
#[kani::unwind(4)]
fn proof_hash_is_block_xor() {
    let a: usize = kani::any();
    let b: usize = kani::any();
    kani::assume(a < BITS_PER_BLOCK);
    kani::assume(b >= BITS_PER_BLOCK && b < 2 * BITS_PER_BLOCK);

    let mut bitset = Bitset::new(2 * BITS_PER_BLOCK - 1);
    bitset.set(a);
    bitset.set(b);

    let expected = (1u64 << a) ^ (1u64 << (b - BITS_PER_BLOCK));
    kani::assert(bitset.hash_code() == expected, "hash is XOR of blocks");

    kani::assert(!bitset.set(a), "second set is not a change");
    kani::assert(bitset.hash_code() == expected, "hash unchanged");
    kani::assert(bitset.count() == 2, "count unchanged");
}
