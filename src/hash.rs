//! Polynomial string hash used to select a bucket.
//!
//! The hash is a pure function of the key bytes and the bucket count. It is
//! recomputed on every access and on every rehome during growth; nothing
//! caches it, since the bucket count changes between tiers.
//!
//! Key bytes widen as unsigned values and the accumulator wraps at 64 bits,
//! so a key maps to the same bucket on every platform. This is deliberate:
//! hashes over a signed `char` sign-extend bytes >= 0x80 and would place
//! non-ASCII keys (and order `map` traversal) differently. No lookup result
//! depends on the choice.

/// Multiplier of the polynomial hash: `h = h * HASH_MULTIPLIER + byte`.
pub const HASH_MULTIPLIER: u64 = 65599;

/// Full (unreduced) hash of `key`. Wraps at 64 bits.
#[inline]
pub fn raw_hash(key: &str) -> u64 {
    key.bytes().fold(0u64, |h, b| {
        h.wrapping_mul(HASH_MULTIPLIER).wrapping_add(u64::from(b))
    })
}

/// Bucket index of `key` in a table of `bucket_count` buckets.
///
/// Panics if `bucket_count` is zero.
#[inline]
pub fn bucket_index(key: &str, bucket_count: usize) -> usize {
    assert!(bucket_count > 0, "bucket count must be non-zero");
    (raw_hash(key) % bucket_count as u64) as usize
}
