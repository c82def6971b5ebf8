//! Fixed ascending sequence of prime bucket counts.

/// Bucket counts a table moves through as it grows. Read-only, shared by
/// every table.
pub const BUCKET_COUNTS: [usize; 8] = [509, 1021, 2039, 4093, 8191, 16381, 32749, 65521];

/// Index into [`BUCKET_COUNTS`]. Only ever advances for a given table.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Tier(usize);

impl Tier {
    pub const SMALLEST: Tier = Tier(0);
    pub const LARGEST: Tier = Tier(BUCKET_COUNTS.len() - 1);

    /// Smallest tier that holds `bindings` without triggering growth, or the
    /// largest tier if none does.
    pub fn for_capacity(bindings: usize) -> Tier {
        BUCKET_COUNTS
            .iter()
            .position(|&count| bindings < count)
            .map(Tier)
            .unwrap_or(Tier::LARGEST)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }

    #[inline]
    pub fn bucket_count(self) -> usize {
        BUCKET_COUNTS[self.0]
    }

    /// The following tier, or `None` at the largest one.
    #[inline]
    pub fn next(self) -> Option<Tier> {
        (self.0 + 1 < BUCKET_COUNTS.len()).then(|| Tier(self.0 + 1))
    }

    #[inline]
    pub fn is_largest(self) -> bool {
        self == Tier::LARGEST
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::SMALLEST
    }
}
