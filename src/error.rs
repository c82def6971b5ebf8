use std::collections::TryReserveError;
use thiserror::Error;

/// Allocation failure reported by a table operation. The table is left in
/// its prior state.
#[derive(Debug, Error)]
pub enum AllocError {
    #[error("failed to allocate storage for a {len}-byte key")]
    Key {
        len: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("failed to allocate an array of {buckets} buckets")]
    Buckets {
        buckets: usize,
        #[source]
        source: TryReserveError,
    },
}
