//! symtable: a single-threaded symbol table mapping owned string keys to
//! values, built on separate chaining over prime-sized bucket tiers.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a plain associative array whose behavior is fully determined by
//!   its inputs: a fixed polynomial hash, a fixed sequence of bucket counts,
//!   head-inserted chains.
//! - Layers:
//!   - `hash`: `h = h * 65599 + byte` over every key byte, reduced modulo the
//!     current bucket count.
//!   - `tiers`: the read-only sequence 509, 1021, ..., 65521 and a `Tier`
//!     index into it.
//!   - `SymTable<V>`: bucket heads plus an arena of bindings linked into
//!     chains; put/replace/get/remove/map and growth.
//!
//! Constraints
//! - Single-threaded; mutation goes through `&mut self`, so concurrent or
//!   reentrant mutation (including from a `map` callback) does not compile.
//! - Unique keys. A duplicate `put` is a reported no-op (`Ok(false)`), not an
//!   update; `replace` only overwrites existing bindings.
//! - The table owns a copy of every key and never inspects values.
//! - Capacity only grows. When the binding count reaches the bucket count,
//!   every binding is moved to the next tier's array; at the largest tier
//!   chains grow instead.
//!
//! Storage
//! - Bindings live in a `SlotMap`; a chain is a singly linked list of arena
//!   keys. Growth relinks bindings into a fresh bucket array without moving
//!   or reallocating keys.
//! - The bucket index is recomputed from the key on every access. Nothing
//!   caches it, since it depends on the bucket count.
//!
//! Failure
//! - Key copies and bucket arrays are reserved fallibly and surface as
//!   [`AllocError`]; the table is unchanged when `put` fails.
//! - A growth that cannot allocate is abandoned and logged. The insert that
//!   triggered it stands.
//!
//! Notes and non-goals
//! - No ordering among keys. Traversal is bucket order, then chain order,
//!   which changes across growth.
//! - No shrinking, no range queries, no persistence.

mod error;
pub mod hash;
mod sym_table;
#[cfg(test)]
mod sym_table_proptest;
pub mod tiers;

// Public surface
pub use error::AllocError;
pub use sym_table::{IntoIter, Iter, SymTable};
pub use tiers::Tier;
