//! SymTable: string-keyed bindings in separately chained buckets.

use crate::error::AllocError;
use crate::hash::bucket_index;
use crate::tiers::Tier;
use core::fmt;
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace, warn};

new_key_type! {
    /// Arena key of a binding; chains link bindings through these.
    struct BindingId;
}

#[derive(Debug)]
struct Binding<V> {
    key: Box<str>,
    value: V,
    next: Option<BindingId>,
}

/// Associative array from owned string keys to values of type `V`.
///
/// Bindings are kept in an arena and threaded into singly linked chains, one
/// chain per bucket. The bucket count follows [`crate::tiers::BUCKET_COUNTS`]
/// and advances one tier whenever the binding count reaches it; the largest
/// tier is never left, and chains simply lengthen beyond it.
///
/// The table owns a copy of every key. It never inspects values.
pub struct SymTable<V> {
    buckets: Vec<Option<BindingId>>,
    bindings: SlotMap<BindingId, Binding<V>>,
    tier: Tier,
}

fn alloc_buckets(buckets: usize) -> Result<Vec<Option<BindingId>>, AllocError> {
    let mut heads = Vec::new();
    heads
        .try_reserve_exact(buckets)
        .map_err(|source| AllocError::Buckets { buckets, source })?;
    heads.resize(buckets, None);
    Ok(heads)
}

fn copy_key(key: &str) -> Result<Box<str>, AllocError> {
    let mut owned = String::new();
    owned
        .try_reserve_exact(key.len())
        .map_err(|source| AllocError::Key {
            len: key.len(),
            source,
        })?;
    owned.push_str(key);
    Ok(owned.into_boxed_str())
}

impl<V> SymTable<V> {
    /// Empty table at the smallest tier.
    pub fn new() -> Self {
        Self::at_tier(Tier::SMALLEST)
    }

    /// Like [`SymTable::new`], but reports failure to allocate the bucket
    /// array instead of aborting.
    pub fn try_new() -> Result<Self, AllocError> {
        Ok(Self {
            buckets: alloc_buckets(Tier::SMALLEST.bucket_count())?,
            bindings: SlotMap::with_key(),
            tier: Tier::SMALLEST,
        })
    }

    /// Empty table at the smallest tier that holds `bindings` entries
    /// without growing.
    pub fn with_capacity(bindings: usize) -> Self {
        Self::at_tier(Tier::for_capacity(bindings))
    }

    fn at_tier(tier: Tier) -> Self {
        Self {
            buckets: vec![None; tier.bucket_count()],
            bindings: SlotMap::with_key(),
            tier,
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Current bucket count.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Current position in the bucket-count sequence.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    fn find(&self, key: &str) -> Option<BindingId> {
        self.find_in(bucket_index(key, self.buckets.len()), key)
    }

    fn find_in(&self, bucket: usize, key: &str) -> Option<BindingId> {
        let mut cursor = self.buckets[bucket];
        while let Some(id) = cursor {
            let binding = &self.bindings[id];
            if *binding.key == *key {
                return Some(id);
            }
            cursor = binding.next;
        }
        None
    }

    /// Bind `key` to `value`.
    ///
    /// Returns `Ok(false)` without touching the existing binding when `key`
    /// is already present; use [`SymTable::replace`] to overwrite. Growth
    /// triggered by the insert never fails the insert.
    ///
    /// Growth only fires when the binding count lands exactly on the bucket
    /// count. If that growth cannot allocate, the count moves past the bucket
    /// count and the table stays at its tier from then on, with chains
    /// absorbing further bindings as they do at the largest tier.
    pub fn put(&mut self, key: &str, value: V) -> Result<bool, AllocError> {
        self.put_with(key, value, copy_key, alloc_buckets)
    }

    fn put_with<C, A>(
        &mut self,
        key: &str,
        value: V,
        copy: C,
        alloc: A,
    ) -> Result<bool, AllocError>
    where
        C: FnOnce(&str) -> Result<Box<str>, AllocError>,
        A: FnOnce(usize) -> Result<Vec<Option<BindingId>>, AllocError>,
    {
        let bucket = bucket_index(key, self.buckets.len());
        if self.find_in(bucket, key).is_some() {
            return Ok(false);
        }
        let key = copy(key)?;
        let id = self.bindings.insert(Binding {
            key,
            value,
            next: self.buckets[bucket],
        });
        self.buckets[bucket] = Some(id);

        if self.bindings.len() == self.buckets.len() {
            self.grow(alloc);
        }
        Ok(true)
    }

    /// Overwrite the value bound to `key` and return the previous one.
    /// Returns `None` and inserts nothing when `key` is absent.
    pub fn replace(&mut self, key: &str, value: V) -> Option<V> {
        let id = self.find(key)?;
        Some(core::mem::replace(&mut self.bindings[id].value, value))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.find(key).map(|id| &self.bindings[id].value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let id = self.find(key)?;
        Some(&mut self.bindings[id].value)
    }

    /// Unbind `key`, dropping the owned key copy and handing back the value.
    /// Capacity is kept.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let bucket = bucket_index(key, self.buckets.len());
        let mut prev: Option<BindingId> = None;
        let mut cursor = self.buckets[bucket];
        while let Some(id) = cursor {
            let binding = &self.bindings[id];
            if *binding.key == *key {
                let next = binding.next;
                match prev {
                    None => self.buckets[bucket] = next,
                    Some(p) => self.bindings[p].next = next,
                }
                return self.bindings.remove(id).map(|b| b.value);
            }
            prev = Some(id);
            cursor = binding.next;
        }
        None
    }

    /// Move every binding into the next tier's bucket array. Abandoned, with
    /// the table untouched, at the largest tier or when the new array cannot
    /// be allocated.
    fn grow<A>(&mut self, alloc: A)
    where
        A: FnOnce(usize) -> Result<Vec<Option<BindingId>>, AllocError>,
    {
        let Some(next) = self.tier.next() else {
            trace!(
                buckets = self.buckets.len(),
                bindings = self.bindings.len(),
                "largest tier reached, not growing"
            );
            return;
        };
        let count = next.bucket_count();
        let fresh = match alloc(count) {
            Ok(fresh) => fresh,
            Err(err) => {
                warn!(error = %err, buckets = self.buckets.len(), "growth abandoned");
                return;
            }
        };

        let old = core::mem::replace(&mut self.buckets, fresh);
        for mut cursor in old {
            while let Some(id) = cursor {
                let binding = &mut self.bindings[id];
                cursor = binding.next;
                let index = bucket_index(&binding.key, count);
                binding.next = self.buckets[index];
                self.buckets[index] = Some(id);
            }
        }

        debug!(
            from = self.tier.bucket_count(),
            to = count,
            bindings = self.bindings.len(),
            "grew symbol table"
        );
        self.tier = next;
    }

    /// Apply `apply` to every binding in bucket-then-chain order, passing
    /// `extra` through. Values may be mutated in place; the key set may not.
    pub fn map<E, F>(&mut self, mut apply: F, extra: &E)
    where
        E: ?Sized,
        F: FnMut(&str, &mut V, &E),
    {
        for bucket in 0..self.buckets.len() {
            let mut cursor = self.buckets[bucket];
            while let Some(id) = cursor {
                let binding = &mut self.bindings[id];
                apply(&*binding.key, &mut binding.value, extra);
                cursor = binding.next;
            }
        }
    }

    /// Borrowing iterator over `(key, value)` in bucket-then-chain order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            bindings: &self.bindings,
            cursor: None,
            remaining: self.bindings.len(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

impl<V> Default for SymTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for SymTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over `(&str, &V)` pairs of a `SymTable`.
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Option<BindingId>>,
    bindings: &'a SlotMap<BindingId, Binding<V>>,
    cursor: Option<BindingId>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.cursor {
                let bindings = self.bindings;
                let binding = &bindings[id];
                self.cursor = binding.next;
                self.remaining -= 1;
                return Some((&*binding.key, &binding.value));
            }
            self.cursor = *self.buckets.next()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            bindings: self.bindings,
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

impl<'a, V> IntoIterator for &'a SymTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Consuming iterator: destroys the table and hands back every owned key
/// and value in bucket-then-chain order.
pub struct IntoIter<V> {
    buckets: std::vec::IntoIter<Option<BindingId>>,
    bindings: SlotMap<BindingId, Binding<V>>,
    cursor: Option<BindingId>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.cursor {
                let binding = self.bindings.remove(id)?;
                self.cursor = binding.next;
                return Some((binding.key.into_string(), binding.value));
            }
            self.cursor = self.buckets.next()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.bindings.len(), Some(self.bindings.len()))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> IntoIterator for SymTable<V> {
    type Item = (String, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            buckets: self.buckets.into_iter(),
            bindings: self.bindings,
            cursor: None,
        }
    }
}

#[cfg(test)]
impl<V> SymTable<V> {
    /// Walk every chain and assert the structural invariants: each reachable
    /// binding sits in the bucket its key hashes to, keys are unique, and the
    /// reachable count equals `len`.
    pub(crate) fn assert_consistent(&self) {
        use std::collections::HashSet;

        assert_eq!(self.buckets.len(), self.tier.bucket_count());
        let mut seen: HashSet<&str> = HashSet::new();
        for (index, head) in self.buckets.iter().enumerate() {
            let mut cursor = *head;
            while let Some(id) = cursor {
                let binding = self.bindings.get(id).expect("chain link to live binding");
                assert_eq!(
                    bucket_index(&binding.key, self.buckets.len()),
                    index,
                    "key {:?} misplaced",
                    binding.key
                );
                assert!(seen.insert(&binding.key), "duplicate key {:?}", binding.key);
                cursor = binding.next;
            }
        }
        assert_eq!(seen.len(), self.len(), "reachable bindings != len");
    }

    pub(crate) fn chain_len(&self, bucket: usize) -> usize {
        let mut n = 0;
        let mut cursor = self.buckets[bucket];
        while let Some(id) = cursor {
            n += 1;
            cursor = self.bindings[id].next;
        }
        n
    }
}
