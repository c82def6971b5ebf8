// Property tests for SymTable kept inside the crate so they can check chain
// placement and counts through private structure.

use crate::sym_table::SymTable;
use crate::tiers::Tier;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Replace(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Bump(i32),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Replace(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Get),
            prop_oneof![contains_pool, "[a-z]{0,5}".prop_map(|s| s)].prop_map(OpI::Contains),
            (-5i32..5).prop_map(OpI::Bump),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - put inserts only absent keys and never overwrites.
// - replace overwrites only present keys and never inserts.
// - remove returns the bound value exactly once.
// - map visits each live binding once; mutations are observed by get.
// - chains stay consistent (placement, uniqueness, count) after every op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: SymTable<i32> = SymTable::new();
        let mut model: HashMap<String, i32> = HashMap::new();

        for op in ops {
            match op {
                OpI::Put(i, v) => {
                    let k = &pool[i];
                    let already = model.contains_key(k);
                    let inserted = sut.put(k, v).expect("small keys allocate");
                    prop_assert_eq!(inserted, !already);
                    model.entry(k.clone()).or_insert(v);
                }
                OpI::Replace(i, v) => {
                    let k = &pool[i];
                    let expected = model.get_mut(k).map(|slot| std::mem::replace(slot, v));
                    prop_assert_eq!(sut.replace(k, v), expected);
                }
                OpI::Remove(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.remove(k), model.remove(k));
                    prop_assert!(!sut.contains(k));
                }
                OpI::Get(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.get(k), model.get(k));
                }
                OpI::Contains(k) => {
                    prop_assert_eq!(sut.contains(&k), model.contains_key(&k));
                }
                OpI::Bump(d) => {
                    let mut visits: BTreeMap<String, usize> = BTreeMap::new();
                    sut.map(|k, v, d: &i32| {
                        *visits.entry(k.to_owned()).or_default() += 1;
                        *v = v.wrapping_add(*d);
                    }, &d);
                    prop_assert!(visits.values().all(|&n| n == 1));
                    prop_assert_eq!(visits.len(), model.len());
                    for v in model.values_mut() {
                        *v = v.wrapping_add(d);
                    }
                }
            }
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            sut.assert_consistent();
        }
    }
}

// Property: bulk inserts and removals that cross tier thresholds keep every
// key reachable, and the tier never moves backwards.
proptest! {
    #![proptest_config(ProptestConfig { cases: 16, .. ProptestConfig::default() })]
    #[test]
    fn prop_growth_preserves_bindings(n in 400usize..2200, remove_every in 2usize..7) {
        let mut sut: SymTable<usize> = SymTable::new();
        let mut last_tier = sut.tier();
        let mut live = 0usize;

        for i in 0..n {
            let inserted = sut.put(&format!("key-{i}"), i).expect("allocate");
            prop_assert!(inserted);
            live += 1;
            if i % remove_every == 0 {
                prop_assert_eq!(sut.remove(&format!("key-{i}")), Some(i));
                live -= 1;
            }
            prop_assert!(sut.tier() >= last_tier);
            last_tier = sut.tier();
        }

        prop_assert_eq!(sut.len(), live);
        prop_assert!(sut.len() < sut.capacity() || sut.tier() == Tier::LARGEST);
        sut.assert_consistent();
        for i in 0..n {
            let expected = (i % remove_every != 0).then_some(i);
            prop_assert_eq!(sut.get(&format!("key-{i}")).copied(), expected);
        }
    }
}
