use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use bonsai_tree::AvlMap;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 4_096;

/// Keys are drawn from a range narrower than TEST_SIZE so that inserts,
/// lookups, and removals collide often.
fn key_strategy() -> impl Strategy<Value = i64> {
    -1_000_i64..1_000_i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    RemoveEntry(i64),
    Get(i64),
    GetMut(i64, i64),
    ContainsKey(i64),
    GetKeyValue(i64),
    GetOrInsert(i64, i64),
    FirstKeyValue,
    LastKeyValue,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        1 => key_strategy().prop_map(MapOp::RemoveEntry),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::GetMut(k, v)),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => key_strategy().prop_map(MapOp::GetKeyValue),
        1 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::GetOrInsert(k, v)),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
    ]
}

// ─── Randomized model equivalence ────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Replays a random sequence of operations on both AvlMap and BTreeMap
    /// and asserts identical results at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut avl: AvlMap<i64, i64> = AvlMap::new();
        let mut model: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match *op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(avl.insert(k, v), model.insert(k, v), "insert({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(avl.remove(&k), model.remove(&k), "remove({})", k);
                }
                MapOp::RemoveEntry(k) => {
                    prop_assert_eq!(avl.remove_entry(&k), model.remove_entry(&k), "remove_entry({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(avl.get(&k), model.get(&k), "get({})", k);
                }
                MapOp::GetMut(k, v) => {
                    let avl_slot = avl.get_mut(&k);
                    let model_slot = model.get_mut(&k);
                    prop_assert_eq!(avl_slot.is_some(), model_slot.is_some(), "get_mut({})", k);
                    if let (Some(a), Some(b)) = (avl_slot, model_slot) {
                        *a = v;
                        *b = v;
                    }
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(avl.contains_key(&k), model.contains_key(&k), "contains_key({})", k);
                }
                MapOp::GetKeyValue(k) => {
                    prop_assert_eq!(avl.get_key_value(&k), model.get_key_value(&k), "get_key_value({})", k);
                }
                MapOp::GetOrInsert(k, v) => {
                    let avl_value = *avl.get_or_insert_with(k, || v);
                    let model_value = *model.entry(k).or_insert(v);
                    prop_assert_eq!(avl_value, model_value, "get_or_insert_with({}, {})", k, v);
                }
                MapOp::FirstKeyValue => {
                    prop_assert_eq!(avl.first_key_value(), model.first_key_value());
                }
                MapOp::LastKeyValue => {
                    prop_assert_eq!(avl.last_key_value(), model.last_key_value());
                }
            }

            prop_assert_eq!(avl.len(), model.len());
            prop_assert_eq!(avl.is_empty(), model.is_empty());
        }

        let mut avl_entries = Vec::new();
        avl.for_each(|&k, &v| avl_entries.push((k, v)));
        let model_entries: Vec<(i64, i64)> = model.into_iter().collect();
        prop_assert_eq!(avl_entries, model_entries);
    }

    /// Inserting any permutation of a key set yields the same observable
    /// contents.
    #[test]
    fn contents_are_order_independent(permutation in Just((0..128i64).collect::<Vec<_>>()).prop_shuffle()) {
        let mut map = AvlMap::new();
        for &key in &permutation {
            map.insert(key, key * 2);
        }

        let mut entries = Vec::new();
        map.for_each(|&k, &v| entries.push((k, v)));
        let expected: Vec<(i64, i64)> = (0..128).map(|k| (k, k * 2)).collect();
        prop_assert_eq!(entries, expected);
    }
}

// ─── Scenario suites ─────────────────────────────────────────────────────────

const NUM_INSERTIONS: usize = 2_048;

/// Deterministic Fisher-Yates driven by an LCG, so the stress scenarios
/// need no rng dependency.
fn shuffled(n: usize, mut state: u64) -> Vec<i64> {
    let mut keys: Vec<i64> = (0..n as i64).collect();
    for index in (1..keys.len()).rev() {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        keys.swap(index, (state >> 33) as usize % (index + 1));
    }
    keys
}

#[test]
fn sorted_insert_then_lookup_everything() {
    let mut map = AvlMap::new();

    for key in 0..NUM_INSERTIONS as i64 {
        assert_eq!(map.insert(key, key), None);
        assert_eq!(map.len(), (key + 1) as usize);
    }

    for key in 0..NUM_INSERTIONS as i64 {
        assert_eq!(map.get(&key), Some(&key));
    }
}

#[test]
fn random_insert_random_remove() {
    let mut map = AvlMap::new();
    let mut resident = BTreeMap::new();

    for key in shuffled(NUM_INSERTIONS, 0x9e37_79b9_7f4a_7c15) {
        assert_eq!(map.insert(key, !key), None);
        resident.insert(key, !key);
    }

    let mut expected_len = NUM_INSERTIONS;
    for key in shuffled(NUM_INSERTIONS, 0x0123_4567_89ab_cdef) {
        assert_eq!(map.remove(&key), Some(!key));
        resident.remove(&key);
        expected_len -= 1;
        assert_eq!(map.len(), expected_len);

        // Every not-yet-removed key stays retrievable; the removed key is
        // gone.
        assert_eq!(map.get(&key), None);
        for (kept, value) in &resident {
            assert_eq!(map.get(kept), Some(value));
        }
    }

    assert!(map.is_empty());
}

// ─── Deleter accounting ──────────────────────────────────────────────────────

/// A value whose drop is observable, for auditing exactly-once teardown.
#[derive(Clone)]
struct Counted {
    drops: Rc<Cell<usize>>,
}

impl Counted {
    fn new(drops: &Rc<Cell<usize>>) -> Self {
        Self { drops: Rc::clone(drops) }
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
fn clear_drops_each_entry_exactly_once() {
    let drops = Rc::new(Cell::new(0));
    let mut map = AvlMap::new();

    for key in 0..100 {
        map.insert(key, Counted::new(&drops));
    }
    assert_eq!(drops.get(), 0);

    map.clear();
    assert_eq!(map.len(), 0);
    assert_eq!(drops.get(), 100);

    // Clearing an already-empty map does nothing.
    map.clear();
    assert_eq!(drops.get(), 100);
}

#[test]
fn drop_count_is_inserts_minus_removals() {
    let drops = Rc::new(Cell::new(0));
    let mut map = AvlMap::new();

    for key in 0..64 {
        map.insert(key, Counted::new(&drops));
    }

    // Values handed back by remove are owned by the caller; keep them
    // alive to show the map itself dropped nothing.
    let mut escaped = Vec::new();
    for key in 0..16 {
        escaped.push(map.remove(&key).expect("resident"));
    }
    assert_eq!(drops.get(), 0);

    drop(map);
    assert_eq!(drops.get(), 64 - 16);

    drop(escaped);
    assert_eq!(drops.get(), 64);
}

#[test]
fn replacing_a_value_drops_only_the_displaced_one() {
    let drops = Rc::new(Cell::new(0));
    let mut map = AvlMap::new();

    map.insert(1, Counted::new(&drops));
    let previous = map.insert(1, Counted::new(&drops));
    assert_eq!(drops.get(), 0, "the displaced value is returned, not dropped");

    drop(previous);
    assert_eq!(drops.get(), 1);
    assert_eq!(map.len(), 1);
}
