use avl::Tree;
use quickcheck_macros::quickcheck;

use std::collections::{BTreeMap, HashSet};

use crate::{init_logging, Op};

/// Applies a set of operations to a tree and a model map, checking after every operation that
/// the tree is still a valid AVL tree and agrees with the model.
///
/// The model keeps the first value written for a key since that is what the tree does.
fn do_ops<K, V>(ops: &[Op<K, V>], tree: &mut Tree<K, V>, map: &mut BTreeMap<K, V>) -> bool
where
    K: Clone + Ord,
    V: Clone + PartialEq,
{
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                let inserted = tree.insert(k.clone(), v.clone());
                let model_inserted = !map.contains_key(k);
                map.entry(k.clone()).or_insert_with(|| v.clone());
                if inserted != model_inserted {
                    return false;
                }
            }
            Op::Delete(k) => {
                if tree.delete(k) != map.remove(k) {
                    return false;
                }
            }
            Op::Iter => {
                if !tree.iter().eq(map.iter()) {
                    return false;
                }
            }
        }

        if tree.check_invariants().is_err() || tree.len() != map.len() {
            return false;
        }
    }

    true
}

/// The tallest an AVL tree with `len` nodes can be: `1.44 * lg(len + 2)`.
fn max_height(len: usize) -> f64 {
    1.45 * ((len + 2) as f64).log2()
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
    init_logging();
    let mut tree = Tree::new();
    let mut map = BTreeMap::new();

    do_ops(&ops, &mut tree, &mut map)
        && map.keys().all(|key| tree.find(key) == map.get(key))
        && tree.iter().eq(map.iter())
}

#[quickcheck]
fn fuzz_multiple_operations_u16(ops: Vec<Op<u16, ()>>) -> bool {
    let mut tree = Tree::new();
    let mut map = BTreeMap::new();

    do_ops(&ops, &mut tree, &mut map) && tree.keys().eq(map.keys())
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, *x);
    }

    xs.iter().all(|x| tree.contains(x) && tree.find(x) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, *x);
    }
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| !tree.contains(x) && tree.find(x).is_none())
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, *x);
    }
    for delete in &deletes {
        tree.delete(delete);
        if tree.check_invariants().is_err() {
            return false;
        }
    }

    let mut still_present = xs;
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    deletes.iter().all(|x| tree.find(x).is_none())
        && still_present.iter().all(|x| tree.find(x).is_some())
}

#[quickcheck]
fn in_order_keys_are_sorted_and_unique(xs: Vec<i32>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, ());
    }

    let mut expected = xs;
    expected.sort_unstable();
    expected.dedup();

    tree.in_order_keys() == expected
}

#[quickcheck]
fn height_is_bounded(xs: Vec<u32>, deletes: Vec<u32>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, ());
        if tree.height() as f64 > max_height(tree.len()) {
            return false;
        }
    }
    for delete in &deletes {
        tree.delete(delete);
        if tree.height() as f64 > max_height(tree.len()) {
            return false;
        }
    }

    tree.balance_factor().abs() <= 1
}

#[quickcheck]
fn duplicate_insert_is_idempotent(xs: Vec<i8>, dup_index: usize) -> bool {
    if xs.is_empty() {
        return true;
    }
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, 0u8);
    }
    let before = tree.clone();
    let dup = xs[dup_index % xs.len()];

    !tree.insert(dup, 1)
        && tree == before
        && tree.height() == before.height()
        && tree.find(&dup) == Some(&0)
}

#[quickcheck]
fn missing_delete_is_idempotent(xs: Vec<i8>, missing: i8) -> bool {
    let mut tree = Tree::new();
    for x in xs.iter().filter(|&&x| x != missing) {
        tree.insert(*x, *x);
    }
    let before = tree.clone();

    tree.delete(&missing).is_none()
        && tree == before
        && tree.height() == before.height()
        && tree.balance_factor() == before.balance_factor()
}

#[quickcheck]
fn delete_removes_exactly_one_key(xs: Vec<i16>, index: usize) -> bool {
    if xs.is_empty() {
        return true;
    }
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, ());
    }
    let target = xs[index % xs.len()];
    let mut expected = tree.in_order_keys();
    expected.retain(|&k| k != target);

    tree.delete(&target).is_some()
        && tree.in_order_keys() == expected
        && tree.check_invariants().is_ok()
}
