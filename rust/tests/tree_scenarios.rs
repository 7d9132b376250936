use std::collections::BTreeSet;

use bplus_index::{BPlusTree, BPlusTreeError, NULL_NODE};
use paste::paste;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn checked_tree(degree: usize) -> BPlusTree {
    let tree = BPlusTree::new(degree).unwrap();
    tree.validate().unwrap();
    tree
}

fn insert_checked(tree: &mut BPlusTree, key: i64) -> bool {
    let inserted = tree.insert(key);
    tree.validate()
        .unwrap_or_else(|e| panic!("after insert({}): {}\n{}", key, e, tree.structure_dump()));
    inserted
}

fn delete_checked(tree: &mut BPlusTree, key: i64) -> bool {
    let deleted = tree.delete(&key);
    tree.validate()
        .unwrap_or_else(|e| panic!("after delete({}): {}\n{}", key, e, tree.structure_dump()));
    deleted
}

/// Walk the leaf chain backwards from the rightmost leaf.
fn keys_backwards(tree: &BPlusTree) -> Vec<i64> {
    let mut keys = Vec::new();
    let mut current = tree.last_leaf_id().unwrap_or(NULL_NODE);
    while current != NULL_NODE {
        let leaf = tree.get_node(current).unwrap();
        keys.extend(leaf.keys().iter().rev().copied());
        current = leaf.prev_leaf();
    }
    keys
}

#[test]
fn test_degree_four_walkthrough() {
    let mut tree = checked_tree(4);
    for key in 1..=5 {
        assert!(insert_checked(&mut tree, key));
    }
    assert!(tree.leaf_count() > 1, "a leaf reaching 4 keys must split");
    for key in 1..=5 {
        assert!(tree.find(&key));
    }
    assert!(!tree.find(&0));
    assert!(!tree.find(&6));

    assert!(delete_checked(&mut tree, 3));
    assert!(!tree.find(&3));
    for key in [1, 2, 4, 5] {
        assert!(tree.find(&key));
    }

    for key in [1, 2, 4, 5] {
        assert!(delete_checked(&mut tree, key));
    }
    assert!(tree.is_empty());
    assert!(tree.root_id().is_none());
    for key in -2..=7 {
        assert!(!tree.find(&key));
    }

    assert!(insert_checked(&mut tree, 10));
    assert!(tree.find(&10));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![10]);
}

#[test]
fn test_duplicate_insert_leaves_tree_unchanged() {
    let mut tree = checked_tree(3);
    tree.extend([4, 8, 15, 16, 23, 42]);
    let before: Vec<i64> = tree.keys().copied().collect();
    let shape = tree.structure_dump();

    assert!(!insert_checked(&mut tree, 15));
    assert_eq!(tree.keys().copied().collect::<Vec<_>>(), before);
    assert_eq!(tree.structure_dump(), shape);
    assert_eq!(tree.try_insert(42), Err(BPlusTreeError::DuplicateKey));
}

#[test]
fn test_absent_delete_leaves_tree_unchanged() {
    let mut empty = checked_tree(4);
    assert!(!delete_checked(&mut empty, 1));
    assert!(empty.is_empty());

    let mut tree = checked_tree(4);
    tree.extend((0..50).map(|k| k * 2));
    let shape = tree.structure_dump();
    assert!(!delete_checked(&mut tree, 7));
    assert!(!delete_checked(&mut tree, 1000));
    assert_eq!(tree.structure_dump(), shape);
    assert_eq!(tree.try_delete(&-1), Err(BPlusTreeError::KeyNotFound));
}

#[test]
fn test_delete_then_reinsert_matches_single_insert() {
    let mut churned = checked_tree(4);
    assert!(insert_checked(&mut churned, 99));
    assert!(delete_checked(&mut churned, 99));
    assert!(insert_checked(&mut churned, 99));

    let mut fresh = checked_tree(4);
    fresh.insert(99);

    for key in 90..110 {
        assert_eq!(churned.find(&key), fresh.find(&key), "key {}", key);
    }
    assert_eq!(churned.structure_dump(), fresh.structure_dump());
}

#[test]
fn test_merges_reuse_arena_slots() {
    let mut tree = checked_tree(4);
    tree.extend(0..200);
    let peak = tree.arena_stats().allocated_count;
    for key in 0..150 {
        delete_checked(&mut tree, key);
    }
    let stats = tree.arena_stats();
    assert!(stats.allocated_count < peak);
    assert!(stats.free_count > 0);

    let free_before = stats.free_count;
    tree.extend(1000..1100);
    tree.validate().unwrap();
    assert!(tree.arena_stats().free_count < free_before);
}

#[test]
fn test_generic_keys() {
    let mut tree: BPlusTree<String> = BPlusTree::new(3).unwrap();
    for word in ["pear", "apple", "fig", "kiwi", "banana", "cherry"] {
        assert!(tree.insert(word.to_string()));
    }
    tree.validate().unwrap();
    assert!(tree.find(&"fig".to_string()));
    assert!(tree.delete(&"apple".to_string()));
    assert_eq!(
        tree.keys().cloned().collect::<Vec<_>>(),
        vec!["banana", "cherry", "fig", "kiwi", "pear"]
    );
}

fn shuffled_round_trip(degree: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut keys: Vec<i64> = (0..300).map(|k| k * 3 - 200).collect();
    keys.shuffle(&mut rng);

    let mut tree = checked_tree(degree);
    for &key in &keys {
        assert!(insert_checked(&mut tree, key));
    }
    for &key in &keys {
        assert!(tree.find(&key));
        assert!(!tree.find(&(key + 1)));
    }

    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(tree.keys().copied().collect::<Vec<_>>(), sorted);
    let mut reversed = sorted.clone();
    reversed.reverse();
    assert_eq!(keys_backwards(&tree), reversed);

    keys.shuffle(&mut rng);
    for (i, &key) in keys.iter().enumerate() {
        assert!(delete_checked(&mut tree, key));
        assert!(!tree.find(&key));
        assert_eq!(tree.len(), keys.len() - i - 1);
    }
    assert!(tree.is_empty());
    assert_eq!(tree.arena_stats().allocated_count, 0);
}

/// Delete the leftmost and rightmost keys alternately so leaves merge into
/// both their left and right siblings, then check the chain both ways.
fn chain_survives_merges(degree: usize) {
    let mut tree = checked_tree(degree);
    tree.extend(0..120);
    let mut model: BTreeSet<i64> = (0..120).collect();

    let mut take_low = true;
    while let (Some(&low), Some(&high)) = (model.first(), model.last()) {
        let victim = if take_low { low } else { high };
        take_low = !take_low;
        assert!(delete_checked(&mut tree, victim));
        model.remove(&victim);

        let forward: Vec<i64> = tree.keys().copied().collect();
        let expected: Vec<i64> = model.iter().copied().collect();
        assert_eq!(forward, expected);
        let mut backward = keys_backwards(&tree);
        backward.reverse();
        assert_eq!(backward, expected);
    }
    assert!(tree.is_empty());
}

/// Remove every other key, then the rest, to force interior merges.
fn interleaved_deletes(degree: usize) {
    let mut tree = checked_tree(degree);
    tree.extend(0..256);
    for key in (0..256).step_by(2) {
        assert!(delete_checked(&mut tree, key));
    }
    assert_eq!(tree.len(), 128);
    for key in (1..256i64).rev().step_by(2) {
        assert!(delete_checked(&mut tree, key));
    }
    assert!(tree.is_empty());
}

fn random_churn(degree: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tree = checked_tree(degree);
    let mut model = BTreeSet::new();
    for _ in 0..2_000 {
        let key = rng.gen_range(0..150);
        if rng.gen_bool(0.55) {
            assert_eq!(insert_checked(&mut tree, key), model.insert(key));
        } else {
            assert_eq!(delete_checked(&mut tree, key), model.remove(&key));
        }
        assert_eq!(tree.len(), model.len());
    }
    assert_eq!(
        tree.keys().copied().collect::<Vec<_>>(),
        model.into_iter().collect::<Vec<_>>()
    );
}

macro_rules! degree_suite {
    ($($degree:literal),* $(,)?) => {
        $(
            paste! {
                mod [<degree_ $degree>] {
                    #[test]
                    fn shuffled_round_trip() {
                        super::shuffled_round_trip($degree, 7);
                        super::shuffled_round_trip($degree, 1234);
                    }

                    #[test]
                    fn chain_survives_merges() {
                        super::chain_survives_merges($degree);
                    }

                    #[test]
                    fn interleaved_deletes() {
                        super::interleaved_deletes($degree);
                    }

                    #[test]
                    fn random_churn() {
                        super::random_churn($degree, 42);
                    }
                }
            }
        )*
    };
}

degree_suite!(2, 3, 4, 5, 6, 8, 16);
