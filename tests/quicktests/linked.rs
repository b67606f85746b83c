use linked_bst::{Tree, TreeError};
use quickcheck_macros::quickcheck;

use std::collections::HashSet;

use crate::Op;

/// Applies a set of operations to a tree and a sorted vec of the items
/// it should hold, returning how many inserts and successful removes
/// happened.
fn do_ops<T>(ops: &[Op<T>], bst: &mut Tree<T>, model: &mut Vec<T>) -> (usize, usize)
where
    T: Ord + Clone + std::fmt::Debug,
{
    let (mut inserts, mut removes) = (0, 0);
    for op in ops {
        match op {
            Op::Insert(x) => {
                bst.insert(x.clone());
                let pos = model.partition_point(|m| m <= x);
                model.insert(pos, x.clone());
                inserts += 1;
            }
            Op::Remove(x) => match model.binary_search(x) {
                Ok(pos) => {
                    model.remove(pos);
                    assert_eq!(bst.remove(x).as_ref(), Ok(x));
                    removes += 1;
                }
                Err(_) => assert_eq!(bst.remove(x), Err(TreeError::NotFound)),
            },
            Op::Rebalance => {
                let len = bst.len();
                bst.rebalance();
                assert_eq!(bst.len(), len);
            }
        }
    }

    (inserts, removes)
}

/// How many levels a minimum-height tree of `n` nodes has, `⌈lg (n + 1)⌉`.
fn levels_needed(n: usize) -> usize {
    (usize::BITS - n.leading_zeros()) as usize
}

#[quickcheck]
fn inorder_is_sorted(xs: Vec<i16>) -> bool {
    let tree: Tree<_> = xs.into_iter().collect();
    let items: Vec<_> = tree.inorder().collect();

    items.windows(2).all(|w| w[0] <= w[1])
}

#[quickcheck]
fn len_tracks_inserts_and_removes(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut model = Vec::new();

    let (inserts, removes) = do_ops(&ops, &mut tree, &mut model);
    tree.len() == inserts - removes
        && tree.len() == model.len()
        && tree.inorder().eq(model.iter())
}

#[quickcheck]
fn rebalance_keeps_items(xs: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    let before: Vec<_> = tree.inorder().copied().collect();

    tree.rebalance();

    tree.len() == xs.len() && tree.inorder().copied().eq(before)
}

#[quickcheck]
fn rebalance_reaches_minimum_height(xs: Vec<u16>) -> bool {
    let mut tree: Tree<_> = xs.into_iter().collect();
    tree.rebalance();

    match tree.height() {
        None => tree.is_empty(),
        Some(height) => height + 1 == levels_needed(tree.len()),
    }
}

#[quickcheck]
fn remove_missing_changes_nothing(xs: Vec<i8>, missing: i8) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().filter(|x| *x != missing).collect();
    let len = tree.len();
    let shape: Vec<_> = tree.preorder().copied().collect();

    tree.remove(&missing) == Err(TreeError::NotFound)
        && tree.len() == len
        && tree.preorder().copied().eq(shape)
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.find(x).is_none() && !tree.contains(x))
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    let mut still_present = xs;
    for delete in &deletes {
        // Each successful remove takes out exactly one copy.
        match still_present.iter().position(|x| x == delete) {
            Some(pos) => {
                still_present.swap_remove(pos);
                assert_eq!(tree.remove(delete), Ok(*delete));
            }
            None => assert!(tree.remove(delete).is_err()),
        }
    }

    still_present.iter().all(|x| tree.contains(x)) && tree.len() == still_present.len()
}

#[quickcheck]
fn probes_follow_search_path(xs: Vec<u8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();

    // After a rebalance no search can take more probes than there are levels.
    let mut balanced = Tree::new();
    balanced.extend(xs.iter().copied());
    balanced.rebalance();
    let levels = balanced.height().map_or(0, |h| h + 1);

    xs.iter().all(|x| {
        let (found, probes) = tree.find(x).unwrap();
        let (_, balanced_probes) = balanced.find(x).unwrap();
        found == x && probes >= 1 && balanced_probes >= 1 && balanced_probes <= levels
    })
}

#[quickcheck]
fn successor_and_predecessor_are_strict(xs: Vec<i8>, item: i8) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();

    let successor = xs.iter().filter(|x| **x > item).min();
    let predecessor = xs.iter().filter(|x| **x < item).max();

    tree.successor(&item) == successor && tree.predecessor(&item) == predecessor
}

#[quickcheck]
fn range_find_matches_filter(xs: Vec<i8>, low: i8, high: i8) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();
    let mut expected: Vec<_> = xs.iter().filter(|x| low <= **x && **x <= high).collect();
    expected.sort();

    tree.range_find(&low, &high) == expected
}

#[test]
fn sorted_input_costs_more_probes_than_rebalanced() {
    let words: Vec<String> = (0..500).map(|i| format!("word{:04}", i)).collect();
    let mut tree: Tree<_> = words.iter().cloned().collect();

    let total = |tree: &Tree<String>| -> usize {
        words
            .iter()
            .step_by(5)
            .map(|w| tree.find(w).map_or(0, |(_, probes)| probes))
            .sum()
    };

    let sorted_probes = total(&tree);
    assert!(!tree.is_balanced());

    tree.rebalance();
    let balanced_probes = total(&tree);

    assert!(tree.is_balanced());
    assert!(balanced_probes * 10 < sorted_probes);
}
