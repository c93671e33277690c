use std::collections::HashSet;

use super::*;
use itertools::Itertools;

qc!(all_prefixes, _all_prefixes);
fn _all_prefixes(list: Vec<Operation<Network, u32>>) -> bool {
    let mut tree: RadixTree = RadixTree::new();
    let mut set = HashSet::new();
    for op in list {
        match op {
            Operation::Add(p, _) => {
                tree.add(p);
                set.insert(p);
            }
            Operation::Remove(p) => {
                let _ = tree.delete(&p);
                set.remove(&p);
            }
        }
    }
    let want: Vec<String> = set.into_iter().sorted().map(|p| p.to_string()).collect();
    tree.all_prefixes() == want && tree.all_nodes().len() == tree.len()
}

qc!(v4_before_v6, _v4_before_v6);
fn _v4_before_v6(list: Vec<Network>) -> bool {
    let mut tree: RadixTree = RadixTree::new();
    for p in list {
        tree.add(p);
    }
    tree.iter()
        .map(|r| r.family())
        .tuple_windows()
        .all(|(a, b)| a <= b)
}

qc!(cursor_matches_iter, _cursor_matches_iter);
fn _cursor_matches_iter(list: Vec<(Network, u32)>) -> bool {
    let tree = tree_from(&list);
    let mut cursor = tree.cursor();
    let mut from_cursor = Vec::new();
    loop {
        match cursor.next(&tree) {
            Ok(Some(record)) => from_cursor.push(record),
            Ok(None) => break,
            Err(_) => return false,
        }
    }
    from_cursor.len() == tree.len()
        && from_cursor
            .iter()
            .zip(tree.iter())
            .all(|(a, b)| Record::ptr_eq(a, &b))
}

qc!(cursor_detects_mutation, _cursor_detects_mutation);
fn _cursor_detects_mutation(
    (list, steps, op): (Vec<Network>, u8, Operation<Network, ()>),
) -> bool {
    let mut tree: RadixTree = RadixTree::new();
    for p in list {
        tree.add(p);
    }
    let mut cursor = tree.cursor();
    for _ in 0..steps.min(4) {
        if cursor.next(&tree).is_err() {
            return false;
        }
    }
    let modified = match op {
        Operation::Add(p, _) => {
            let generation = tree.generation();
            tree.add(p);
            tree.generation() != generation
        }
        Operation::Remove(p) => tree.delete(&p).is_ok(),
    };
    match cursor.next(&tree) {
        Err(Error::ConcurrentModification) => modified && cursor.next(&tree).is_err(),
        Err(_) => false,
        Ok(_) => !modified,
    }
}
