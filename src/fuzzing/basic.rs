use std::collections::HashMap;

use super::*;
use itertools::Itertools;

qc!(new, _new);
fn _new(list: Vec<(Network, u32)>) -> bool {
    let tree = tree_from(&list);
    let hmap: HashMap<Network, u32> = list.into_iter().collect();

    // assert that the iterator of both is the same
    tree.len() == hmap.len()
        && tree
            .iter()
            .map(|r| (r.network(), r.asn()))
            .eq(hmap.into_iter().sorted())
}

qc!(new_mods, _new_mods);
fn _new_mods(list: Vec<Operation<Network, u32>>) -> bool {
    let mut tree: RadixTree = RadixTree::new();
    let mut hmap = HashMap::new();

    for op in list {
        match op {
            Operation::Add(p, t) => {
                tree.add(p).set_asn(t);
                hmap.insert(p, t);
            }
            Operation::Remove(p) => {
                if tree.delete(&p).is_ok() != hmap.remove(&p).is_some() {
                    return false;
                }
            }
        }
        if !(is_compact(tree.v4()) && is_compact(tree.v6())) {
            return false;
        }
    }

    // assert that the iterator of both is the same
    tree.len() == hmap.len()
        && tree
            .iter()
            .map(|r| (r.network(), r.asn()))
            .eq(hmap.into_iter().sorted())
}

qc!(search_exact, _search_exact);
fn _search_exact((list, query): (Vec<(Network, u32)>, Network)) -> bool {
    let tree = tree_from(&list);
    let hmap: HashMap<Network, u32> = list.into_iter().collect();
    tree.search_exact(&query).map(|r| r.asn()) == hmap.get(&query).copied()
}

qc!(search_best, _search_best);
fn _search_best((list, query): (Vec<(Network, u32)>, Network)) -> bool {
    let tree = tree_from(&list);
    let hmap: HashMap<Network, u32> = list.into_iter().collect();
    let want = hmap
        .into_iter()
        .filter(|(p, _)| p.contains(&query))
        .max_by_key(|(p, _)| p.prefix_len());
    tree.search_best(&query).map(|r| (r.network(), r.asn())) == want
}

qc!(identity, _identity);
fn _identity(list: Vec<Network>) -> bool {
    let mut tree: RadixTree = RadixTree::new();
    let records: Vec<Record> = list.iter().map(|p| tree.add(*p)).collect();
    list.iter().zip(records).all(|(p, r)| {
        tree.search_exact(p)
            .map(|found| Record::ptr_eq(&found, &r))
            .unwrap_or(false)
    })
}

qc!(delete_detaches, _delete_detaches);
fn _delete_detaches((list, p): (Vec<(Network, u32)>, Network)) -> bool {
    let mut tree = tree_from(&list);
    let record = tree.add(p);
    record.set_asn(u32::MAX);
    let deleted = match tree.delete(&p) {
        Ok(deleted) => deleted,
        Err(_) => return false,
    };
    Record::ptr_eq(&record, &deleted)
        && !record.is_attached()
        && record.asn() == u32::MAX
        && tree.search_exact(&p).is_none()
        && tree.iter().all(|r| r.is_attached())
}

qc!(delete_reverts_add, _delete_reverts_add);
fn _delete_reverts_add((list, p): (Vec<(Network, u32)>, Network)) -> bool {
    let mut tree = tree_from(&list);
    if tree.search_exact(&p).is_some() {
        return true;
    }
    let before = format!("{:?} {:?}", tree.v4(), tree.v6());
    tree.add(p);
    let _ = tree.delete(&p);
    let after = format!("{:?} {:?}", tree.v4(), tree.v6());
    before == after
}

qc!(families_independent, _families_independent);
fn _families_independent((list, query): (Vec<(Network, u32)>, Network)) -> bool {
    let full = tree_from(&list);
    let same_family: Vec<(Network, u32)> = list
        .into_iter()
        .filter(|(p, _)| p.family() == query.family())
        .collect();
    let partial = tree_from(&same_family);
    let best = |t: &RadixTree| t.search_best(&query).map(|r| r.network());
    let exact = |t: &RadixTree| t.search_exact(&query).map(|r| r.asn());
    best(&full) == best(&partial) && exact(&full) == exact(&partial)
}
