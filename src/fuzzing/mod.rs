//! Module for testing using fuzzing (quickcheck)
#![allow(clippy::type_complexity)]

use std::fmt::Debug;

use crate::*;
use ipnet::{Ipv4Net, Ipv6Net};
use quickcheck::Arbitrary;

mod basic;
mod traversals;

#[derive(Debug, PartialEq, Clone, Copy)]
enum Operation<P, T> {
    Add(P, T),
    Remove(P),
}

#[cfg(miri)]
const DEFAULT_NUM_TESTS: usize = 10;
#[cfg(not(miri))]
const DEFAULT_NUM_TESTS: usize = 10000;
const DEFAULT_GEN_SIZE: usize = 100;

fn proptest_runner<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F) {
    let _ = env_logger::builder().is_test(true).try_init();

    let num_tests: usize = std::env::var("QUICKCHECK_TESTS")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_NUM_TESTS);

    let gen_size: usize = std::env::var("QUICKCHECK_GENERATOR_SIZE")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_GEN_SIZE);

    let mut gen = quickcheck::Gen::new(gen_size);

    // sample all inputs
    for _ in 0..num_tests {
        let input = A::arbitrary(&mut gen);
        let input_c = input.clone();
        let success = f(input_c);
        if !success {
            shrink_failure(f, input)
        }
    }
}

fn shrink_failure<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F, input: A) -> ! {
    for i in input.shrink() {
        let i_c = i.clone();
        let success = f(i_c);
        if !success {
            shrink_failure(f, i)
        }
    }
    // if we reach this point, then all shrunken inputs work. Therefore, `inputs` is the minimal
    // input
    panic!(
        "[QUICKCHECK] Test case failed!\n  Minimal input:\n    {:?}",
        input
    );
}

#[allow(missing_docs)]
#[macro_export]
macro_rules! qc {
    ($name:ident, $f:ident) => {
        #[test]
        fn $name() {
            proptest_runner($f)
        }
    };
}

/// Build a tree from a list of networks and AS numbers. Later entries overwrite the AS number of
/// earlier ones.
fn tree_from(list: &[(Network, u32)]) -> RadixTree {
    let mut tree = RadixTree::new();
    for (p, asn) in list {
        tree.add(*p).set_asn(*asn);
    }
    tree
}

/// Check that no glue node (except the root) has less than two children, and that every record
/// points back to the node holding it.
fn is_compact<P: Prefix, T>(trie: &PatriciaTrie<P, T>) -> bool {
    let mut stack = vec![0];
    let mut records = 0;
    while let Some(idx) = stack.pop() {
        let node = &trie.table[idx];
        match &node.record {
            Some(record) => {
                records += 1;
                if record.node().map(|n| n.index) != Some(idx) {
                    return false;
                }
            }
            None if idx != 0 => {
                if node.left.is_none() || node.right.is_none() {
                    return false;
                }
            }
            None => {}
        }
        stack.extend(node.right);
        stack.extend(node.left);
    }
    records == trie.len()
}

impl<P: Arbitrary, T: Arbitrary> Arbitrary for Operation<P, T> {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let p = P::arbitrary(g);
        if g.choose(&[
            true, true, true, true, true, true, true, false, false, false,
        ])
        .copied()
        .unwrap_or_default()
        {
            let t = T::arbitrary(g);
            Self::Add(p, t)
        } else {
            Self::Remove(p)
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Operation::Add(p, t) => {
                let t = t.clone();
                Box::new(
                    p.clone()
                        .shrink()
                        .map(move |p| Operation::Add(p, t.clone())),
                )
            }
            Operation::Remove(p) => Box::new(p.clone().shrink().map(|p| Operation::Remove(p))),
        }
    }
}

/// Networks are drawn from both families, with short prefix lengths such that random networks
/// often overlap.
impl Arbitrary for Network {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        #[rustfmt::skip]
        let len: u8 = *g
            .choose(&[
                0,
                1, 1,
                2, 2, 2,
                3, 3, 3, 3,
                4, 4, 4, 4, 4,
                5, 5, 5, 5, 5, 5,
                6, 6, 6, 6, 6, 6, 6,
                7, 7, 7, 7, 7, 7, 7, 7,
                8, 8, 8, 8, 8, 8, 8, 8, 8,
                9, 9, 9, 9, 9, 9, 9, 9, 9, 9,
            ])
            .unwrap();
        let bits = (u32::arbitrary(g) as u128) << 96;
        if bool::arbitrary(g) {
            Ipv4Net::from_bits(bits, len).to_network()
        } else {
            Ipv6Net::from_bits(bits, len).to_network()
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self.as_ipnet().supernet() {
            Some(supernet) => quickcheck::single_shrinker(Network::from(supernet)),
            None => quickcheck::empty_shrinker(),
        }
    }
}
