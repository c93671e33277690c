//! Formatting implementation for the tries. Glue nodes print their prefix only, nodes with a record
//! print the AS number next to the prefix.

use std::fmt::{Debug, Formatter, Result};

use crate::trie::PatriciaTrie;
use crate::tree::RadixTree;

impl<P: Debug, T> Debug for PatriciaTrie<P, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        DebugTrie(self, 0).fmt(f)
    }
}

struct DebugTrie<'a, P, T>(&'a PatriciaTrie<P, T>, usize);

impl<P: Debug, T> Debug for DebugTrie<'_, P, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let trie = self.0;
        let idx = self.1;
        let node = &trie.table[idx];
        match (node.record.as_ref().map(|r| r.asn()), node.left, node.right) {
            (None, None, None) => node.prefix.fmt(f),
            (None, None, Some(child)) | (None, Some(child), None) => f
                .debug_map()
                .entry(&node.prefix, &Self(trie, child))
                .finish(),
            (None, Some(left), Some(right)) => f
                .debug_map()
                .entry(&node.prefix, &(Self(trie, left), Self(trie, right)))
                .finish(),
            (Some(asn), None, None) => f.debug_map().entry(&node.prefix, &asn).finish(),
            (Some(asn), None, Some(child)) | (Some(asn), Some(child), None) => f
                .debug_map()
                .entry(&node.prefix, &(asn, Self(trie, child)))
                .finish(),
            (Some(asn), Some(left), Some(right)) => f
                .debug_map()
                .entry(&node.prefix, &(asn, Self(trie, left), Self(trie, right)))
                .finish(),
        }
    }
}

impl<T> Debug for RadixTree<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("RadixTree")
            .field("v4", self.v4())
            .field("v6", self.v6())
            .field("generation", &self.generation())
            .finish()
    }
}
