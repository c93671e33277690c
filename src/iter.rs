//! Traversal of all records of a [`RadixTree`].

use crate::error::{Error, Result};
use crate::network::Family;
use crate::record::Record;
use crate::tree::RadixTree;
use crate::trie::PatriciaTrie;
use crate::Prefix;

/// A pre-order walk over all records of a tree, IPv4 first, then IPv6. Glue nodes are skipped.
///
/// A cursor does not borrow the tree. Instead, the tree is passed to every call of
/// [`Cursor::next`], which allows the tree to be modified between two steps. The cursor remembers
/// the [`generation`](RadixTree::generation) of the tree it was created from; as soon as it
/// observes a different one, it fails with [`Error::ConcurrentModification`] and keeps failing on
/// every later call. A cursor must only be used with the tree that created it.
///
/// ```
/// # use asn_radix::*;
/// # fn main() -> Result<()> {
/// let mut tree: RadixTree = RadixTree::new();
/// tree.add("10.0.0.0/8".parse()?);
/// tree.add("2001:db8::/32".parse()?);
///
/// let mut cursor = tree.cursor();
/// assert_eq!(cursor.next(&tree)?.map(|r| r.prefix()), Some("10.0.0.0/8".to_string()));
/// tree.add("192.168.0.0/16".parse()?);
/// assert_eq!(cursor.next(&tree).unwrap_err(), Error::ConcurrentModification);
/// assert_eq!(cursor.next(&tree).unwrap_err(), Error::ConcurrentModification);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Cursor {
    stack: Vec<usize>,
    family: Family,
    generation: u64,
    invalidated: bool,
}

impl Cursor {
    pub(crate) fn new(generation: u64) -> Self {
        Self {
            stack: vec![0],
            family: Family::V4,
            generation,
            invalidated: false,
        }
    }

    /// Get the next record, or `None` once all records were visited.
    #[allow(clippy::should_implement_trait)]
    pub fn next<T>(&mut self, tree: &RadixTree<T>) -> Result<Option<Record<T>>> {
        if self.invalidated || self.generation != tree.generation() {
            self.invalidated = true;
            self.stack.clear();
            return Err(Error::ConcurrentModification);
        }
        loop {
            let next = match self.family {
                Family::V4 => step(tree.v4(), &mut self.stack),
                Family::V6 => step(tree.v6(), &mut self.stack),
            };
            match (next, self.family) {
                (Some(record), _) => return Ok(Some(record.clone())),
                (None, Family::V4) => {
                    self.family = Family::V6;
                    self.stack.push(0);
                }
                (None, Family::V6) => return Ok(None),
            }
        }
    }

    /// Whether the cursor observed a modification of the tree.
    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }
}

/// Pop nodes from the stack until one carries a record, pushing the right child before the left
/// one such that the left subtree is visited first.
fn step<'a, P: Prefix, T>(
    trie: &'a PatriciaTrie<P, T>,
    stack: &mut Vec<usize>,
) -> Option<&'a Record<T>> {
    while let Some(idx) = stack.pop() {
        let node = &trie.table[idx];
        if let Some(right) = node.right {
            stack.push(right);
        }
        if let Some(left) = node.left {
            stack.push(left);
        }
        if let Some(record) = &node.record {
            return Some(record);
        }
    }
    None
}

/// An iterator over all records of a [`RadixTree`], IPv4 first, then IPv6. The tree is borrowed
/// for the lifetime of the iterator, so it cannot be modified during the iteration.
pub struct Iter<'a, T> {
    tree: &'a RadixTree<T>,
    cursor: Cursor,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(tree: &'a RadixTree<T>) -> Self {
        Self {
            tree,
            cursor: tree.cursor(),
        }
    }
}

impl<T> Iterator for Iter<'_, T> {
    type Item = Record<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next(self.tree).ok().flatten()
    }
}
