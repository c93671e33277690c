//! Implementation of the single-family patricia trie.

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::record::{NodeRef, Record};
use crate::{to_right, Prefix};


/// Patricia trie of a single address family, implemented as an arena of nodes.
///
/// Node `0` is the root, whose key is the zero-length prefix. Nodes without a record are glue
/// nodes: they only exist to branch between two sub-tries.
pub struct PatriciaTrie<P, T> {
    pub(crate) table: Vec<Node<P, T>>,
    free: Vec<usize>,
    len: usize,
}

impl<P, T> Default for PatriciaTrie<P, T>
where
    P: Prefix,
{
    fn default() -> Self {
        Self {
            table: vec![Node::new(P::zero())],
            free: Vec::new(),
            len: 0,
        }
    }
}

impl<P, T> PatriciaTrie<P, T>
where
    P: Prefix,
{
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records stored in the trie.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the trie holds no record.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Find the node of `prefix`, creating it if necessary, and return its record. The second
    /// return value is `true` if a new record was created, which means that the trie was modified.
    /// Inserting a prefix that is already present returns its existing record.
    ///
    /// ```
    /// # use asn_radix::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PatriciaTrie<Ipv4Net, ()> = PatriciaTrie::new();
    /// let (a, created) = trie.insert_or_get("10.0.0.0/8".parse()?);
    /// assert!(created);
    /// let (b, created) = trie.insert_or_get("10.0.0.0/8".parse()?);
    /// assert!(!created);
    /// assert!(Record::ptr_eq(&a, &b));
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert_or_get(&mut self, prefix: P) -> (Record<T>, bool) {
        let prefix = prefix.canonical();
        let mut idx = 0;
        loop {
            match self.get_direction_for_insert(idx, &prefix) {
                DirectionForInsert::Enter { next, .. } => idx = next,
                DirectionForInsert::Reached => {
                    if let Some(record) = &self.table[idx].record {
                        return (record.clone(), false);
                    }
                    trace!("[INSERT] reached glue node {idx}, attaching a record");
                    return (self.attach(idx), true);
                }
                DirectionForInsert::NewLeaf { right } => {
                    let new = self.new_node(prefix);
                    self.set_child(idx, new, right);
                    trace!("[INSERT] new leaf {new} below {idx} (right: {right})");
                    return (self.attach(new), true);
                }
                DirectionForInsert::NewChild { right, child_right } => {
                    let new = self.new_node(prefix);
                    if let Some(child) = self.set_child(idx, new, right) {
                        self.set_child(new, child, child_right);
                    }
                    trace!("[INSERT] new node {new} above the child of {idx}");
                    return (self.attach(new), true);
                }
                DirectionForInsert::NewBranch {
                    branch_prefix,
                    right,
                    prefix_right,
                } => {
                    let branch = self.new_node(branch_prefix);
                    let new = self.new_node(prefix);
                    if let Some(child) = self.set_child(idx, branch, right) {
                        self.set_child(branch, child, !prefix_right);
                    }
                    self.set_child(branch, new, prefix_right);
                    debug!(
                        "[INSERT] glue node {branch} (/{}) splits below {idx}",
                        branch_prefix.prefix_len()
                    );
                    return (self.attach(new), true);
                }
            }
        }
    }

    /// Get the record of a prefix by matching exactly.
    ///
    /// ```
    /// # use asn_radix::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PatriciaTrie<Ipv4Net, ()> = PatriciaTrie::new();
    /// trie.insert_or_get("192.168.1.0/24".parse()?);
    /// assert!(trie.search_exact(&"192.168.1.0/24".parse()?).is_some());
    /// assert!(trie.search_exact(&"192.168.0.0/23".parse()?).is_none());
    /// assert!(trie.search_exact(&"192.168.1.128/25".parse()?).is_none());
    /// # Ok(())
    /// # }
    /// ```
    pub fn search_exact(&self, prefix: &P) -> Option<&Record<T>> {
        let mut idx = 0;
        loop {
            match self.get_direction(idx, prefix) {
                Direction::Reached => return self.table[idx].record.as_ref(),
                Direction::Enter { next, .. } => idx = next,
                Direction::Missing => return None,
            }
        }
    }

    /// Get the record of the longest stored prefix that contains `prefix`.
    ///
    /// ```
    /// # use asn_radix::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: PatriciaTrie<Ipv4Net, ()> = PatriciaTrie::new();
    /// trie.insert_or_get("192.168.1.0/24".parse()?).0.set_asn(1);
    /// trie.insert_or_get("192.168.0.0/23".parse()?).0.set_asn(2);
    /// let asn = |p: &str| trie.search_best(&p.parse().unwrap()).map(|r| r.asn());
    /// assert_eq!(asn("192.168.1.1/32"), Some(1));
    /// assert_eq!(asn("192.168.0.0/24"), Some(2));
    /// assert_eq!(asn("192.168.2.0/24"), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn search_best(&self, prefix: &P) -> Option<&Record<T>> {
        let mut idx = 0;
        let mut best_match: Option<&Record<T>> = None;
        loop {
            best_match = self.table[idx].record.as_ref().or(best_match);
            match self.get_direction(idx, prefix) {
                Direction::Enter { next, .. } => idx = next,
                _ => return best_match,
            }
        }
    }

    /// Remove `prefix` from the trie and return its (now detached) record. Glue nodes that are no
    /// longer needed are removed as well, such that the trie looks as if `prefix` was never
    /// inserted.
    pub fn delete(&mut self, prefix: &P) -> Result<Record<T>> {
        let mut idx = 0;
        let mut grandparent = None;
        let mut grandparent_right = false;
        let mut parent = None;
        let mut parent_right = false;
        // first, search for the element
        loop {
            match self.get_direction(idx, prefix) {
                Direction::Reached if self.table[idx].record.is_some() => break,
                Direction::Enter { next, right } => {
                    grandparent_right = parent_right;
                    parent_right = right;
                    grandparent = parent;
                    parent = Some(idx);
                    idx = next;
                }
                Direction::Reached | Direction::Missing => {
                    return Err(Error::NotFound(prefix.to_network().to_string()))
                }
            }
        }
        let record = self.remove_node(idx, parent, parent_right, grandparent, grandparent_right);
        record.ok_or_else(|| Error::NotFound(prefix.to_network().to_string()))
    }

    /// Remove every node and detach all records.
    pub fn clear(&mut self) {
        self.detach_all();
        self.table.clear();
        self.free.clear();
        self.table.push(Node::new(P::zero()));
        self.len = 0;
    }
}

/// Private function implementations
impl<P, T> PatriciaTrie<P, T>
where
    P: Prefix,
{
    /// create a fresh record for the node at `idx`.
    fn attach(&mut self, idx: usize) -> Record<T> {
        let node = &mut self.table[idx];
        let record = Record::new(
            node.prefix.to_network(),
            NodeRef {
                family: P::FAMILY,
                index: idx,
            },
        );
        node.record = Some(record.clone());
        self.len += 1;
        record
    }

    /// Get the child of a node, either to the left or the right
    #[inline(always)]
    fn get_child(&self, idx: usize, right: bool) -> Option<usize> {
        if right {
            self.table[idx].right
        } else {
            self.table[idx].left
        }
    }

    /// set the child of a node (either to the left or the right), and return the index of the old child.
    #[inline(always)]
    fn set_child(&mut self, idx: usize, child: usize, right: bool) -> Option<usize> {
        if right {
            self.table[idx].right.replace(child)
        } else {
            self.table[idx].left.replace(child)
        }
    }

    /// remove a child from a node (just the reference).
    #[inline(always)]
    fn clear_child(&mut self, idx: usize, right: bool) -> Option<usize> {
        if right {
            self.table[idx].right.take()
        } else {
            self.table[idx].left.take()
        }
    }

    /// insert a new node into the table and return its index.
    #[inline(always)]
    fn new_node(&mut self, prefix: P) -> usize {
        if let Some(idx) = self.free.pop() {
            self.table[idx] = Node::new(prefix);
            idx
        } else {
            let idx = self.table.len();
            self.table.push(Node::new(prefix));
            idx
        }
    }

    /// return a node to the free list.
    #[inline(always)]
    fn release(&mut self, idx: usize) {
        let node = &mut self.table[idx];
        node.record = None;
        node.left = None;
        node.right = None;
        self.free.push(idx);
    }

    /// Remove a node from the tree, returning its detached record.
    fn remove_node(
        &mut self,
        idx: usize,
        par: Option<usize>,
        par_right: bool,
        grp: Option<usize>,
        grp_right: bool,
    ) -> Option<Record<T>> {
        // if we reach this point, then `idx` is the element to remove, `parent` is its parent,
        // and `parent_right` stores the direction of `idx` at `parent`.
        let node = &mut self.table[idx];
        let record = node.record.take();
        let has_left = node.left.is_some();
        let has_right = node.right.is_some();

        if has_left && has_right {
            // if the node has both left and right set, then it must remain in the tree as glue.
            trace!("[DELETE] node {idx} has two children, keeping it as glue");
        } else if !(has_left || has_right) {
            if let Some(par) = par {
                // if the node is a leaf, simply remove it.
                self.clear_child(par, par_right);
                self.release(idx);
                trace!("[DELETE] removed leaf {idx}");
                // now, if the parent is glue, replace it with its remaining child. The root is
                // never removed.
                if let Some(grp) = grp {
                    if self.table[par].record.is_none() {
                        match self.get_child(par, !par_right) {
                            Some(sibling) => {
                                self.set_child(grp, sibling, grp_right);
                            }
                            None => {
                                self.clear_child(grp, grp_right);
                            }
                        }
                        self.release(par);
                        debug!("[DELETE] collapsed glue node {par}");
                    }
                }
            }
        } else if let Some(par) = par {
            // one child remains. simply connect that child directly to the parent.
            if let Some(child) = self.clear_child(idx, has_right) {
                self.set_child(par, child, par_right);
            }
            self.release(idx);
            trace!("[DELETE] spliced out node {idx}");
        }

        if let Some(record) = &record {
            record.detach();
            self.len -= 1;
        }
        record
    }

    fn detach_all(&mut self) {
        for record in self.table.iter().filter_map(|n| n.record.as_ref()) {
            record.detach();
        }
    }

    /// Get the directions from some node `idx` to get to `prefix`.
    #[inline(always)]
    fn get_direction(&self, cur: usize, prefix: &P) -> Direction {
        let cur_p = &self.table[cur].prefix;
        if cur_p.eq(prefix) {
            Direction::Reached
        } else {
            let right = to_right(cur_p, prefix);
            match self.get_child(cur, right) {
                Some(child) if self.table[child].prefix.contains(prefix) => {
                    Direction::Enter { next: child, right }
                }
                _ => Direction::Missing,
            }
        }
    }

    /// Get the directions from some node `idx` to get to `prefix`.
    #[inline(always)]
    fn get_direction_for_insert(&self, cur: usize, prefix: &P) -> DirectionForInsert<P> {
        let cur_p = &self.table[cur].prefix;
        if cur_p.eq(prefix) {
            DirectionForInsert::Reached
        } else {
            let right = to_right(cur_p, prefix);
            if let Some(child) = self.get_child(cur, right) {
                let child_p = &self.table[child].prefix;
                if child_p.contains(prefix) {
                    DirectionForInsert::Enter { next: child, right }
                } else if prefix.contains(child_p) {
                    DirectionForInsert::NewChild {
                        right,
                        child_right: to_right(prefix, child_p),
                    }
                } else {
                    let branch_prefix = prefix.longest_common_prefix(child_p);
                    let prefix_right = to_right(&branch_prefix, prefix);
                    DirectionForInsert::NewBranch {
                        branch_prefix,
                        right,
                        prefix_right,
                    }
                }
            } else {
                DirectionForInsert::NewLeaf { right }
            }
        }
    }
}

impl<P, T> Drop for PatriciaTrie<P, T> {
    fn drop(&mut self) {
        for record in self.table.iter().filter_map(|n| n.record.as_ref()) {
            record.detach();
        }
    }
}

/// A node of the trie. Its prefix is the key; the length of the key is the bit on which the node
/// discriminates between its left and right child.
pub(crate) struct Node<P, T> {
    pub(crate) prefix: P,
    pub(crate) record: Option<Record<T>>,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
}

impl<P, T> Node<P, T> {
    fn new(prefix: P) -> Self {
        Self {
            prefix,
            record: None,
            left: None,
            right: None,
        }
    }
}

enum Direction {
    /// The prefix is already reached.
    Reached,
    /// Enter the next index and search again.
    Enter { next: usize, right: bool },
    /// The node was not found,
    Missing,
}

enum DirectionForInsert<P> {
    /// The prefix is already reached.
    Reached,
    /// Enter the next index and search again.
    Enter { next: usize, right: bool },
    /// Insert a new child at the given position as a leaf.
    NewLeaf { right: bool },
    /// Insert a new child at the given position, moving all old children to be a child of the new
    /// prefix. `right` tells where to insert the new node, while `child_right` tells where
    /// to insert the old child (on the right or the left of the new node).
    NewChild { right: bool, child_right: bool },
    /// Insert a new branch at the parent with the given prefix. `right` tells where to
    /// insert the branch, while `prefix_right` tells where to insert the new node at the
    /// branch. The old child of the parent should be inserted at `!prefix_right` of the branch.
    NewBranch {
        branch_prefix: P,
        right: bool,
        prefix_right: bool,
    },
}
