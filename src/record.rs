//! The caller-visible record attached to every network stored in the tree.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::network::{Family, Network};

/// Location of a node inside the arena of one family's trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    /// The trie that holds the node.
    pub family: Family,
    /// Index of the node in the arena of that trie.
    pub index: usize,
}

struct Slot<T> {
    network: Network,
    asn: Cell<u32>,
    data: RefCell<Option<T>>,
    node: Cell<Option<NodeRef>>,
}

/// A shared handle to the record of a stored network.
///
/// A record is created the first time its network is added, and every later `add` or search of
/// that network returns a handle to the same record. Cloning the handle does not copy the
/// record. When the network is deleted (or the tree is cleared or dropped), the record is
/// detached: it keeps its network, AS number and data, but no longer belongs to any tree.
///
/// ```
/// # use asn_radix::*;
/// # fn main() -> Result<()> {
/// let mut tree: RadixTree<&str> = RadixTree::new();
/// let net: Network = "10.0.0.0/8".parse()?;
/// let record = tree.add(net);
/// record.set_asn(64512);
/// record.set_data("private");
///
/// let found = tree.search_exact(&net).unwrap();
/// assert!(Record::ptr_eq(&record, &found));
/// assert_eq!(found.asn(), 64512);
///
/// tree.delete(&net)?;
/// assert!(!record.is_attached());
/// assert_eq!(*record.data(), Some("private"));
/// # Ok(())
/// # }
/// ```
pub struct Record<T = ()> {
    slot: Rc<Slot<T>>,
}

impl<T> Record<T> {
    pub(crate) fn new(network: Network, node: NodeRef) -> Self {
        Self {
            slot: Rc::new(Slot {
                network,
                asn: Cell::new(0),
                data: RefCell::new(None),
                node: Cell::new(Some(node)),
            }),
        }
    }

    /// The network this record was created for.
    pub fn network(&self) -> Network {
        self.slot.network
    }

    /// Canonical text form of the network, e.g. `"10.0.0.0/8"`.
    pub fn prefix(&self) -> String {
        self.slot.network.to_string()
    }

    /// Number of significant bits of the network.
    pub fn prefix_len(&self) -> u8 {
        self.slot.network.prefix_len()
    }

    /// Address family of the network.
    pub fn family(&self) -> Family {
        self.slot.network.family()
    }

    /// The autonomous system number. Zero until set.
    pub fn asn(&self) -> u32 {
        self.slot.asn.get()
    }

    /// Set the autonomous system number.
    pub fn set_asn(&self, asn: u32) {
        self.slot.asn.set(asn)
    }

    /// Borrow the caller-defined data.
    ///
    /// # Panics
    /// Panics if the data is currently borrowed mutably through [`Record::data_mut`].
    pub fn data(&self) -> Ref<'_, Option<T>> {
        self.slot.data.borrow()
    }

    /// Mutably borrow the caller-defined data.
    ///
    /// # Panics
    /// Panics if the data is currently borrowed through another handle.
    pub fn data_mut(&self) -> RefMut<'_, Option<T>> {
        self.slot.data.borrow_mut()
    }

    /// Replace the caller-defined data, returning the previous one.
    pub fn set_data(&self, data: T) -> Option<T> {
        self.slot.data.borrow_mut().replace(data)
    }

    /// Remove the caller-defined data.
    pub fn take_data(&self) -> Option<T> {
        self.slot.data.borrow_mut().take()
    }

    /// The node currently holding this record, or `None` once detached.
    pub fn node(&self) -> Option<NodeRef> {
        self.slot.node.get()
    }

    /// Whether the record still belongs to a tree.
    pub fn is_attached(&self) -> bool {
        self.slot.node.get().is_some()
    }

    /// Whether both handles point to the same record.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.slot, &b.slot)
    }

    pub(crate) fn detach(&self) {
        self.slot.node.set(None)
    }
}

impl<T> Clone for Record<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("prefix", &self.slot.network)
            .field("asn", &self.slot.asn.get())
            .field("data", &self.slot.data)
            .field("node", &self.slot.node.get())
            .finish()
    }
}
