//! The dual-family tree. It owns one [`PatriciaTrie`] per address family and dispatches every
//! operation by the family of the given [`Network`].

use ipnet::{Ipv4Net, Ipv6Net};
use log::trace;

use crate::error::Result;
use crate::iter::{Cursor, Iter};
use crate::network::Network;
use crate::record::Record;
use crate::trie::PatriciaTrie;

macro_rules! fork {
    ($self:ident, $network:ident, $func:ident) => {
        match $network.split() {
            ::either::Either::Left(p) => $self.v4.$func(p),
            ::either::Either::Right(p) => $self.v6.$func(p),
        }
    };
}

macro_rules! fork_ref {
    ($self:ident, $network:ident, $func:ident) => {
        match $network.split() {
            ::either::Either::Left(p) => $self.v4.$func(&p),
            ::either::Either::Right(p) => $self.v6.$func(&p),
        }
    };
}

/// Longest-prefix-match tree holding IPv4 and IPv6 networks side by side. Each stored network
/// owns a [`Record`], holding an AS number and optional data of type `T`.
///
/// Every structural change (a new record is created, a record is deleted, or the tree is cleared)
/// increments the [`generation`](RadixTree::generation) of the tree, which invalidates all
/// outstanding [`Cursor`]s.
///
/// ```
/// # use asn_radix::*;
/// # fn main() -> Result<()> {
/// let mut tree: RadixTree = RadixTree::new();
/// tree.add("10.0.0.0/8".parse()?).set_asn(8);
/// tree.add("10.1.0.0/16".parse()?).set_asn(16);
/// tree.add("2001:db8::/32".parse()?).set_asn(32);
///
/// let asn = |addr: &str| tree.search_best(&addr.parse().unwrap()).map(|r| r.asn());
/// assert_eq!(asn("10.1.2.3"), Some(16));
/// assert_eq!(asn("10.2.2.3"), Some(8));
/// assert_eq!(asn("11.0.0.0"), None);
/// assert_eq!(asn("2001:db8::1"), Some(32));
///
/// assert_eq!(
///     tree.all_prefixes(),
///     vec!["10.0.0.0/8", "10.1.0.0/16", "2001:db8::/32"]
/// );
/// # Ok(())
/// # }
/// ```
pub struct RadixTree<T = ()> {
    v4: PatriciaTrie<Ipv4Net, T>,
    v6: PatriciaTrie<Ipv6Net, T>,
    generation: u64,
}

impl<T> Default for RadixTree<T> {
    fn default() -> Self {
        Self {
            v4: PatriciaTrie::new(),
            v6: PatriciaTrie::new(),
            generation: 0,
        }
    }
}

impl<T> RadixTree<T> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `network` to the tree and return its record. If the network is already present, its
    /// existing record is returned and the tree is left unchanged.
    ///
    /// ```
    /// # use asn_radix::*;
    /// # fn main() -> Result<()> {
    /// let mut tree: RadixTree = RadixTree::new();
    /// let a = tree.add("192.168.0.0/16".parse()?);
    /// let generation = tree.generation();
    /// let b = tree.add("192.168.0.0/16".parse()?);
    /// assert!(Record::ptr_eq(&a, &b));
    /// assert_eq!(tree.generation(), generation);
    /// # Ok(())
    /// # }
    /// ```
    pub fn add(&mut self, network: Network) -> Record<T> {
        let (record, created) = fork!(self, network, insert_or_get);
        if created {
            self.generation += 1;
            trace!("[ADD] {network} (generation {})", self.generation);
        }
        record
    }

    /// Remove `network` from the tree. The returned record is detached, but keeps its AS number
    /// and data. Fails with [`Error::NotFound`](crate::Error::NotFound) if `network` is not stored
    /// in the tree.
    ///
    /// ```
    /// # use asn_radix::*;
    /// # fn main() -> Result<()> {
    /// let mut tree: RadixTree = RadixTree::new();
    /// let net: Network = "10.0.0.0/8".parse()?;
    /// tree.add(net).set_asn(100);
    /// let record = tree.delete(&net)?;
    /// assert_eq!(record.asn(), 100);
    /// assert!(!record.is_attached());
    /// assert!(tree.search_exact(&net).is_none());
    /// assert_eq!(tree.delete(&net).unwrap_err(), Error::NotFound("10.0.0.0/8".to_string()));
    /// # Ok(())
    /// # }
    /// ```
    pub fn delete(&mut self, network: &Network) -> Result<Record<T>> {
        let record = fork_ref!(self, network, delete)?;
        self.generation += 1;
        trace!("[DELETE] {network} (generation {})", self.generation);
        Ok(record)
    }

    /// Get the record of `network`, matching exactly.
    pub fn search_exact(&self, network: &Network) -> Option<Record<T>> {
        fork_ref!(self, network, search_exact).cloned()
    }

    /// Get the record of the most specific stored network that contains `network`.
    pub fn search_best(&self, network: &Network) -> Option<Record<T>> {
        fork_ref!(self, network, search_best).cloned()
    }

    /// All records of the tree, IPv4 networks first, each family in lexicographic order.
    pub fn all_nodes(&self) -> Vec<Record<T>> {
        self.iter().collect()
    }

    /// The canonical text form of all stored networks, IPv4 networks first.
    pub fn all_prefixes(&self) -> Vec<String> {
        self.iter().map(|r| r.prefix()).collect()
    }

    /// Create a cursor that walks the tree without borrowing it. See [`Cursor`].
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.generation)
    }

    /// Iterate over all records, IPv4 networks first.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Number of stored networks in both families.
    pub fn len(&self) -> usize {
        self.v4.len() + self.v6.len()
    }

    /// Whether the tree stores no network.
    pub fn is_empty(&self) -> bool {
        self.v4.is_empty() && self.v6.is_empty()
    }

    /// The modification counter of the tree.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Remove all networks and detach their records.
    pub fn clear(&mut self) {
        self.v4.clear();
        self.v6.clear();
        self.generation += 1;
    }

    /// The trie holding all IPv4 networks.
    pub fn v4(&self) -> &PatriciaTrie<Ipv4Net, T> {
        &self.v4
    }

    /// The trie holding all IPv6 networks.
    pub fn v6(&self) -> &PatriciaTrie<Ipv6Net, T> {
        &self.v6
    }
}

impl<'a, T> IntoIterator for &'a RadixTree<T> {
    type Item = Record<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
