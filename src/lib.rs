//! This crate provides a dual-stack prefix tree for IP prefixes that maps networks to the
//! autonomous system (AS) originating them. IPv4 and IPv6 networks live side by side in a single
//! [`RadixTree`], each family in its own [`PatriciaTrie`]. Any lookup performs either an exact
//! match or a longest-prefix match.
//!
//! ```
//! # use asn_radix::*;
//! # fn main() -> Result<()> {
//! let mut tree: RadixTree = RadixTree::new();
//! tree.load(Source::Text("8.0.0.0/9\t3356\n8.8.8.0/24\t15169\n2001:4860::/32\t15169\n"))?;
//!
//! let best = tree.search_best(&"8.8.8.8".parse()?).unwrap();
//! assert_eq!((best.asn(), best.prefix()), (15169, "8.8.8.0/24".to_string()));
//! assert!(tree.search_exact(&"8.8.0.0/16".parse()?).is_none());
//! # Ok(())
//! # }
//! ```
//!
//! # Description of the Tree
//!
//! Each trie is an arena of nodes. Each node consists of a prefix, an optional [`Record`], and two
//! optional children. Adding a new child, or traversing into the tree is done as follows: we look
//! at the most significant bit that is **not** part of the prefix itself. If it is not set, then we
//! take the left branch, and otherwise, we take the right one. Nodes without a record are glue
//! nodes; they only exist to branch between two sub-tries. After every insertion or deletion, each
//! glue node (except the root) has exactly two children.
//!
//! # Records
//!
//! Every stored network owns exactly one [`Record`], holding its AS number and optional data of
//! a caller-defined type. Records are shared handles: adding the same network twice returns the
//! same record, and the record stays valid (but detached) after its network was deleted.
//!
//! # Traversals
//!
//! All records can be enumerated with [`RadixTree::iter`] (borrowing the tree) or with a
//! [`Cursor`] (not borrowing the tree). Both yield IPv4 networks first, each family in
//! lexicographic order. A cursor detects any modification of the tree between two steps and
//! fails with [`Error::ConcurrentModification`].
//!
//! # Operations on the tree
//!
//! The following are the computational complexities of the functions, where `n` is the number of
//! networks in the tree.
//!
//! | Operation                                 | Complexity |
//! |-------------------------------------------|------------|
//! | `add`, `delete`                           | `O(log n)` |
//! | `search_exact`, `search_best`             | `O(log n)` |
//! | `all_nodes`, `all_prefixes`, `clear`      | `O(n)`     |
//! | `len`, `is_empty`, `generation`           | `O(1)`     |
//!
//! # IP to ASN databases
//!
//! [`RadixTree::load`] reads databases in the `NETWORK/LEN<TAB>ASN` text format (see [`loader`]).
//! [`AsnDb`] wraps a loaded tree and answers which address space an autonomous system originates.
//! AS numbers can be converted from and to the ASDOT notation with [`to_asdot`] and
//! [`from_asdot`].

#![deny(missing_docs)]

mod asdot;
mod db;
mod error;
mod fmt;
mod iter;
mod network;
mod prefix;
mod record;
#[cfg(feature = "serde")]
mod serde;
mod tree;

pub mod loader;
pub mod trie;

pub use asdot::{from_asdot, to_asdot};
pub use db::AsnDb;
pub use error::{Error, Result};
pub use iter::{Cursor, Iter};
pub use loader::Source;
pub use network::{Family, Network};
pub use prefix::Prefix;
pub use record::{NodeRef, Record};
pub use tree::RadixTree;
pub use trie::PatriciaTrie;

#[cfg(test)]
mod fuzzing;

#[inline(always)]
pub(crate) fn to_right<P: Prefix>(branch_p: &P, child_p: &P) -> bool {
    child_p.is_bit_set(branch_p.prefix_len())
}
