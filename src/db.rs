//! IP to ASN lookups on top of a loaded [`RadixTree`].

use std::cell::OnceCell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::Path;

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use log::debug;

use crate::error::Result;
use crate::iter::Iter;
use crate::loader::Source;
use crate::network::Network;
use crate::tree::RadixTree;

/// An IP to ASN database. It answers which autonomous system originates an address, and which
/// address space an autonomous system originates.
///
/// ```
/// # use asn_radix::*;
/// # fn main() -> Result<()> {
/// let db = AsnDb::from_text("8.0.0.0/9\t3356\n8.8.8.0/24\t15169\n8.8.4.0/24\t15169\n")?;
/// assert_eq!(db.lookup("8.8.8.8", None)?, Some((15169, "8.8.8.0/24".to_string())));
/// assert_eq!(db.lookup("8.8.8.0", Some(16))?, Some((3356, "8.0.0.0/9".to_string())));
/// assert_eq!(db.lookup("9.9.9.9", None)?, None);
/// assert_eq!(db.as_size(15169), 512);
/// # Ok(())
/// # }
/// ```
pub struct AsnDb {
    tree: RadixTree,
    records: usize,
    as_prefixes: OnceCell<HashMap<u32, BTreeSet<Network>>>,
}

impl AsnDb {
    /// Load a database from the given source.
    pub fn load(source: Source<'_>) -> Result<Self> {
        let mut tree = RadixTree::new();
        let records = tree.load(source)?;
        Ok(Self {
            tree,
            records,
            as_prefixes: OnceCell::new(),
        })
    }

    /// Load a database from a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(Source::File(path.as_ref()))
    }

    /// Load a database from its text content.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::load(Source::Text(text))
    }

    /// Get the AS number and the best matching prefix of an address or a network. The network
    /// is either given by `address` alone (`"10.1.2.3"` or `"10.1.0.0/16"`), or by `address` and
    /// `masklen`. Returns `None` if no prefix contains the network.
    pub fn lookup(&self, address: &str, masklen: Option<u8>) -> Result<Option<(u32, String)>> {
        let network = match masklen {
            Some(len) => Network::from_parts(address, len)?,
            None => Network::parse_cidr(address)?,
        };
        Ok(self.lookup_network(&network))
    }

    /// Get the AS number and the best matching prefix of `network`.
    pub fn lookup_network(&self, network: &Network) -> Option<(u32, String)> {
        self.tree
            .search_best(network)
            .map(|record| (record.asn(), record.prefix()))
    }

    /// All prefixes originated by `asn`, or `None` if the AS originates nothing. The index over all
    /// AS numbers is built on the first call.
    pub fn as_prefixes(&self, asn: u32) -> Option<&BTreeSet<Network>> {
        self.as_prefixes
            .get_or_init(|| {
                let mut index: HashMap<u32, BTreeSet<Network>> = HashMap::new();
                for record in &self.tree {
                    index.entry(record.asn()).or_default().insert(record.network());
                }
                debug!(
                    "Indexed {} prefixes of {} autonomous systems",
                    self.tree.len(),
                    index.len()
                );
                index
            })
            .get(&asn)
    }

    /// The prefixes originated by `asn` with all overlaps removed and adjacent prefixes merged,
    /// IPv4 prefixes first. Returns `None` if the AS originates nothing.
    ///
    /// ```
    /// # use asn_radix::*;
    /// # fn main() -> Result<()> {
    /// let db = AsnDb::from_text("10.0.0.0/8\t1\n10.1.0.0/16\t1\n11.0.0.0/8\t1\n::/1\t1\n")?;
    /// let effective: Vec<String> = db
    ///     .as_prefixes_effective(1)
    ///     .unwrap()
    ///     .iter()
    ///     .map(|n| n.to_string())
    ///     .collect();
    /// assert_eq!(effective, vec!["10.0.0.0/7", "::/1"]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn as_prefixes_effective(&self, asn: u32) -> Option<Vec<Network>> {
        let prefixes = self.as_prefixes(asn)?;
        let mut v4: Vec<Ipv4Net> = Vec::new();
        let mut v6: Vec<Ipv6Net> = Vec::new();
        for network in prefixes {
            match network.as_ipnet() {
                IpNet::V4(net) => v4.push(net),
                IpNet::V6(net) => v6.push(net),
            }
        }
        let v4 = Ipv4Net::aggregate(&v4).into_iter().map(Network::from);
        let v6 = Ipv6Net::aggregate(&v6).into_iter().map(Network::from);
        Some(v4.chain(v6).collect())
    }

    /// Number of addresses originated by `asn`, counting every address only once. IPv4 and IPv6
    /// addresses are summed up; the result saturates at `u128::MAX`.
    pub fn as_size(&self, asn: u32) -> u128 {
        self.as_prefixes_effective(asn)
            .unwrap_or_default()
            .iter()
            .map(|network| {
                let host_bits = (network.max_prefix_len() - network.prefix_len()) as u32;
                1u128.checked_shl(host_bits).unwrap_or(u128::MAX)
            })
            .fold(0u128, u128::saturating_add)
    }

    /// Number of database entries that were loaded.
    pub fn records(&self) -> usize {
        self.records
    }

    /// The underlying tree.
    pub fn tree(&self) -> &RadixTree {
        &self.tree
    }

    /// Iterate over all records of the database.
    pub fn iter(&self) -> Iter<'_, ()> {
        self.tree.iter()
    }
}

impl fmt::Debug for AsnDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsnDb")
            .field("records", &self.records)
            .field("prefixes", &self.tree.len())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;

    const DB: &str = "\
; IP-ASN32-DAT file
8.0.0.0/9\t3356
8.8.4.0/24\t15169
8.8.8.0/24\t15169
2001:4860::/32\t15169
10.0.0.0/8\t64512
10.1.0.0/16\t64512
11.0.0.0/8\t64512
2001:db8::/32\t64512
";

    fn db() -> AsnDb {
        AsnDb::from_text(DB).unwrap()
    }

    fn strings(networks: impl IntoIterator<Item = Network>) -> Vec<String> {
        networks.into_iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn lookup() {
        let db = db();
        assert_eq!(db.records(), 8);
        assert_eq!(
            db.lookup("8.8.8.8", None),
            Ok(Some((15169, "8.8.8.0/24".to_string())))
        );
        assert_eq!(
            db.lookup("8.8.8.0", Some(24)),
            Ok(Some((15169, "8.8.8.0/24".to_string())))
        );
        assert_eq!(
            db.lookup("8.8.8.0", Some(25)),
            Ok(Some((15169, "8.8.8.0/24".to_string())))
        );
        assert_eq!(
            db.lookup("8.8.8.0", Some(16)),
            Ok(Some((3356, "8.0.0.0/9".to_string())))
        );
        assert_eq!(
            db.lookup("10.1.2.3/24", None),
            Ok(Some((64512, "10.1.0.0/16".to_string())))
        );
        assert_eq!(
            db.lookup("2001:4860:4860::8888", None),
            Ok(Some((15169, "2001:4860::/32".to_string())))
        );
        assert_eq!(db.lookup("9.9.9.9", None), Ok(None));
        assert_eq!(db.lookup("8.8.8.0", Some(8)), Ok(None));
    }

    #[test]
    fn lookup_errors() {
        let db = db();
        assert_eq!(
            db.lookup("8.8.8", None),
            Err(Error::MalformedAddress("8.8.8".to_string()))
        );
        assert_eq!(
            db.lookup("8.8.8.8", Some(33)),
            Err(Error::InvalidLength { len: 33, max: 32 })
        );
        assert_eq!(
            db.lookup("8.8.8.0/24", Some(24)),
            Err(Error::MalformedAddress("8.8.8.0/24".to_string()))
        );
    }

    #[test]
    fn as_prefixes() {
        let db = db();
        assert_eq!(
            strings(db.as_prefixes(15169).unwrap().iter().copied()),
            vec!["8.8.4.0/24", "8.8.8.0/24", "2001:4860::/32"]
        );
        assert_eq!(
            strings(db.as_prefixes(3356).unwrap().iter().copied()),
            vec!["8.0.0.0/9"]
        );
        assert!(db.as_prefixes(1).is_none());
    }

    #[test]
    fn as_prefixes_effective() {
        let db = db();
        assert_eq!(
            strings(db.as_prefixes_effective(64512).unwrap()),
            vec!["10.0.0.0/7", "2001:db8::/32"]
        );
        assert_eq!(
            strings(db.as_prefixes_effective(15169).unwrap()),
            vec!["8.8.4.0/24", "8.8.8.0/24", "2001:4860::/32"]
        );
        assert!(db.as_prefixes_effective(1).is_none());
    }

    #[test]
    fn as_size() {
        let db = db();
        assert_eq!(db.as_size(3356), 1 << 23);
        assert_eq!(db.as_size(64512), (1 << 25) + (1u128 << 96));
        assert_eq!(db.as_size(15169), 512 + (1u128 << 96));
        assert_eq!(db.as_size(1), 0);

        let all = AsnDb::from_text("::/1\t1\n8000::/1\t1\n").unwrap();
        assert_eq!(all.as_size(1), u128::MAX);
    }

    #[test]
    fn load_errors() {
        assert_eq!(
            AsnDb::from_text("10.0.0.0/8\t1\n10.0.0.0-8\t1\n").unwrap_err(),
            Error::MalformedRecord { record: 2 }
        );
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AsnDb::open(dir.path().join("missing")).unwrap_err(),
            Error::Io(_)
        ));
    }

    #[test]
    fn iterate() {
        let db = db();
        assert_eq!(db.iter().count(), db.tree().len());
        assert_eq!(db.iter().map(|r| r.asn()).max(), Some(64512));
    }
}
