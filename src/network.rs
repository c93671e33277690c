//! The dual-family network type used by every public operation of the tree.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use either::Either;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};

use crate::error::{Error, Result};

/// Address family of a [`Network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    /// IPv4, 32 bit addresses.
    V4,
    /// IPv6, 128 bit addresses.
    V6,
}

impl Family {
    /// Number of bits of an address of this family.
    pub fn max_prefix_len(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }
}

/// An IPv4 or IPv6 network prefix.
///
/// Host bits are cleared on construction, so `10.1.2.3/8` and `10.0.0.0/8` are the same network.
/// The canonical text form (`Display`) is `address/length`.
///
/// ```
/// # use asn_radix::*;
/// # fn main() -> Result<()> {
/// let net: Network = "10.1.2.3/8".parse()?;
/// assert_eq!(net.to_string(), "10.0.0.0/8");
/// assert_eq!(net.family(), Family::V4);
/// assert_eq!(Network::parse_cidr("2001:db8::1")?.prefix_len(), 128);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Network(IpNet);

impl Network {
    /// Parse `address[/length]`. Without a length, the network covers a single host.
    pub fn parse_cidr(text: &str) -> Result<Self> {
        match text.split_once('/') {
            Some((addr, len)) => {
                let len = len
                    .parse::<u32>()
                    .map_err(|_| Error::MalformedAddress(text.to_string()))?;
                Self::new(parse_addr(addr)?, len)
            }
            None => {
                let addr = parse_addr(text)?;
                Ok(Self::host(addr))
            }
        }
    }

    /// Build a network from an address literal (without `/`) and an explicit length.
    pub fn from_parts(address: &str, len: u8) -> Result<Self> {
        Self::new(parse_addr(address)?, len as u32)
    }

    /// Build a network from a packed address: 4 bytes for IPv4, 16 bytes for IPv6.
    pub fn from_packed(bytes: &[u8], len: u8) -> Result<Self> {
        Self::new(unpack_addr(bytes)?, len as u32)
    }

    /// Build a network from exactly one of a textual or a packed address, and an optional length.
    ///
    /// When `len` is omitted, a textual address may carry its own `/length`; otherwise the network
    /// covers a single host. When `len` is given, the textual address must not contain a `/`.
    ///
    /// ```
    /// # use asn_radix::*;
    /// assert_eq!(
    ///     Network::from_args(None, Some(&[10u8, 0, 0, 0][..]), Some(8)).unwrap().to_string(),
    ///     "10.0.0.0/8"
    /// );
    /// assert_eq!(
    ///     Network::from_args(Some("10.0.0.0"), Some(&[10u8, 0, 0, 0][..]), None),
    ///     Err(Error::AmbiguousOrMissingAddress)
    /// );
    /// assert_eq!(Network::from_args(None, None, Some(8)), Err(Error::AmbiguousOrMissingAddress));
    /// ```
    pub fn from_args(address: Option<&str>, packed: Option<&[u8]>, len: Option<u8>) -> Result<Self> {
        match (address, packed, len) {
            (Some(address), None, None) => Self::parse_cidr(address),
            (Some(address), None, Some(len)) => Self::from_parts(address, len),
            (None, Some(packed), None) => Ok(Self::host(unpack_addr(packed)?)),
            (None, Some(packed), Some(len)) => Self::from_packed(packed, len),
            _ => Err(Error::AmbiguousOrMissingAddress),
        }
    }

    /// The network covering exactly one address.
    pub fn host(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(a) => Self(IpNet::V4(Ipv4Net::from(a))),
            IpAddr::V6(a) => Self(IpNet::V6(Ipv6Net::from(a))),
        }
    }

    fn new(addr: IpAddr, len: u32) -> Result<Self> {
        let max = match addr {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
        .max_prefix_len();
        if len > max as u32 {
            return Err(Error::InvalidLength { len, max });
        }
        let net = IpNet::new(addr, len as u8).map_err(|_| Error::InvalidLength { len, max })?;
        Ok(Self(net.trunc()))
    }

    /// The address family.
    pub fn family(&self) -> Family {
        match self.0 {
            IpNet::V4(_) => Family::V4,
            IpNet::V6(_) => Family::V6,
        }
    }

    /// The network address (all host bits cleared).
    pub fn addr(&self) -> IpAddr {
        self.0.addr()
    }

    /// Number of significant leading bits.
    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    /// Bit width of the family of this network.
    pub fn max_prefix_len(&self) -> u8 {
        self.family().max_prefix_len()
    }

    /// Whether `other` lies within `self` (or equals it). Networks of different families never
    /// contain each other.
    pub fn contains(&self, other: &Network) -> bool {
        self.0.contains(&other.0)
    }

    /// The underlying [`IpNet`].
    pub fn as_ipnet(&self) -> IpNet {
        self.0
    }

    /// Split into the per-family prefix, used to pick the trie of that family.
    pub(crate) fn split(&self) -> Either<Ipv4Net, Ipv6Net> {
        match self.0 {
            IpNet::V4(p) => Either::Left(p),
            IpNet::V6(p) => Either::Right(p),
        }
    }
}

fn parse_addr(text: &str) -> Result<IpAddr> {
    IpAddr::from_str(text).map_err(|_| Error::MalformedAddress(text.to_string()))
}

fn unpack_addr(bytes: &[u8]) -> Result<IpAddr> {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        Ok(IpAddr::V4(Ipv4Addr::from(octets)))
    } else if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        Ok(IpAddr::V6(Ipv6Addr::from(octets)))
    } else {
        Err(Error::UnsupportedPackedLength(bytes.len()))
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_cidr(s)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<IpNet> for Network {
    fn from(net: IpNet) -> Self {
        Self(net.trunc())
    }
}

impl From<Ipv4Net> for Network {
    fn from(net: Ipv4Net) -> Self {
        Self(IpNet::V4(net.trunc()))
    }
}

impl From<Ipv6Net> for Network {
    fn from(net: Ipv6Net) -> Self {
        Self(IpNet::V6(net.trunc()))
    }
}

impl From<IpAddr> for Network {
    fn from(addr: IpAddr) -> Self {
        Self::host(addr)
    }
}

impl From<Network> for IpNet {
    fn from(net: Network) -> Self {
        net.0
    }
}
