//! Description of the per-family trait `Prefix`.
//!
//! Both families share one bit layout: the address sits left-aligned in a `u128`, so bit `0`
//! is always the most significant bit of the address. An IPv4 address occupies the upper 32
//! bits and leaves the rest zero.

use std::net::{Ipv4Addr, Ipv6Addr};

use ipnet::{Ipv4Net, Ipv6Net};

use crate::network::{Family, Network};

/// Bit-level view of a single-family network prefix, as used by a
/// [`PatriciaTrie`](crate::PatriciaTrie).
pub trait Prefix: Sized + Copy {
    /// The address family of this prefix type.
    const FAMILY: Family;

    /// Address bits, left-aligned. Host bits are kept.
    fn bits(&self) -> u128;

    /// Prefix length
    fn prefix_len(&self) -> u8;

    /// Build a prefix from left-aligned bits. Bits beyond `len` are dropped, and `len` must not
    /// exceed [`Prefix::width`].
    fn from_bits(bits: u128, len: u8) -> Self;

    /// Convert into the dual-family [`Network`].
    fn to_network(&self) -> Network;

    /// Number of bits of an address of this family.
    fn width() -> u8 {
        Self::FAMILY.max_prefix_len()
    }

    /// The network part of [`Prefix::bits`].
    fn network_bits(&self) -> u128 {
        self.bits() & netmask(self.prefix_len())
    }

    /// The same prefix with all host bits cleared.
    fn canonical(&self) -> Self {
        Self::from_bits(self.bits(), self.prefix_len())
    }

    /// The prefix of length zero.
    fn zero() -> Self {
        Self::from_bits(0, 0)
    }

    /// Longest prefix covering both `self` and `other`.
    fn longest_common_prefix(&self, other: &Self) -> Self {
        let diverge = (self.network_bits() ^ other.network_bits()).leading_zeros() as u8;
        let len = diverge.min(self.prefix_len()).min(other.prefix_len());
        Self::from_bits(self.bits(), len)
    }

    /// Whether `other` lies within `self`. A prefix contains itself.
    fn contains(&self, other: &Self) -> bool {
        self.prefix_len() <= other.prefix_len()
            && (self.bits() ^ other.bits()) & netmask(self.prefix_len()) == 0
    }

    /// Whether network bit `bit` (counted from the left) is one. Host bits read as zero.
    fn is_bit_set(&self, bit: u8) -> bool {
        bit < self.prefix_len() && self.bits() & (1u128 << (127 - bit)) != 0
    }

    /// Equality of length and network bits; host bits are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.prefix_len() == other.prefix_len() && self.network_bits() == other.network_bits()
    }
}

/// Left-aligned netmask with `len` leading ones.
pub(crate) fn netmask(len: u8) -> u128 {
    u128::MAX.checked_shl(128 - len as u32).unwrap_or(0)
}

impl Prefix for Ipv4Net {
    const FAMILY: Family = Family::V4;

    fn bits(&self) -> u128 {
        (u32::from(self.addr()) as u128) << 96
    }

    fn prefix_len(&self) -> u8 {
        self.prefix_len()
    }

    fn from_bits(bits: u128, len: u8) -> Self {
        Ipv4Net::new_assert(Ipv4Addr::from((bits >> 96) as u32), len).trunc()
    }

    fn to_network(&self) -> Network {
        Network::from(*self)
    }
}

impl Prefix for Ipv6Net {
    const FAMILY: Family = Family::V6;

    fn bits(&self) -> u128 {
        self.addr().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix_len()
    }

    fn from_bits(bits: u128, len: u8) -> Self {
        Ipv6Net::new_assert(Ipv6Addr::from(bits), len).trunc()
    }

    fn to_network(&self) -> Network {
        Network::from(*self)
    }
}
