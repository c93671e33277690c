//! Error type shared by every fallible operation of the crate.

use std::io;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors that can be reported by the radix tree, its iterators and the loader.
///
/// Search misses are never errors; they are reported as `None`.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The address part could not be parsed as a dotted-decimal or colon-hex literal.
    #[error("malformed address: {0:?}")]
    MalformedAddress(String),

    /// The prefix length exceeds the bit width of the address family.
    #[error("invalid prefix length {len} (maximum is {max})")]
    InvalidLength {
        /// The length that was requested.
        len: u32,
        /// The bit width of the detected family.
        max: u8,
    },

    /// A packed address must be exactly 4 (IPv4) or 16 (IPv6) bytes long.
    #[error("packed address must be 4 or 16 bytes, got {0}")]
    UnsupportedPackedLength(usize),

    /// Both a textual and a packed address were given, or none of them.
    #[error("exactly one of a textual or a packed address must be given")]
    AmbiguousOrMissingAddress,

    /// The network is not stored in the tree.
    #[error("no such network: {0}")]
    NotFound(String),

    /// The tree was modified after the iterator was created.
    #[error("radix tree modified during iteration")]
    ConcurrentModification,

    /// Bulk loading requires an empty tree.
    #[error("cannot bulk-load into a non-empty radix tree")]
    NonEmptyTarget,

    /// A record of the bulk-load input could not be parsed.
    #[error("error while parsing IPASN database (record: {record})")]
    MalformedRecord {
        /// 1-based index of the data line (comments and blank lines excluded).
        record: usize,
    },

    /// Both a file and an in-memory text were given to the loader, or none of them.
    #[error("the loader needs exactly one of a file or a text source")]
    AmbiguousOrMissingSource,

    /// An AS number in ASDOT notation could not be parsed.
    #[error("malformed ASDOT number: {0:?}")]
    MalformedAsdot(String),

    /// The bulk-load file could not be opened.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl PartialEq for Error {
    fn eq(&self, other: &Error) -> bool {
        use Error::*;
        match (self, other) {
            (MalformedAddress(a), MalformedAddress(b)) => a == b,
            (InvalidLength { len: a, max: x }, InvalidLength { len: b, max: y }) => a == b && x == y,
            (UnsupportedPackedLength(a), UnsupportedPackedLength(b)) => a == b,
            (AmbiguousOrMissingAddress, AmbiguousOrMissingAddress) => true,
            (NotFound(a), NotFound(b)) => a == b,
            (ConcurrentModification, ConcurrentModification) => true,
            (NonEmptyTarget, NonEmptyTarget) => true,
            (MalformedRecord { record: a }, MalformedRecord { record: b }) => a == b,
            (AmbiguousOrMissingSource, AmbiguousOrMissingSource) => true,
            (MalformedAsdot(a), MalformedAsdot(b)) => a == b,
            (Io(a), Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}
