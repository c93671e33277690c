//! Bulk loading of IP to ASN databases in the `NETWORK/LEN<TAB>ASN` text format.
//!
//! Each data line maps one network to the AS number originating it:
//!
//! ```text
//! ; IP-ASN database
//! 10.0.0.0/8	100
//! 2001:db8::/32	64496
//! ```
//!
//! Empty lines and lines starting with `;` or `#` are comments. Lines with AS number `0` or prefix
//! length `0` are skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::network::Network;
use crate::tree::RadixTree;

/// Where to read a database from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source<'a> {
    /// A text file on disk.
    File(&'a Path),
    /// Database content held in memory.
    Text(&'a str),
}

impl<'a> Source<'a> {
    /// Pick the source out of an optional file and an optional text, exactly one of which must be
    /// given. Empty paths and empty texts count as absent.
    ///
    /// ```
    /// # use asn_radix::*;
    /// assert_eq!(
    ///     Source::from_args(None, Some("10.0.0.0/8\t100")),
    ///     Ok(Source::Text("10.0.0.0/8\t100"))
    /// );
    /// assert_eq!(Source::from_args(None, Some("")), Err(Error::AmbiguousOrMissingSource));
    /// ```
    pub fn from_args(file: Option<&'a Path>, text: Option<&'a str>) -> Result<Self> {
        let file = file.filter(|f| !f.as_os_str().is_empty());
        let text = text.filter(|t| !t.is_empty());
        match (file, text) {
            (Some(file), None) => Ok(Source::File(file)),
            (None, Some(text)) => Ok(Source::Text(text)),
            _ => Err(Error::AmbiguousOrMissingSource),
        }
    }
}

enum Line {
    Comment,
    Skipped,
    Entry(Network, u32),
}

impl<T> RadixTree<T> {
    /// Fill an empty tree from an IP to ASN database, and return the number of entries that were
    /// added.
    ///
    /// The tree must be empty, otherwise [`Error::NonEmptyTarget`] is returned before anything is
    /// read. The first line that cannot be parsed aborts the load with [`Error::MalformedRecord`],
    /// reporting the 1-based index of that line among all data lines. Entries added before the
    /// failure remain in the tree.
    ///
    /// ```
    /// # use asn_radix::*;
    /// # fn main() -> Result<()> {
    /// let mut tree: RadixTree = RadixTree::new();
    /// let text = "10.0.0.0/8\t100\n192.168.1.0/24\t200\n; comment\n0.0.0.0/0\t0\n";
    /// assert_eq!(tree.load(Source::Text(text))?, 2);
    /// assert_eq!(tree.search_exact(&"10.0.0.0/8".parse()?).map(|r| r.asn()), Some(100));
    /// assert_eq!(tree.load(Source::Text(text)), Err(Error::NonEmptyTarget));
    /// # Ok(())
    /// # }
    /// ```
    pub fn load(&mut self, source: Source<'_>) -> Result<usize> {
        if !self.is_empty() {
            warn!("Refusing to load a database into a non-empty tree");
            return Err(Error::NonEmptyTarget);
        }
        match source {
            Source::File(path) => {
                debug!("Loading IP to ASN database from {}", path.display());
                let file = File::open(path)?;
                self.load_lines(BufReader::new(file).lines())
            }
            Source::Text(text) => {
                debug!("Loading IP to ASN database from {} bytes of text", text.len());
                self.load_lines(text.lines().map(Ok))
            }
        }
    }

    fn load_lines<I, S>(&mut self, lines: I) -> Result<usize>
    where
        I: Iterator<Item = io::Result<S>>,
        S: AsRef<str>,
    {
        let mut record = 0;
        let mut added = 0;
        let mut skipped = 0;
        for line in lines {
            let parsed = line.ok().and_then(|l| parse_line(l.as_ref()));
            match parsed {
                Some(Line::Comment) => continue,
                Some(Line::Skipped) => {
                    record += 1;
                    skipped += 1;
                }
                Some(Line::Entry(network, asn)) => {
                    record += 1;
                    self.add(network).set_asn(asn);
                    added += 1;
                }
                None => {
                    record += 1;
                    warn!("Malformed record {record}, aborting after {added} entries");
                    return Err(Error::MalformedRecord { record });
                }
            }
        }
        info!("Loaded {added} entries ({skipped} skipped) into {} networks", self.len());
        Ok(added)
    }
}

/// Parse a single line. Returns `None` if the line is malformed.
fn parse_line(line: &str) -> Option<Line> {
    if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
        return Some(Line::Comment);
    }
    let tab = line.find('\t')?;
    let slash = line.find('/').filter(|slash| *slash < tab)?;
    let address = &line[..slash];
    let len: u8 = line[slash + 1..tab].trim().parse().ok()?;
    let asn: u32 = line[tab + 1..].trim().parse().ok()?;
    if asn == 0 || len == 0 {
        return Some(Line::Skipped);
    }
    let network = Network::from_parts(address, len).ok()?;
    Some(Line::Entry(network, asn))
}
