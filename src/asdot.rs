//! Conversion of AS numbers from and to the ASDOT notation of RFC 5396.

use crate::error::{Error, Result};

/// Format a 32-bit AS number in ASDOT notation. Numbers below 65536 are written as `AS<n>`,
/// larger ones as `AS<high>.<low>`.
///
/// ```
/// # use asn_radix::to_asdot;
/// assert_eq!(to_asdot(3356), "AS3356");
/// assert_eq!(to_asdot(71234), "AS1.5698");
/// ```
pub fn to_asdot(asn: u32) -> String {
    let (high, low) = (asn >> 16, asn & 0xffff);
    if high > 0 {
        format!("AS{high}.{low}")
    } else {
        format!("AS{low}")
    }
}

/// Parse an AS number in ASDOT notation, i.e., `AS<n>` or `AS<high>.<low>`. The `AS` prefix is
/// case-insensitive.
///
/// ```
/// # use asn_radix::*;
/// assert_eq!(from_asdot("AS2.321"), Ok(131393));
/// assert_eq!(from_asdot("as15169"), Ok(15169));
/// assert_eq!(from_asdot("AS65536.0"), Err(Error::MalformedAsdot("AS65536.0".to_string())));
/// ```
pub fn from_asdot(text: &str) -> Result<u32> {
    let malformed = || Error::MalformedAsdot(text.to_string());
    let number = text
        .get(..2)
        .filter(|prefix| prefix.eq_ignore_ascii_case("as"))
        .map(|_| &text[2..])
        .ok_or_else(malformed)?;
    match number.split_once('.') {
        Some((high, low)) => {
            let high = parse_part(high).ok_or_else(malformed)?;
            let low = parse_part(low).ok_or_else(malformed)?;
            Ok((high << 16) | low)
        }
        None if is_decimal(number) => number.parse().map_err(|_| malformed()),
        None => Err(malformed()),
    }
}

/// Parse one half of a dotted AS number.
fn parse_part(text: &str) -> Option<u32> {
    if !is_decimal(text) {
        return None;
    }
    text.parse::<u16>().ok().map(u32::from)
}

fn is_decimal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
