//! Syntax checkers for IP-literal hosts.
//!
//! Both checkers are classifiers: the URI parser uses them to pick a host
//! kind and never fails because of them. The [`AddressError`] only says why
//! a string is not an address.

use crate::error::AddressError;

const IPV4_OCTETS: usize = 4;
const IPV6_GROUPS: usize = 8;
const IPV6_GROUP_DIGITS: usize = 4;

/// What a syntactically valid IPv6 literal turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv6Kind {
    Address,
    /// `::1` in any of its spellings.
    Loopback,
}

fn decimal_value(text: &str) -> u32 {
    text.bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    })
}

fn hex_value(text: &str) -> u32 {
    text.chars()
        .fold(0u32, |acc, c| (acc << 4) | c.to_digit(16).unwrap_or(0))
}

fn illegal_char(s: &str, at: usize) -> AddressError {
    AddressError::IllegalChar(s[at..].chars().next().unwrap_or('\0'))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum V4State {
    Start,
    Digit,
    Period,
}

/// Checks a dotted-quad IPv4 address: exactly four decimal octets, each at
/// most 255, separated by single periods.
pub fn check_ipv4(s: &str) -> Result<(), AddressError> {
    let bytes = s.as_bytes();
    let mut state = V4State::Start;
    let mut octets = 0;
    let mut octet_start = 0;

    for i in 0..=bytes.len() {
        let c = bytes.get(i).copied();

        match (state, c) {
            (V4State::Start | V4State::Period, Some(b'0'..=b'9')) => {
                octet_start = i;
                state = V4State::Digit;
            }
            (V4State::Start, Some(b'.')) => return Err(AddressError::LeadingSeparator('.')),
            (V4State::Period, Some(b'.')) => return Err(AddressError::SuccessivePeriods),
            (V4State::Digit, Some(b'0'..=b'9')) => {}
            (V4State::Digit, None | Some(b'.')) => {
                let octet = &s[octet_start..i];
                if decimal_value(octet) > 255 {
                    return Err(AddressError::OctetTooHigh {
                        index: octets,
                        octet: octet.to_string(),
                    });
                }
                if c.is_some() && i + 1 == bytes.len() {
                    return Err(AddressError::TrailingSeparator('.'));
                }
                octets += 1;
                state = V4State::Period;
            }
            (_, None) => break,
            (_, Some(_)) => return Err(illegal_char(s, i)),
        }
    }

    if octets != IPV4_OCTETS {
        return Err(AddressError::OctetCount(octets));
    }

    Ok(())
}

pub fn is_ipv4(s: &str) -> bool {
    check_ipv4(s).is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum V6State {
    Start,
    Hex,
    /// Right after `::`
    Compressed,
    /// Right after a single `:`
    Colon,
    Period,
    Decimal,
}

/// Checks an IPv6 literal (RFC 4291 text form, without brackets), including
/// `::` zero compression and a trailing embedded IPv4 dotted quad.
pub fn check_ipv6(s: &str) -> Result<Ipv6Kind, AddressError> {
    let bytes = s.as_bytes();
    let mut state = V6State::Start;
    let mut groups: Vec<u32> = Vec::with_capacity(IPV6_GROUPS);
    let mut compressions = 0;
    let mut ipv4_octets = 0;
    let mut segment_start = 0;

    let mut i = 0;
    while i <= bytes.len() {
        let c = bytes.get(i).copied();
        let next = bytes.get(i + 1).copied();

        match (state, c) {
            (V6State::Start | V6State::Compressed | V6State::Colon, Some(h))
                if h.is_ascii_hexdigit() =>
            {
                segment_start = i;
                state = V6State::Hex;
            }
            (V6State::Start, Some(b':')) if next == Some(b':') => {
                compressions += 1;
                state = V6State::Compressed;
                i += 1;
            }
            (V6State::Start, Some(b':')) => return Err(AddressError::LeadingSeparator(':')),
            (V6State::Compressed | V6State::Colon, Some(b':')) => {
                return Err(AddressError::SuccessiveColons);
            }

            (V6State::Hex, Some(h)) if h.is_ascii_hexdigit() => {}
            (V6State::Hex, Some(b'.')) => {
                // The group that was just read is the first octet of an IPv4 tail
                let octet = &s[segment_start..i];
                if let Some(at) = octet.bytes().position(|b| !b.is_ascii_digit()) {
                    return Err(illegal_char(s, segment_start + at));
                }
                if decimal_value(octet) > 255 {
                    return Err(AddressError::OctetTooHigh {
                        index: 0,
                        octet: octet.to_string(),
                    });
                }
                ipv4_octets += 1;
                state = V6State::Period;
            }
            (V6State::Hex, None | Some(b':')) => {
                let segment = &s[segment_start..i];
                if segment.len() > IPV6_GROUP_DIGITS {
                    return Err(AddressError::SegmentTooLong {
                        index: groups.len(),
                        segment: segment.to_string(),
                    });
                }
                groups.push(hex_value(segment));

                if c.is_none() {
                    break;
                }

                if next == Some(b':') {
                    compressions += 1;
                    if compressions > 1 {
                        return Err(AddressError::MultipleCompressions);
                    }
                    state = V6State::Compressed;
                    i += 1;
                } else if i + 1 == bytes.len() {
                    return Err(AddressError::TrailingSeparator(':'));
                } else {
                    state = V6State::Colon;
                }
            }

            (V6State::Period, Some(b'0'..=b'9')) => {
                segment_start = i;
                state = V6State::Decimal;
            }
            (V6State::Period, Some(b'.')) => return Err(AddressError::SuccessivePeriods),
            (V6State::Period, None) => return Err(AddressError::TrailingSeparator('.')),

            (V6State::Decimal, Some(b'0'..=b'9')) => {}
            (V6State::Decimal, None | Some(b'.')) => {
                let octet = &s[segment_start..i];
                if decimal_value(octet) > 255 {
                    return Err(AddressError::OctetTooHigh {
                        index: ipv4_octets,
                        octet: octet.to_string(),
                    });
                }
                if c.is_some() && i + 1 == bytes.len() {
                    return Err(AddressError::TrailingSeparator('.'));
                }
                ipv4_octets += 1;
                if c.is_none() {
                    break;
                }
                state = V6State::Period;
            }

            (_, None) => break,
            (_, Some(_)) => return Err(illegal_char(s, i)),
        }

        i += 1;
    }

    let has_ipv4 = ipv4_octets > 0;
    if has_ipv4 && ipv4_octets != IPV4_OCTETS {
        return Err(AddressError::OctetCount(ipv4_octets));
    }

    // An IPv4 tail stands for the last two groups
    let total = groups.len() + if has_ipv4 { 2 } else { 0 };
    if compressions == 0 {
        if total < IPV6_GROUPS {
            return Err(AddressError::NotEnoughSegments(total));
        }
        if total > IPV6_GROUPS {
            return Err(AddressError::TooManySegments(total));
        }
    } else if total >= IPV6_GROUPS {
        return Err(AddressError::TooManySegments(total));
    }

    let loopback = !has_ipv4
        && state != V6State::Compressed
        && groups
            .split_last()
            .is_some_and(|(last, rest)| *last == 1 && rest.iter().all(|g| *g == 0));

    Ok(if loopback {
        Ipv6Kind::Loopback
    } else {
        Ipv6Kind::Address
    })
}
