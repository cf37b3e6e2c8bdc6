//! Error types for the RIFF walker and the URI parser.

use thiserror::Error;

/// Errors that abort a RIFF/WAV/AIFF parse or a WAV header write.
///
/// A truncated chunk body is never one of these: the walker stops early and
/// returns whatever it found.
#[derive(Error, Debug)]
pub enum RiffError {
    #[error("Could not read {len} bytes at offset {offset}: {source}")]
    Read {
        offset: u64,
        len: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Container header is too short: got {got} of {expected} bytes")]
    ShortHeader { got: usize, expected: usize },

    #[error("Unsupported container format: {0:?}")]
    UnsupportedFormat(String),

    #[error("Chunk at offset {offset} with size {size} overflows the addressable range")]
    SizeOverflow { offset: u64, size: u32 },

    #[error("Write error: {0}")]
    Write(#[from] std::io::Error),
}

/// Errors that make [`crate::uri::parse`] return no result at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    #[error("URI is too long: {len} bytes (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("URI is missing scheme")]
    MissingScheme,

    #[error("URI scheme contains invalid character: {0:?}")]
    InvalidSchemeChar(char),

    #[error("URI port contains invalid value: {0:?}")]
    PortSyntax(String),
}

/// Diagnostic returned by the IPv4/IPv6 host checkers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("can't start with a single '{0}'")]
    LeadingSeparator(char),

    #[error("can't end with a single '{0}'")]
    TrailingSeparator(char),

    #[error("can't have successive '.'")]
    SuccessivePeriods,

    #[error("can't have more than two successive ':'")]
    SuccessiveColons,

    #[error("can't have more than one '::'")]
    MultipleCompressions,

    #[error("octet {index} is too high: {octet}")]
    OctetTooHigh { index: usize, octet: String },

    #[error("segment {index} is too long: {segment}")]
    SegmentTooLong { index: usize, segment: String },

    #[error("illegal char {0:?}")]
    IllegalChar(char),

    #[error("wrong number of octets: {0}")]
    OctetCount(usize),

    #[error("too many segments: {0}")]
    TooManySegments(usize),

    #[error("not enough segments: {0}")]
    NotEnoughSegments(usize),
}

pub type Result<T> = std::result::Result<T, RiffError>;
