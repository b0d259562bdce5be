//! Parsing of warehouse locator codes such as `P02.041.3.1`.
//!
//! A locator is `<aisle prefix>.<position>.<height>.<slot>`. Parsing never
//! fails: codes that do not follow the convention come back as
//! [`ParsedLocator::Malformed`] and sort after every well-formed code.

use std::fmt;

/// Sort value assigned to the fields of a malformed locator.
pub const SENTINEL: u32 = 999_999;

/// Separator between locator segments.
const SEGMENT_SEPARATOR: char = '.';

/// Letter preceding the aisle number in the first segment.
const AISLE_MARKER: char = 'P';

/// A well-formed locator code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locator {
    pub aisle: u32,
    pub position: u32,
    pub height: u32,
    pub slot: u32,
}

/// Outcome of [`Locator::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedLocator {
    Valid(Locator),
    Malformed,
}

impl ParsedLocator {
    /// Returns the `(height, position)` ordering key, substituting
    /// [`SENTINEL`] for malformed codes.
    pub fn sort_key(&self) -> (u32, u32) {
        match self {
            ParsedLocator::Valid(locator) => (locator.height, locator.position),
            ParsedLocator::Malformed => (SENTINEL, SENTINEL),
        }
    }
}

impl Locator {
    /// Parses a locator code. At least four segments are required; any
    /// trailing segments beyond the slot are ignored.
    pub fn parse(raw: &str) -> ParsedLocator {
        let segments: Vec<&str> = raw.trim().split(SEGMENT_SEPARATOR).collect();
        if segments.len() < 4 {
            return ParsedLocator::Malformed;
        }

        let aisle = segments[0]
            .strip_prefix(AISLE_MARKER)
            .and_then(parse_number);
        let fields = (
            aisle,
            parse_number(segments[1]),
            parse_number(segments[2]),
            parse_number(segments[3]),
        );

        match fields {
            (Some(aisle), Some(position), Some(height), Some(slot)) => {
                ParsedLocator::Valid(Locator {
                    aisle,
                    position,
                    height,
                    slot,
                })
            }
            _ => ParsedLocator::Malformed,
        }
    }

    /// Prefix token shared by every locator of this aisle.
    pub fn aisle_prefix(&self) -> String {
        format_aisle_prefix(self.aisle)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:03}.{}.{}",
            self.aisle_prefix(),
            self.position,
            self.height,
            self.slot
        )
    }
}

/// Formats an aisle number as its locator prefix, e.g. `2` -> `P02`.
pub fn format_aisle_prefix(aisle: u32) -> String {
    format!("{AISLE_MARKER}{aisle:02}")
}

/// Ordering key used by aisle reports: height first, then position.
pub fn sort_key(raw: &str) -> (u32, u32) {
    Locator::parse(raw).sort_key()
}

/// Extracts the height segment for visual grouping. Only three segments are
/// needed here, so codes without a slot still group.
pub fn height_of(raw: &str) -> Option<u32> {
    let mut segments = raw.trim().split(SEGMENT_SEPARATOR);
    segments.nth(2).and_then(parse_number)
}

/// Returns true when `raw` belongs to the aisle whose prefix is `prefix`.
///
/// The prefix has to be a whole segment: `P02` matches `P02.001.1.1` and
/// `P02`, never `P020.001.1.1`.
pub fn in_aisle(raw: &str, prefix: &str) -> bool {
    match raw.trim().strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with(SEGMENT_SEPARATOR),
        None => false,
    }
}

/// Parses user input for an aisle number. Zero is not an aisle.
pub fn parse_aisle_number(raw: &str) -> Option<u32> {
    parse_number(raw.trim()).filter(|aisle| *aisle > 0)
}

fn parse_number(segment: &str) -> Option<u32> {
    if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
