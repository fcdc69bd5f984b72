//! Tokenizer for recursive listing output.
//!
//! The listing backends emit one object per line in the shape
//! `<YYYY-MM-DD> <HH:MM:SS> <size> <key>`. Anything else (blank lines,
//! `PRE` common-prefix rows, warnings) is reported as [`ParsedLine::Unparsable`]
//! so callers can count and skip it.

/// One object row of a recursive listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingEntry<'a> {
    /// Last-modified date (`YYYY-MM-DD`)
    pub date: &'a str,

    /// Last-modified time (`HH:MM:SS`)
    pub time: &'a str,

    /// Object size in bytes
    pub size: u64,

    /// Full object key, verbatim from the remainder of the line
    pub key: &'a str,
}

/// Outcome of tokenizing a single listing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedLine<'a> {
    /// A well-formed object row
    Object(ListingEntry<'a>),

    /// A line that does not match the object row shape
    Unparsable,
}

impl<'a> ParsedLine<'a> {
    /// Returns the entry if this line is an object row.
    pub fn entry(self) -> Option<ListingEntry<'a>> {
        match self {
            Self::Object(entry) => Some(entry),
            Self::Unparsable => None,
        }
    }
}

/// Parse one line of recursive object listing output.
///
/// The key is everything after the whitespace that follows the size, so keys
/// containing spaces survive intact.
///
/// # Example
///
/// ```
/// use sl_lister::parse::{ParsedLine, parse_object_line};
///
/// let entry = parse_object_line("2024-01-01 10:00:00 123 photos/my trip/img1.jpg")
///     .entry()
///     .unwrap();
/// assert_eq!(entry.size, 123);
/// assert_eq!(entry.key, "photos/my trip/img1.jpg");
///
/// assert_eq!(parse_object_line("PRE photos/"), ParsedLine::Unparsable);
/// ```
pub fn parse_object_line(line: &str) -> ParsedLine<'_> {
    let line = line.trim_end_matches(['\r', '\n']);

    let Some((date, rest)) = next_token(line.trim_start()) else {
        return ParsedLine::Unparsable;
    };
    let Some((time, rest)) = next_token(rest) else {
        return ParsedLine::Unparsable;
    };
    let Some((size, key)) = next_token(rest) else {
        return ParsedLine::Unparsable;
    };

    if !is_date(date) || !is_time(time) || key.is_empty() {
        return ParsedLine::Unparsable;
    }

    if !size.bytes().all(|b| b.is_ascii_digit()) {
        return ParsedLine::Unparsable;
    }
    let Ok(size) = size.parse::<u64>() else {
        return ParsedLine::Unparsable;
    };

    ParsedLine::Object(ListingEntry {
        date,
        time,
        size,
        key,
    })
}

/// Extract the bucket name from a bucket enumeration line.
///
/// The name is the last whitespace-delimited token; blank lines yield `None`.
pub fn bucket_name_from_line(line: &str) -> Option<&str> {
    line.split_whitespace().next_back()
}

/// Split off the next whitespace-delimited token, returning it and the rest
/// with leading whitespace removed.
fn next_token(s: &str) -> Option<(&str, &str)> {
    let end = s.find(char::is_whitespace)?;
    let (token, rest) = s.split_at(end);
    if token.is_empty() {
        return None;
    }
    Some((token, rest.trim_start()))
}

fn is_date(s: &str) -> bool {
    matches_shape(s, b"dddd-dd-dd")
}

fn is_time(s: &str) -> bool {
    matches_shape(s, b"dd:dd:dd")
}

/// `d` in the shape matches an ASCII digit, any other byte must match literally.
fn matches_shape(s: &str, shape: &[u8]) -> bool {
    s.len() == shape.len()
        && s.bytes().zip(shape).all(|(b, &expected)| match expected {
            b'd' => b.is_ascii_digit(),
            literal => b == literal,
        })
}
