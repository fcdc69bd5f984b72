//! Extension-based exclusion of file records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::prefix::file_name;

/// A set of case-sensitive file extensions (without the leading dot).
///
/// A file is excluded iff the text after the last `.` of its final path
/// segment is non-empty and a member of the set. Files without an extension
/// are never excluded.
///
/// # Example
///
/// ```
/// use sl_lister::ExclusionSet;
///
/// let set = ExclusionSet::parse("tmp, .log");
/// assert!(set.is_excluded("build/x.tmp"));
/// assert!(set.is_excluded("server.log"));
/// assert!(!set.is_excluded("x.TMP"));
/// assert!(!set.is_excluded("Makefile"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionSet {
    extensions: BTreeSet<String>,
}

impl ExclusionSet {
    /// Create an empty exclusion set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list of extensions.
    ///
    /// Entries are trimmed, one leading `.` is stripped, and empty entries
    /// are dropped.
    pub fn parse(list: &str) -> Self {
        list.split(',').collect()
    }

    /// Add an extension to the set.
    pub fn insert(&mut self, extension: &str) {
        let extension = extension.trim();
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        if !extension.is_empty() {
            self.extensions.insert(extension.to_string());
        }
    }

    /// Check whether the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Number of extensions in the set.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Check whether an extension is a member.
    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    /// Check whether the object with this key should be left out of the file records.
    pub fn is_excluded(&self, key: &str) -> bool {
        let extension = extension(file_name(key));
        !extension.is_empty() && self.contains(extension)
    }
}

impl<'a> FromIterator<&'a str> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for extension in iter {
            set.insert(extension);
        }
        set
    }
}

impl fmt::Display for ExclusionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        write!(f, "{}", joined.join(","))
    }
}

/// The text after the last `.` of a file name, empty if there is none.
pub fn extension(file_name: &str) -> &str {
    file_name.rsplit_once('.').map_or("", |(_, ext)| ext)
}
