//! Directory prefix derivation from object keys.

/// Yield every proper ancestor directory of a slash-delimited key.
///
/// For a key with `n` segments this yields the joins of the first `1..n`
/// segments, shortest first. The final segment (the file name) is never
/// part of the output, so keys without `/` yield nothing. The prefixes are
/// sub-slices of `key`; nothing is allocated.
///
/// # Example
///
/// ```
/// use sl_lister::ancestor_prefixes;
///
/// let dirs: Vec<&str> = ancestor_prefixes("a/b/c/file.txt").collect();
/// assert_eq!(dirs, ["a", "a/b", "a/b/c"]);
///
/// assert_eq!(ancestor_prefixes("readme.txt").count(), 0);
/// ```
pub fn ancestor_prefixes(key: &str) -> impl Iterator<Item = &str> + '_ {
    key.match_indices('/').map(move |(idx, _)| &key[..idx])
}

/// The final path segment of a key.
pub fn file_name(key: &str) -> &str {
    key.rsplit_once('/').map_or(key, |(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_key() {
        let dirs: Vec<&str> = ancestor_prefixes("a/b/c/file.txt").collect();
        assert_eq!(dirs, vec!["a", "a/b", "a/b/c"]);
        assert!(!dirs.contains(&"a/b/c/file.txt"));
    }

    #[test]
    fn test_top_level_key() {
        assert_eq!(ancestor_prefixes("readme.txt").count(), 0);
    }

    #[test]
    fn test_directory_marker_key() {
        let dirs: Vec<&str> = ancestor_prefixes("a/b/").collect();
        assert_eq!(dirs, vec!["a", "a/b"]);
    }

    #[test]
    fn test_empty_segments_are_kept() {
        let dirs: Vec<&str> = ancestor_prefixes("a//b").collect();
        assert_eq!(dirs, vec!["a", "a/"]);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("a/b/c/file.txt"), "file.txt");
        assert_eq!(file_name("readme.txt"), "readme.txt");
        assert_eq!(file_name("a/b/"), "");
    }
}
