//! Logical mapping resolution: turn a normalized path into physical
//! candidates using the configured virtual-prefix table.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::types::LogicalMapping;

/// Separator used in normalized paths and logical prefixes.
pub const SEPARATOR: char = '/';

/// Join a `/`-separated relative path onto a base. An empty remainder yields
/// the base itself rather than a trailing separator.
pub fn join_segments(base: &Path, relative: &str) -> PathBuf {
    let relative = relative.trim_start_matches(is_separator);
    if relative.is_empty() {
        return base.to_path_buf();
    }
    return base.join(relative);
}

/// Strip the leading separator from a logical path and normalize the rest to
/// `/`-separated form without a trailing separator.
fn logical_prefix(logical_path: &str) -> String {
    let stripped = logical_path.strip_prefix(is_separator).unwrap_or(logical_path);
    return stripped
        .replace('\\', "/")
        .trim_end_matches(SEPARATOR)
        .to_string();
}

/// Match a logical path against a normalized path.
///
/// Returns the remainder after the prefix when the path equals the prefix or
/// continues it at a segment boundary, so `/foo` matches `foo` and `foo/bar`
/// but never `foobar`. An empty prefix (the mapping `/`) matches everything.
pub fn match_logical_prefix<'a>(logical_path: &str, normalized: &'a str) -> Option<&'a str> {
    let path = normalized.trim_start_matches(is_separator);
    let prefix = logical_prefix(logical_path);

    if prefix.is_empty() {
        return Some(path);
    }
    if path == prefix {
        return Some("");
    }
    return path.strip_prefix(prefix.as_str())?.strip_prefix(SEPARATOR);
}

/// Compute the physical base directory of a mapping. A root-relative mapping
/// has no base when the location has no project root.
fn effective_base(mapping: &LogicalMapping, root: Option<&Path>) -> Option<PathBuf> {
    if mapping.is_physical() {
        return Some(PathBuf::from(&mapping.directory_path));
    }
    return root.map(|r| return join_segments(r, &mapping.directory_path));
}

/// Whether a character separates path segments in config or dotted input.
const fn is_separator(c: char) -> bool {
    return c == '/' || c == '\\';
}

/// Compute a physical candidate for every mapping whose logical prefix
/// matches `normalized`, in mapping-table order. Candidates are not checked
/// for existence.
pub fn resolve_mapping_candidates(
    mappings: &[LogicalMapping],
    root: Option<&Path>,
    normalized: &str,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    for mapping in mappings {
        let Some(remainder) = match_logical_prefix(&mapping.logical_path, normalized) else {
            continue;
        };
        let Some(base) = effective_base(mapping, root) else {
            debug!(
                logical_path = %mapping.logical_path,
                "mapping: root-relative mapping skipped, location has no project root"
            );
            continue;
        };

        let candidate = join_segments(&base, remainder);
        debug!(
            logical_path = %mapping.logical_path,
            candidate = %candidate.display(),
            "mapping: prefix matched"
        );
        candidates.push(candidate);
    }

    return candidates;
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;

    fn physical(logical: &str, dir: &str) -> LogicalMapping {
        return LogicalMapping {
            directory_path: dir.to_string(),
            is_physical_directory_path: None,
            logical_path: logical.to_string(),
        };
    }

    fn root_relative(logical: &str, dir: &str) -> LogicalMapping {
        return LogicalMapping {
            directory_path: dir.to_string(),
            is_physical_directory_path: Some(false),
            logical_path: logical.to_string(),
        };
    }

    #[test]
    fn prefix_rejects_false_collisions() {
        assert_eq!(match_logical_prefix("/foo", "/foobar/baz"), None);
        assert_eq!(match_logical_prefix("/foo", "foobar"), None);
        assert_eq!(match_logical_prefix("/foo", "/foo"), Some(""));
        assert_eq!(match_logical_prefix("/foo", "/foo/bar"), Some("bar"));
        assert_eq!(match_logical_prefix("/foo", "foo/bar/Baz"), Some("bar/Baz"));
    }

    #[test]
    fn prefix_accepts_backslashes_and_trailing_separator() {
        assert_eq!(match_logical_prefix("\\lib\\util", "lib/util/Str"), Some("Str"));
        assert_eq!(match_logical_prefix("/lib/", "lib/Str"), Some("Str"));
    }

    #[test]
    fn slash_mapping_matches_everything() {
        assert_eq!(match_logical_prefix("/", "a/b"), Some("a/b"));
    }

    #[test]
    fn physical_mapping_joins_remainder() {
        let mappings = vec![physical("/models", "/srv/shared/models")];
        let candidates = resolve_mapping_candidates(&mappings, None, "models/user/User");
        assert_eq!(candidates, vec![PathBuf::from("/srv/shared/models/user/User")]);
    }

    #[test]
    fn exact_match_yields_the_base_directory() {
        let mappings = vec![physical("/models", "/srv/models")];
        let candidates = resolve_mapping_candidates(&mappings, None, "models");
        assert_eq!(candidates, vec![PathBuf::from("/srv/models")]);
    }

    #[test]
    fn root_relative_mapping_resolves_against_root() {
        let mappings = vec![root_relative("/lib", "/vendor/lib")];
        let candidates =
            resolve_mapping_candidates(&mappings, Some(Path::new("/work/app")), "lib/Str");
        assert_eq!(candidates, vec![PathBuf::from("/work/app/vendor/lib/Str")]);
    }

    #[test]
    fn root_relative_mapping_without_root_is_skipped() {
        let mappings = vec![
            root_relative("/lib", "vendor/lib"),
            physical("/lib", "/opt/lib"),
        ];
        let candidates = resolve_mapping_candidates(&mappings, None, "lib/Str");
        assert_eq!(candidates, vec![PathBuf::from("/opt/lib/Str")]);
    }

    #[test]
    fn all_matching_mappings_are_returned_in_table_order() {
        let mappings = vec![
            physical("/a", "/one"),
            physical("/b", "/unrelated"),
            physical("/a/b", "/two"),
            physical("/", "/three"),
        ];
        let candidates = resolve_mapping_candidates(&mappings, None, "a/b/C");
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/one/b/C"),
                PathBuf::from("/two/C"),
                PathBuf::from("/three/a/b/C"),
            ]
        );
    }

    #[test]
    fn empty_table_yields_no_candidates() {
        assert!(resolve_mapping_candidates(&[], Some(Path::new("/r")), "a/b").is_empty());
    }
}
