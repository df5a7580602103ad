//! Path normalization for cross-dataset comparison.
//!
//! The verifier and the graph exporter disagree on how many directories
//! precede the source root (`proj/proj/src/lib.rs` vs `proj/src/lib.rs`).
//! Anchoring every path at its `src` segment makes both sides comparable
//! without knowing either side's root convention.

/// Scheme prefix emitted by some exporters.
const FILE_SCHEME: &str = "file://";

/// Segment name treated as the source root anchor.
const SRC_ROOT: &str = "src";

/// Canonicalize a path so it starts at its source root.
///
/// - `file://` prefixes are stripped
/// - everything before the first `src/` directory is dropped
/// - a path whose last segment is `src` is cut to `src`
/// - paths without a `src` anchor are returned unchanged
///
/// Total and idempotent: `normalize(&normalize(p)) == normalize(p)`.
pub fn normalize(path: &str) -> String {
    anchor(strip_scheme(path)).to_string()
}

fn strip_scheme(mut path: &str) -> &str {
    while let Some(rest) = path.strip_prefix(FILE_SCHEME) {
        path = rest;
    }
    path
}

fn anchor(path: &str) -> &str {
    // Already anchored. Checked first so a nested src/ directory further down
    // does not move the anchor on a second pass.
    if path.strip_prefix(SRC_ROOT).is_some_and(|rest| rest.starts_with('/')) {
        return path;
    }

    if let Some(idx) = path.find("/src/") {
        return &path[idx + 1..];
    }

    let mut offset = 0;
    for segment in path.split('/') {
        if segment == SRC_ROOT {
            return &path[offset..];
        }
        offset += segment.len() + 1;
    }

    path
}

/// Loose location match used by the fuzzy resolver tier:
/// either normalized path contains the other.
pub fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_duplicated_project_dirs() {
        assert_eq!(normalize("proj/proj/src/a/b.rs"), "src/a/b.rs");
        assert_eq!(
            normalize("curve25519-dalek/curve25519-dalek/src/lemmas/field.rs"),
            "src/lemmas/field.rs"
        );
        assert_eq!(normalize("/home/ci/work/crate/src/lib.rs"), "src/lib.rs");
    }

    #[test]
    fn test_strips_file_scheme() {
        assert_eq!(normalize("file:///tmp/proj/src/main.rs"), "src/main.rs");
        assert_eq!(normalize("file://notes.txt"), "notes.txt");
    }

    #[test]
    fn test_no_anchor_passthrough() {
        assert_eq!(normalize("no/anchor/here.rs"), "no/anchor/here.rs");
        assert_eq!(normalize(""), "");
        // "srcs" is not a source root
        assert_eq!(normalize("a/srcs/b.rs"), "a/srcs/b.rs");
    }

    #[test]
    fn test_trailing_src_segment() {
        assert_eq!(normalize("proj/src"), "src");
        assert_eq!(normalize("src"), "src");
    }

    #[test]
    fn test_first_src_wins() {
        assert_eq!(normalize("a/src/b/src/c.rs"), "src/b/src/c.rs");
    }

    #[test]
    fn test_idempotent() {
        let paths = [
            "proj/proj/src/a/b.rs",
            "src/a/b.rs",
            "a/src/b/src/c.rs",
            "src/a/src/b.rs",
            "file://file://x/src/y.rs",
            "file://file://plain",
            "no/anchor/here.rs",
            "proj/src",
            "/src/lib.rs",
            "",
        ];
        for p in paths {
            let once = normalize(p);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", p);
        }
    }

    #[test]
    fn test_overlaps() {
        assert!(overlaps("src/field.rs", "src/field.rs"));
        assert!(overlaps("src/backend/field.rs", "backend/field.rs"));
        assert!(overlaps("field.rs", "src/field.rs"));
        assert!(!overlaps("src/a.rs", "src/b.rs"));
    }
}
