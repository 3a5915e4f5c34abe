//! String-level path arithmetic over root-relative POSIX paths.

use relative_path::RelativePath;

pub fn dirname(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    }
}

pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// The path without its final extension; the whole path when the
/// basename has none.
pub fn strip_ext(path: &str) -> &str {
    let base = basename(path);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => &path[..path.len() - (base.len() - stem.len())],
        _ => path,
    }
}

pub fn extension(path: &str) -> Option<&str> {
    let base = basename(path);
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => Some(ext),
        _ => None,
    }
}

/// Joins `rel` onto `base_dir` and normalizes `.`/`..` segments. `None`
/// when the result would escape the project root.
pub fn join_normalize(base_dir: &str, rel: &str) -> Option<String> {
    let joined = RelativePath::new(base_dir)
        .join(RelativePath::new(rel))
        .normalize();
    let joined = joined.as_str();
    if joined == ".." || joined.starts_with("../") {
        return None;
    }
    // normalize() leaves "" for the root and never a leading "./"
    Some(joined.trim_start_matches("./").to_string())
}

/// True for basenames the resolver refuses to resurrect (`dead-*`,
/// `legacy-*`, ...).
pub fn is_dead_named(name: &str) -> bool {
    const PREFIXES: &[&str] = &["dead-", "deprecated-", "legacy-", "old-", "unused-"];
    PREFIXES.iter().any(|p| name.starts_with(p))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn join_and_normalize() {
        assert_eq!(join_normalize("src/app", "../util").as_deref(), Some("src/util"));
        assert_eq!(join_normalize("", "./x").as_deref(), Some("x"));
        assert_eq!(join_normalize("src", "../../evil"), None);
        assert_eq!(join_normalize("a/b", "./c/d").as_deref(), Some("a/b/c/d"));
    }

    #[test]
    fn extension_handling() {
        assert_eq!(strip_ext("src/foo.ts"), "src/foo");
        assert_eq!(strip_ext("src/foo.ios.ts"), "src/foo.ios");
        assert_eq!(strip_ext("src/.hidden"), "src/.hidden");
        assert_eq!(extension("src/foo.ts"), Some("ts"));
        assert_eq!(extension("Makefile"), None);
    }
}
