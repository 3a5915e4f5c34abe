//! Rust resolution. `mod foo;` follows the module-tree rules: files named
//! `mod.rs`/`lib.rs`/`main.rs` look for siblings (2015 layout), any other
//! file looks under a directory named after its own stem (2018 layout).
//! `use crate::...` / `self::` / `super::` paths are followed one segment
//! deep as reinforcement; external crates resolve to nothing.

use crate::context::ResolverContext;
use crate::paths::{basename, dirname, join_normalize, strip_ext};
use lang_parsers::{ImportEdge, ImportKind};

pub fn resolve(ctx: &ResolverContext, from_path: &str, edge: &ImportEdge) -> Vec<String> {
    match edge.kind {
        ImportKind::Mod => resolve_mod(ctx, from_path, &edge.module),
        ImportKind::Use => resolve_use(ctx, from_path, &edge.module),
        ImportKind::Include | ImportKind::Embed => {
            match join_normalize(dirname(from_path), &edge.module) {
                Some(candidate) if ctx.file_set.contains(&candidate) => vec![candidate],
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

fn is_module_root(file_path: &str) -> bool {
    matches!(basename(file_path), "mod.rs" | "lib.rs" | "main.rs")
}

fn resolve_mod(ctx: &ResolverContext, from_path: &str, name: &str) -> Vec<String> {
    let dir = dirname(from_path);
    let base = if is_module_root(from_path) {
        // 2015: `src/lib.rs` owns `src/foo.rs` / `src/foo/mod.rs`
        dir.to_string()
    } else {
        // 2018: `src/nameres.rs` owns `src/nameres/foo.rs`
        let stem = strip_ext(basename(from_path));
        if dir.is_empty() {
            stem.to_string()
        } else {
            format!("{dir}/{stem}")
        }
    };

    let flat = if base.is_empty() {
        format!("{name}.rs")
    } else {
        format!("{base}/{name}.rs")
    };
    if ctx.file_set.contains(&flat) {
        return vec![flat];
    }
    let nested = if base.is_empty() {
        format!("{name}/mod.rs")
    } else {
        format!("{base}/{name}/mod.rs")
    };
    if ctx.file_set.contains(&nested) {
        return vec![nested];
    }
    Vec::new()
}

fn resolve_use(ctx: &ResolverContext, from_path: &str, path: &str) -> Vec<String> {
    let mut segments = path.split("::");
    let first = segments.next().unwrap_or("");
    let second = segments.next();

    match first {
        "crate" => {
            let Some(second) = second else {
                return Vec::new();
            };
            let Some(root) = crate_root_of(ctx, from_path) else {
                return Vec::new();
            };
            probe_segment(ctx, &root, second)
        }
        "self" => {
            let Some(second) = second else {
                return Vec::new();
            };
            resolve_mod(ctx, from_path, second)
        }
        "super" => {
            let Some(second) = second else {
                return Vec::new();
            };
            let parent = match join_normalize(dirname(from_path), "..") {
                Some(p) => p,
                None => return Vec::new(),
            };
            probe_segment(ctx, &parent, second)
        }
        // an external crate, or a same-crate item path the mod tree
        // already covers
        _ => Vec::new(),
    }
}

/// Nearest ancestor directory containing `lib.rs` or `main.rs`.
fn crate_root_of(ctx: &ResolverContext, from_path: &str) -> Option<String> {
    let mut dir = dirname(from_path).to_string();
    loop {
        if ctx.rust_crate_roots.contains(&dir) {
            return Some(dir);
        }
        if dir.is_empty() {
            return None;
        }
        dir = dirname(&dir).to_string();
    }
}

fn probe_segment(ctx: &ResolverContext, dir: &str, name: &str) -> Vec<String> {
    let flat = if dir.is_empty() {
        format!("{name}.rs")
    } else {
        format!("{dir}/{name}.rs")
    };
    if ctx.file_set.contains(&flat) {
        return vec![flat];
    }
    let nested = if dir.is_empty() {
        format!("{name}/mod.rs")
    } else {
        format!("{dir}/{name}/mod.rs")
    };
    if ctx.file_set.contains(&nested) {
        return vec![nested];
    }
    Vec::new()
}

#[cfg(test)]
mod test {
    use lang_parsers::{parse_with_language, Language};
    use pretty_assertions::assert_eq;

    use crate::context::{ResolverContext, ResolverInputs};

    use super::*;

    fn ctx_for(paths: &[&str]) -> ResolverContext {
        let files: Vec<_> = paths
            .iter()
            .map(|p| parse_with_language(p, "", Language::Rust))
            .collect();
        ResolverContext::build(&files, &ResolverInputs::default())
    }

    fn mod_edge(name: &str) -> ImportEdge {
        ImportEdge::new(name, ImportKind::Mod, 1)
    }

    #[test]
    fn edition_2015_from_module_roots() {
        let ctx = ctx_for(&["src/main.rs", "src/collector.rs"]);
        assert_eq!(
            resolve(&ctx, "src/main.rs", &mod_edge("collector")),
            vec!["src/collector.rs"]
        );

        let ctx = ctx_for(&["src/walker/mod.rs", "src/walker/queue.rs"]);
        assert_eq!(
            resolve(&ctx, "src/walker/mod.rs", &mod_edge("queue")),
            vec!["src/walker/queue.rs"]
        );
    }

    #[test]
    fn edition_2018_from_plain_files() {
        let ctx = ctx_for(&["src/nameres.rs", "src/nameres/collector.rs"]);
        assert_eq!(
            resolve(&ctx, "src/nameres.rs", &mod_edge("collector")),
            vec!["src/nameres/collector.rs"]
        );
        let ctx = ctx_for(&["src/nameres.rs", "src/nameres/collector/mod.rs"]);
        assert_eq!(
            resolve(&ctx, "src/nameres.rs", &mod_edge("collector")),
            vec!["src/nameres/collector/mod.rs"]
        );
    }

    #[test]
    fn use_crate_paths_one_segment() {
        let ctx = ctx_for(&["src/main.rs", "src/walker.rs", "src/deep/inner.rs"]);
        let edge = ImportEdge::new("crate::walker::Walker", ImportKind::Use, 1);
        assert_eq!(
            resolve(&ctx, "src/deep/inner.rs", &edge),
            vec!["src/walker.rs"]
        );
        let external = ImportEdge::new("serde::Deserialize", ImportKind::Use, 1);
        assert!(resolve(&ctx, "src/main.rs", &external).is_empty());
    }
}
