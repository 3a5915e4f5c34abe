//! Python resolution. Absolute dotted paths convert to directories with
//! `module.py` / `package/__init__.py` probing, shortened one segment at
//! a time (`from pkg.sub import name` may name a symbol in `pkg/sub.py`),
//! and retried under the common monorepo prefixes. Relative imports
//! ascend one directory per extra leading dot.

use crate::context::ResolverContext;
use crate::paths::{dirname, join_normalize};

const LAYOUT_PREFIXES: &[&str] = &["", "src/", "app/", "lib/"];

pub fn resolve(
    ctx: &ResolverContext,
    from_path: &str,
    module: &str,
    symbol: Option<&str>,
) -> Vec<String> {
    if let Some(stripped) = module.strip_prefix('.') {
        resolve_relative(ctx, from_path, stripped, symbol)
    } else {
        resolve_absolute(ctx, module, symbol)
    }
}

/// `module` arrives with the first dot already removed: `""` for
/// `from . import x`, `".sub"` would arrive as `"sub"` prefixed dots
/// consumed here one directory at a time.
fn resolve_relative(
    ctx: &ResolverContext,
    from_path: &str,
    mut rest: &str,
    symbol: Option<&str>,
) -> Vec<String> {
    let mut dir = dirname(from_path).to_string();
    while let Some(stripped) = rest.strip_prefix('.') {
        rest = stripped;
        match join_normalize(&dir, "..") {
            Some(parent) => dir = parent,
            None => return Vec::new(),
        }
    }

    let mut base = dir;
    if !rest.is_empty() {
        let Some(joined) = join_normalize(&base, &rest.replace('.', "/")) else {
            return Vec::new();
        };
        base = joined;
    }

    // `from .pkg import name`: name may be a symbol in the package or a
    // submodule of it, so both probes apply
    let mut hits = probe_module(ctx, &base);
    if let Some(symbol) = symbol {
        if let Some(joined) = join_normalize(&base, symbol) {
            hits.extend(probe_module(ctx, &joined));
        }
    }
    hits
}

fn resolve_absolute(ctx: &ResolverContext, module: &str, symbol: Option<&str>) -> Vec<String> {
    let segments: Vec<&str> = module.split('.').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Vec::new();
    }

    for prefix in LAYOUT_PREFIXES {
        // the full dotted path, plus the imported symbol as a possible
        // submodule of it
        let full = format!("{prefix}{}", segments.join("/"));
        let mut hits = probe_module(ctx, &full);
        if let Some(symbol) = symbol {
            hits.extend(probe_module(ctx, &format!("{full}/{symbol}")));
        }
        if !hits.is_empty() {
            return hits;
        }
        // then shorten one step at a time
        for take in (1..segments.len()).rev() {
            let shortened = format!("{prefix}{}", segments[..take].join("/"));
            let hits = probe_module(ctx, &shortened);
            if !hits.is_empty() {
                return hits;
            }
        }
    }
    Vec::new()
}

/// `a/b/c` may be the module `a/b/c.py` or the package `a/b/c/__init__.py`.
fn probe_module(ctx: &ResolverContext, base: &str) -> Vec<String> {
    let as_module = format!("{base}.py");
    if ctx.file_set.contains(&as_module) {
        return vec![as_module];
    }
    let as_package = format!("{base}/__init__.py");
    if ctx.file_set.contains(&as_package) {
        return vec![as_package];
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
            .map(|p| parse_with_language(p, "", Language::Python))
            .collect();
        ResolverContext::build(&files, &ResolverInputs::default())
    }

    #[test]
    fn absolute_dotted_with_init() {
        let ctx = ctx_for(&["pkg/__init__.py", "pkg/sub.py", "src/tool/core.py"]);
        assert_eq!(resolve(&ctx, "main.py", "pkg.sub", None), vec!["pkg/sub.py"]);
        assert_eq!(
            resolve(&ctx, "main.py", "pkg", None),
            vec!["pkg/__init__.py"]
        );
        // src/ layout prefix
        assert_eq!(
            resolve(&ctx, "main.py", "tool.core", None),
            vec!["src/tool/core.py"]
        );
    }

    #[test]
    fn shortening_finds_symbol_homes() {
        let ctx = ctx_for(&["pkg/sub.py"]);
        // `import pkg.sub.name` style reference where name is a symbol
        assert_eq!(
            resolve(&ctx, "main.py", "pkg.sub.name", None),
            vec!["pkg/sub.py"]
        );
    }

    #[test]
    fn relative_dots_ascend() {
        let ctx = ctx_for(&["app/__init__.py", "app/sub.py", "app/deep/inner.py", "top.py"]);
        // from .sub import x  (inside app/__init__.py)
        assert_eq!(
            resolve(&ctx, "app/__init__.py", ".sub", None),
            vec!["app/sub.py"]
        );
        // from . import sub
        assert_eq!(
            resolve(&ctx, "app/deep/inner.py", "..sub", None),
            vec!["app/sub.py"]
        );
        // from . import x resolving via the symbol
        assert_eq!(
            resolve(&ctx, "app/sub.py", ".", Some("deep")),
            vec!["app/__init__.py"]
        );
    }

    #[test]
    fn symbol_submodule_is_additional() {
        let ctx = ctx_for(&["app/plugins/__init__.py", "app/plugins/redis.py"]);
        assert_eq!(
            resolve(&ctx, "app/main.py", ".plugins", Some("redis")),
            vec!["app/plugins/__init__.py", "app/plugins/redis.py"]
        );
        let ctx = ctx_for(&["app/plugins/redis.py"]);
        assert_eq!(
            resolve(&ctx, "app/main.py", ".plugins", Some("redis")),
            vec!["app/plugins/redis.py"]
        );
    }
}
