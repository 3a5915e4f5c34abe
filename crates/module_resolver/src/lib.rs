//! The polyglot import resolver.
//!
//! `resolve_edge` translates an `(importing file, module reference)` pair
//! into the set of concrete project files the reference may denote. It is
//! pure: the answer depends only on the pre-built [`ResolverContext`] and
//! its arguments, never on the filesystem. References that leave the
//! project (framework packages, registry dependencies, the standard
//! libraries) resolve to the empty set, which is an answer, not an error.

mod context;
mod generic;
mod go;
mod java;
mod js;
pub mod paths;
mod python;
mod rust_mod;

pub use context::{AliasScope, ResolverContext, ResolverInputs, WorkspacePackage};
pub use js::split_package_reference;

use lang_parsers::{ImportEdge, Language, ParsedFile};

/// Resolves one import edge. `framework_filter` carries the language's
/// external-prefix list from the knowledge base; matching references are
/// external by definition.
pub fn resolve_edge(
    ctx: &ResolverContext,
    file: &ParsedFile,
    edge: &ImportEdge,
    framework_filter: &[String],
) -> Vec<String> {
    // glob references are expanded against the file list by the walker,
    // not resolved per call
    if edge.is_glob {
        return Vec::new();
    }

    match file.language {
        Language::Javascript | Language::Typescript => {
            js::resolve(ctx, &file.path, &edge.module)
        }
        Language::Python => python::resolve(ctx, &file.path, &edge.module, edge.symbol.as_deref()),
        Language::Java | Language::Kotlin => java::resolve(ctx, edge, framework_filter),
        Language::Go => go::resolve(ctx, &edge.module),
        Language::Rust => rust_mod::resolve(ctx, &file.path, edge),
        _ => {
            // the filter applies before any generic strategy
            if framework_filter
                .iter()
                .any(|p| edge.module.starts_with(p))
            {
                return Vec::new();
            }
            generic::resolve(ctx, &file.path, edge, file.language)
        }
    }
}

#[cfg(test)]
mod test {
    use lang_parsers::{parse_with_language, ImportKind, Language};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn resolver_is_pure_and_glob_edges_defer() {
        let files = vec![
            parse_with_language("src/index.ts", "", Language::Typescript),
            parse_with_language("src/util.ts", "", Language::Typescript),
        ];
        let ctx = ResolverContext::build(&files, &ResolverInputs::default());
        let file = &files[0];
        let edge = ImportEdge::new("./util", ImportKind::Relative, 1);

        let first = resolve_edge(&ctx, file, &edge, &[]);
        let second = resolve_edge(&ctx, file, &edge, &[]);
        assert_eq!(first, second);
        assert_eq!(first, vec!["src/util.ts"]);

        let glob = ImportEdge::new("./modules/*", ImportKind::Glob, 1);
        assert!(glob.is_glob);
        assert!(resolve_edge(&ctx, file, &glob, &[]).is_empty());
    }
}
