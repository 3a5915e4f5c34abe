//! Resolution for the long tail of languages: file-relative inclusion
//! (Ruby, PHP, Erlang, Zig, F#, VB scripts), Ruby's `lib/` convention,
//! Perl `Foo::Bar` module paths and OCaml module-name lookup. Languages
//! whose references never name project files resolve to nothing.

use crate::context::ResolverContext;
use crate::paths::{dirname, extension, join_normalize};
use lang_parsers::{ImportEdge, ImportKind, Language};

/// Default extension probed when a file-relative reference omits it.
fn default_extension(language: Language) -> Option<&'static str> {
    match language {
        Language::Ruby => Some("rb"),
        Language::Php => Some("php"),
        Language::Perl => Some("pl"),
        Language::Erlang => Some("hrl"),
        Language::Fsharp => Some("fsx"),
        _ => None,
    }
}

pub fn resolve(ctx: &ResolverContext, from_path: &str, edge: &ImportEdge, language: Language) -> Vec<String> {
    match edge.kind {
        ImportKind::Include | ImportKind::Embed | ImportKind::Relative => {
            resolve_file_relative(ctx, from_path, &edge.module, language)
        }
        ImportKind::Require if language == Language::Ruby => {
            resolve_ruby_require(ctx, &edge.module)
        }
        ImportKind::Absolute if language == Language::Perl => {
            resolve_perl_module(ctx, &edge.module)
        }
        ImportKind::Open if matches!(language, Language::Ocaml | Language::Fsharp) => {
            resolve_ml_module(ctx, &edge.module)
        }
        _ => Vec::new(),
    }
}

fn resolve_file_relative(
    ctx: &ResolverContext,
    from_path: &str,
    module: &str,
    language: Language,
) -> Vec<String> {
    let reference = module.trim_start_matches('/');
    let bases = [
        join_normalize(dirname(from_path), module),
        // PHP's `__DIR__ . '/x.php'` and absolute-style includes are
        // project-root anchored once the leading slash is gone
        Some(reference.to_string()),
    ];
    for base in bases.into_iter().flatten() {
        if ctx.file_set.contains(&base) {
            return vec![base];
        }
        if extension(&base).is_none() {
            if let Some(ext) = default_extension(language) {
                let with_ext = format!("{base}.{ext}");
                if ctx.file_set.contains(&with_ext) {
                    return vec![with_ext];
                }
            }
        }
    }
    Vec::new()
}

/// `require 'widget'` loads from the load path; `lib/` is the
/// conventional project root for it.
fn resolve_ruby_require(ctx: &ResolverContext, module: &str) -> Vec<String> {
    for candidate in [format!("lib/{module}.rb"), format!("{module}.rb")] {
        if ctx.file_set.contains(&candidate) {
            return vec![candidate];
        }
    }
    Vec::new()
}

/// `Foo::Bar` -> `Foo/Bar.pm`, tried at the root, under `lib/`, then by
/// basename.
fn resolve_perl_module(ctx: &ResolverContext, module: &str) -> Vec<String> {
    let rel = module.replace("::", "/");
    for candidate in [format!("{rel}.pm"), format!("lib/{rel}.pm")] {
        if ctx.file_set.contains(&candidate) {
            return vec![candidate];
        }
    }
    let base = module.rsplit("::").next().unwrap_or(module);
    ctx.suffix_index
        .get(&format!("{base}.pm"))
        .cloned()
        .unwrap_or_default()
}

/// OCaml/F# `open Str_util` -> `str_util.ml`: lowercase the first letter
/// and look the basename up.
fn resolve_ml_module(ctx: &ResolverContext, module: &str) -> Vec<String> {
    let simple = module.split('.').next_back().unwrap_or(module);
    let mut chars = simple.chars();
    let file_stem = match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_lowercase(), chars.as_str()),
        None => return Vec::new(),
    };
    let mut hits = Vec::new();
    for ext in ["ml", "fs"] {
        if let Some(paths) = ctx.suffix_index.get(&format!("{file_stem}.{ext}")) {
            hits.extend(paths.iter().cloned());
        }
    }
    hits
}

#[cfg(test)]
mod test {
    use lang_parsers::{parse_with_language, Language};
    use pretty_assertions::assert_eq;

    use crate::context::{ResolverContext, ResolverInputs};

    use super::*;

    fn ctx_for(paths: &[(&str, Language)]) -> ResolverContext {
        let files: Vec<_> = paths
            .iter()
            .map(|(p, lang)| parse_with_language(p, "", *lang))
            .collect();
        ResolverContext::build(&files, &ResolverInputs::default())
    }

    #[test]
    fn ruby_require_relative_probes_extension() {
        let ctx = ctx_for(&[("app/widget.rb", Language::Ruby), ("app/lib/helper.rb", Language::Ruby)]);
        let edge = ImportEdge::new("lib/helper", ImportKind::Relative, 1);
        assert_eq!(
            resolve(&ctx, "app/widget.rb", &edge, Language::Ruby),
            vec!["app/lib/helper.rb"]
        );
    }

    #[test]
    fn perl_module_paths() {
        let ctx = ctx_for(&[("lib/My/Helper.pm", Language::Perl)]);
        let edge = ImportEdge::new("My::Helper", ImportKind::Absolute, 1);
        assert_eq!(
            resolve(&ctx, "tool.pl", &edge, Language::Perl),
            vec!["lib/My/Helper.pm"]
        );
    }

    #[test]
    fn ocaml_open_lowercases_module() {
        let ctx = ctx_for(&[("src/str_util.ml", Language::Ocaml)]);
        let edge = ImportEdge::new("Str_util", ImportKind::Open, 1);
        assert_eq!(
            resolve(&ctx, "src/main.ml", &edge, Language::Ocaml),
            vec!["src/str_util.ml"]
        );
    }
}
