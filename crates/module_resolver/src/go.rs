//! Go resolution: the module path from `go.mod` maps an import onto a
//! project directory; anything else is tried as a directory suffix,
//! longest first, to accommodate nested-module layouts.

use crate::context::ResolverContext;

pub fn resolve(ctx: &ResolverContext, module: &str) -> Vec<String> {
    if !ctx.go_module_path.is_empty() {
        if module == ctx.go_module_path {
            if let Some(files) = ctx.go_files_by_dir.get("") {
                return files.clone();
            }
            return Vec::new();
        }
        if let Some(local) = module.strip_prefix(&format!("{}/", ctx.go_module_path)) {
            return ctx
                .go_files_by_dir
                .get(local)
                .cloned()
                .unwrap_or_default();
        }
    }

    // suffix walk: `example.com/repo/sub/pkg` may live at `sub/pkg`
    let segments: Vec<&str> = module.split('/').collect();
    for start in 1..segments.len() {
        let suffix = segments[start..].join("/");
        if let Some(files) = ctx.go_files_by_dir.get(&suffix) {
            return files.clone();
        }
    }
    Vec::new()
}

#[cfg(test)]
mod test {
    use lang_parsers::{parse_with_language, Language};
    use pretty_assertions::assert_eq;

    use crate::context::{ResolverContext, ResolverInputs};

    use super::*;

    fn ctx_for(files: &[(&str, &str)], module_path: &str) -> ResolverContext {
        let parsed: Vec<_> = files
            .iter()
            .map(|(p, src)| parse_with_language(p, src, Language::Go))
            .collect();
        let inputs = ResolverInputs {
            go_module_path: Some(module_path.to_string()),
            ..Default::default()
        };
        ResolverContext::build(&parsed, &inputs)
    }

    #[test]
    fn module_path_prefix() {
        let ctx = ctx_for(
            &[
                ("pkg/util/strings.go", "package util\n"),
                ("pkg/util/strings_test.go", "package util\n"),
            ],
            "example.com/acme/svc",
        );
        assert_eq!(
            resolve(&ctx, "example.com/acme/svc/pkg/util"),
            vec!["pkg/util/strings.go"]
        );
    }

    #[test]
    fn suffix_walk_for_nested_modules() {
        let ctx = ctx_for(
            &[("tools/gen/main.go", "package main\n")],
            "example.com/acme/svc",
        );
        assert_eq!(
            resolve(&ctx, "example.com/other/tools/gen"),
            vec!["tools/gen/main.go"]
        );
    }

    #[test]
    fn external_modules_resolve_empty() {
        let ctx = ctx_for(&[("main.go", "package main\n")], "example.com/acme/svc");
        assert!(resolve(&ctx, "github.com/gin-gonic/gin").is_empty());
    }
}
