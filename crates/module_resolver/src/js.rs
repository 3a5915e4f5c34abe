//! JavaScript / TypeScript resolution, in strategy order: relative path
//! arithmetic, tsconfig path aliases (nearest scope, longest alias),
//! workspace packages (exports map with dist->src rewrites), tsconfig
//! baseUrl, then extension-less / index / platform-suffix probing.
//! Anything that survives none of these is an external dependency and
//! resolves to the empty set.

use crate::context::{ResolverContext, WorkspacePackage};
use crate::paths::{dirname, extension, join_normalize, strip_ext};

const SOURCE_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts", "vue", "svelte",
];
const PLATFORM_SUFFIXES: &[&str] = &[".ios", ".android", ".web", ".native"];

/// Conventional fallbacks probed when a workspace package has no usable
/// entry in its manifest.
const PACKAGE_ENTRY_FALLBACKS: &[&str] = &["src/main", "src/app", "src/server", "index", "src/entry"];

pub fn resolve(ctx: &ResolverContext, from_path: &str, module: &str) -> Vec<String> {
    if is_asset_reference(module) {
        return Vec::new();
    }

    // 1. relative and root-absolute references
    if module.starts_with('.') {
        let Some(candidate) = join_normalize(dirname(from_path), module) else {
            return Vec::new();
        };
        return probe(ctx, &candidate);
    }
    if let Some(rooted) = module.strip_prefix('/') {
        return probe(ctx, rooted);
    }

    // 2. path aliases, nearest scope first, longest alias first
    for scope in ctx.scopes_for(from_path) {
        for (alias, targets) in &scope.aliases {
            let rest = if module == alias {
                Some("")
            } else {
                module.strip_prefix(&format!("{alias}/"))
            };
            let Some(rest) = rest else { continue };
            for target in targets {
                let candidate = if rest.is_empty() {
                    target.clone()
                } else {
                    format!("{target}/{rest}")
                };
                let hits = probe(ctx, &candidate);
                if !hits.is_empty() {
                    return hits;
                }
            }
        }
    }

    // 3. workspace packages
    let (package_name, sub_path) = split_package_reference(module);
    if let Some(package) = ctx.workspace_packages.get(package_name) {
        let hits = resolve_in_package(ctx, package, sub_path);
        if !hits.is_empty() {
            return hits;
        }
    }

    // 4. tsconfig baseUrl of the nearest scope
    for scope in ctx.scopes_for(from_path) {
        if let Some(base) = &scope.base_url {
            if let Some(candidate) = join_normalize(base, module) {
                let hits = probe(ctx, &candidate);
                if !hits.is_empty() {
                    return hits;
                }
            }
        }
    }

    // 5. external
    Vec::new()
}

/// Stylesheets, images and other non-source assets never participate in
/// reachability.
fn is_asset_reference(module: &str) -> bool {
    const ASSET_EXTENSIONS: &[&str] = &[
        "css", "scss", "sass", "less", "svg", "png", "jpg", "jpeg", "gif", "ico", "bmp",
        "woff", "woff2", "ttf", "eot", "mp4", "webm", "graphql", "gql", "md",
    ];
    match extension(module) {
        Some(ext) => ASSET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// `@org/name/sub/path` -> (`@org/name`, `sub/path`); unscoped references
/// split after the first segment.
pub fn split_package_reference(module: &str) -> (&str, &str) {
    let mut indices = module.match_indices('/').map(|(i, _)| i);
    let split_at = if module.starts_with('@') {
        indices.nth(1)
    } else {
        indices.next()
    };
    match split_at {
        Some(i) => (&module[..i], &module[i + 1..]),
        None => (module, ""),
    }
}

fn resolve_in_package(
    ctx: &ResolverContext,
    package: &WorkspacePackage,
    sub_path: &str,
) -> Vec<String> {
    if !sub_path.is_empty() {
        // exports map first, with compiled->source rewrites
        for (subpath, target) in &package.exports_map {
            if subpath != sub_path {
                continue;
            }
            for rewritten in rewrite_candidates(target) {
                if let Some(candidate) = join_normalize(&package.dir, &rewritten) {
                    let hits = probe(ctx, &candidate);
                    if !hits.is_empty() {
                        return hits;
                    }
                }
            }
        }
        // conventional source layouts
        for prefix in ["src/", ""] {
            if let Some(candidate) =
                join_normalize(&package.dir, &format!("{prefix}{sub_path}"))
            {
                let hits = probe(ctx, &candidate);
                if !hits.is_empty() {
                    return hits;
                }
            }
        }
        return Vec::new();
    }

    // bare package import: declared entry points, root export targets,
    // then conventional fallbacks
    let declared = package.entry_points.iter().cloned();
    let root_exports = package
        .exports_map
        .iter()
        .filter(|(subpath, _)| subpath.is_empty())
        .map(|(_, target)| target.clone());
    for entry in declared.chain(root_exports) {
        for rewritten in rewrite_candidates(&entry) {
            if let Some(candidate) = join_normalize(&package.dir, &rewritten) {
                let hits = probe(ctx, &candidate);
                if !hits.is_empty() {
                    return hits;
                }
            }
        }
    }
    for fallback in PACKAGE_ENTRY_FALLBACKS {
        if let Some(candidate) = join_normalize(&package.dir, fallback) {
            let hits = probe(ctx, &candidate);
            if !hits.is_empty() {
                return hits;
            }
        }
    }
    Vec::new()
}

/// A compiled target (`dist/x.js`) may point at sources that live under
/// `src/` or at the package root.
fn rewrite_candidates(target: &str) -> Vec<String> {
    let target = target.trim_start_matches("./");
    let mut out = vec![target.to_string()];
    for compiled in ["dist/", "build/", "out/", "lib/"] {
        if let Some(rest) = target.strip_prefix(compiled) {
            out.push(format!("src/{rest}"));
            out.push(rest.to_string());
        }
    }
    out
}

/// Final normalisation: exact hit, extension-less, `/index` variants,
/// platform-specific suffixes.
fn probe(ctx: &ResolverContext, candidate: &str) -> Vec<String> {
    if ctx.file_set.contains(candidate) {
        return vec![candidate.to_string()];
    }

    let key = match extension(candidate) {
        Some(ext) if SOURCE_EXTENSIONS.contains(&ext) => strip_ext(candidate),
        Some(_) => return Vec::new(), // unknown extension, not source
        None => candidate,
    };

    if let Some(paths) = ctx.file_paths_no_ext.get(key) {
        return paths.clone();
    }
    if let Some(paths) = ctx.file_paths_no_ext.get(&format!("{key}/index")) {
        return paths.clone();
    }
    let mut platform_hits = Vec::new();
    for suffix in PLATFORM_SUFFIXES {
        if let Some(paths) = ctx.file_paths_no_ext.get(&format!("{key}{suffix}")) {
            platform_hits.extend(paths.iter().cloned());
        }
    }
    platform_hits
}

#[cfg(test)]
mod test {
    use lang_parsers::parse_with_language;
    use lang_parsers::Language;
    use pretty_assertions::assert_eq;

    use crate::context::{ResolverContext, ResolverInputs};

    use super::*;

    fn ctx_for(paths: &[&str], inputs: ResolverInputs) -> ResolverContext {
        let files: Vec<_> = paths
            .iter()
            .map(|p| {
                let lang = Language::from_path(p).unwrap_or(Language::Javascript);
                parse_with_language(p, "", lang)
            })
            .collect();
        ResolverContext::build(&files, &inputs)
    }

    #[test]
    fn relative_with_extension_probe() {
        let ctx = ctx_for(
            &["src/index.ts", "src/util.ts", "src/widgets/index.tsx"],
            ResolverInputs::default(),
        );
        assert_eq!(
            resolve(&ctx, "src/index.ts", "./util"),
            vec!["src/util.ts"]
        );
        assert_eq!(
            resolve(&ctx, "src/index.ts", "./widgets"),
            vec!["src/widgets/index.tsx"]
        );
        assert_eq!(
            resolve(&ctx, "src/index.ts", "./util.js"),
            vec!["src/util.ts"]
        );
    }

    #[test]
    fn platform_suffix_probe() {
        let ctx = ctx_for(
            &["src/Button.ios.tsx", "src/Button.android.tsx", "src/app.ts"],
            ResolverInputs::default(),
        );
        let mut hits = resolve(&ctx, "src/app.ts", "./Button");
        hits.sort();
        assert_eq!(hits, vec!["src/Button.android.tsx", "src/Button.ios.tsx"]);
    }

    #[test]
    fn scoped_package_split() {
        assert_eq!(split_package_reference("@org/a/x/y"), ("@org/a", "x/y"));
        assert_eq!(split_package_reference("@org/a"), ("@org/a", ""));
        assert_eq!(split_package_reference("lodash/fp"), ("lodash", "fp"));
        assert_eq!(split_package_reference("lodash"), ("lodash", ""));
    }

    #[test]
    fn aliases_longest_first_then_base_url() {
        use manifests::TsconfigJson;

        let tsconfig = TsconfigJson::parse(
            r#"{
                "compilerOptions": {
                    "baseUrl": ".",
                    "paths": {
                        "@app/*": ["src/app/*"],
                        "@app/util/*": ["src/shared/util/*"]
                    }
                }
            }"#,
        )
        .unwrap();
        let inputs = ResolverInputs {
            tsconfigs: vec![(String::new(), tsconfig)],
            ..Default::default()
        };
        let ctx = ctx_for(
            &[
                "src/app/feature.ts",
                "src/shared/util/fmt.ts",
                "src/consumer.ts",
                "src/base/rooted.ts",
            ],
            inputs,
        );

        // the longer alias shadows the shorter prefix
        assert_eq!(
            resolve(&ctx, "src/consumer.ts", "@app/util/fmt"),
            vec!["src/shared/util/fmt.ts"]
        );
        assert_eq!(
            resolve(&ctx, "src/consumer.ts", "@app/feature"),
            vec!["src/app/feature.ts"]
        );
        // baseUrl-relative bare reference
        assert_eq!(
            resolve(&ctx, "src/consumer.ts", "src/base/rooted"),
            vec!["src/base/rooted.ts"]
        );
    }

    #[test]
    fn asset_imports_resolve_to_nothing() {
        let ctx = ctx_for(&["src/app.ts", "src/styles.css"], ResolverInputs::default());
        assert!(resolve(&ctx, "src/app.ts", "./styles.css").is_empty());
    }
}
