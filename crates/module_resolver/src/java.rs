//! Java / Kotlin resolution: six strategies in fixed order. FQN map,
//! wildcard package expansion, static-import unwrapping, the framework
//! prefix filter (external -> empty), detected source roots, and a
//! PascalCase class-name fallback through the basename index.

use crate::context::ResolverContext;
use crate::paths::{basename, is_dead_named};
use lang_parsers::{ImportEdge, ImportKind};

pub fn resolve(
    ctx: &ResolverContext,
    edge: &ImportEdge,
    framework_prefixes: &[String],
) -> Vec<String> {
    let module = edge.module.as_str();

    // 1. exact FQN
    if let Some(path) = ctx.java_fqn_map.get(module) {
        return vec![path.clone()];
    }

    // 2. wildcard `pkg.*`
    if edge.kind == ImportKind::Wildcard || module.ends_with(".*") {
        let pkg = module.trim_end_matches(".*").trim_end_matches('.');
        if let Some(files) = ctx.java_package_dir_map.get(pkg) {
            return live_only(files);
        }
        if let Some(files) = ctx.java_dir_suffix_map.get(pkg) {
            return live_only(files);
        }
        return Vec::new();
    }

    // 3. static import `pkg.Class.member` -> `pkg.Class`
    if edge.kind == ImportKind::Static {
        if let Some((fqn, _member)) = module.rsplit_once('.') {
            if let Some(path) = ctx.java_fqn_map.get(fqn) {
                return vec![path.clone()];
            }
        }
    }

    // 4. platform / framework packages are external
    if framework_prefixes.iter().any(|p| module.starts_with(p)) {
        return Vec::new();
    }

    // 5. detected source roots
    let fqn_path = module.replace('.', "/");
    for root in &ctx.java_source_roots {
        for ext in ["java", "kt"] {
            let candidate = if root.is_empty() {
                format!("{fqn_path}.{ext}")
            } else {
                format!("{root}/{fqn_path}.{ext}")
            };
            if ctx.file_set.contains(&candidate) {
                return vec![candidate];
            }
        }
    }

    // 6. PascalCase class-name fallback by basename
    let class_name = module.rsplit('.').next().unwrap_or(module);
    if class_name.starts_with(char::is_uppercase) {
        let mut hits = Vec::new();
        for ext in ["java", "kt"] {
            if let Some(paths) = ctx.suffix_index.get(&format!("{class_name}.{ext}")) {
                hits.extend(
                    paths
                        .iter()
                        .filter(|p| !is_dead_named(basename(p)))
                        .cloned(),
                );
            }
        }
        return hits;
    }

    Vec::new()
}

fn live_only(files: &[String]) -> Vec<String> {
    files
        .iter()
        .filter(|p| !is_dead_named(basename(p)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod test {
    use lang_parsers::{parse_with_language, Language};
    use pretty_assertions::assert_eq;

    use crate::context::{ResolverContext, ResolverInputs};

    use super::*;

    fn java_file(path: &str, pkg: &str, class: &str) -> lang_parsers::ParsedFile {
        parse_with_language(
            path,
            &format!("package {pkg};\n\npublic class {class} {{}}\n"),
            Language::Java,
        )
    }

    fn edge(module: &str, kind: ImportKind) -> ImportEdge {
        ImportEdge {
            module: module.to_string(),
            kind,
            symbol: None,
            line: 1,
            is_glob: false,
        }
    }

    fn filter() -> Vec<String> {
        vec!["java.".to_string(), "org.springframework.".to_string()]
    }

    #[test]
    fn fqn_and_wildcard() {
        let files = vec![
            java_file("src/main/java/com/acme/A.java", "com.acme", "A"),
            java_file("src/main/java/com/acme/B.java", "com.acme", "B"),
            java_file("src/main/java/com/other/C.java", "com.other", "C"),
        ];
        let ctx = ResolverContext::build(&files, &ResolverInputs::default());

        assert_eq!(
            resolve(&ctx, &edge("com.acme.A", ImportKind::Absolute), &filter()),
            vec!["src/main/java/com/acme/A.java"]
        );
        let mut wildcard = resolve(&ctx, &edge("com.acme.*", ImportKind::Wildcard), &filter());
        wildcard.sort();
        assert_eq!(
            wildcard,
            vec![
                "src/main/java/com/acme/A.java",
                "src/main/java/com/acme/B.java"
            ]
        );
    }

    #[test]
    fn static_import_unwraps_member() {
        let files = vec![java_file(
            "src/main/java/com/acme/Asserts.java",
            "com.acme",
            "Asserts",
        )];
        let ctx = ResolverContext::build(&files, &ResolverInputs::default());
        assert_eq!(
            resolve(
                &ctx,
                &edge("com.acme.Asserts.check", ImportKind::Static),
                &filter()
            ),
            vec!["src/main/java/com/acme/Asserts.java"]
        );
    }

    #[test]
    fn framework_prefixes_are_external() {
        let files = vec![java_file("src/A.java", "a", "A")];
        let ctx = ResolverContext::build(&files, &ResolverInputs::default());
        assert!(resolve(
            &ctx,
            &edge("org.springframework.context.ApplicationContext", ImportKind::Absolute),
            &filter()
        )
        .is_empty());
        assert!(resolve(&ctx, &edge("java.util.List", ImportKind::Absolute), &filter()).is_empty());
    }

    #[test]
    fn class_suffix_fallback_skips_dead_named() {
        let files = vec![
        parse_with_language("legacy/Widget.java", "public class Widget {}\n", Language::Java),
        ];
        let ctx = ResolverContext::build(&files, &ResolverInputs::default());
        assert_eq!(
            resolve(&ctx, &edge("com.vanished.Widget", ImportKind::Absolute), &filter()),
            vec!["legacy/Widget.java"]
        );
    }
}
