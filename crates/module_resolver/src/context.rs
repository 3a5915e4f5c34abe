//! Index construction. The context is derived exactly once from the full
//! parsed-file set plus project configuration, then consulted read-only
//! by the graph walker. Every lookup the per-language strategies perform
//! is O(1) or bounded by the candidate list it returns.

use ahashmap::{AHashMap, AHashSet};
use lang_parsers::{LangMetadata, Language, ParsedFile};
use manifests::{PackageJson, TsconfigJson};

use crate::paths::{basename, dirname, is_dead_named, join_normalize, strip_ext};

/// A monorepo package that other project files may import by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspacePackage {
    pub name: String,
    /// Package directory, root-relative ("" for the repo root package).
    pub dir: String,
    /// `main`/`module` as written in the manifest, package-relative.
    pub entry_points: Vec<String>,
    pub bin_files: Vec<String>,
    /// `(subpath, target)` pairs from the exports map; subpaths are
    /// normalized to have no `./` prefix (`""` for the root export).
    pub exports_map: Vec<(String, String)>,
}

/// A tsconfig alias scope: the aliases visible to files under `dir`.
/// Nearest-ancestor scopes shadow outer ones.
#[derive(Debug, Clone, Default)]
pub struct AliasScope {
    pub dir: String,
    /// Sorted by alias length descending so `@app/util` wins over `@app`.
    pub aliases: Vec<(String, Vec<String>)>,
    pub base_url: Option<String>,
}

/// Everything the resolver knows about the project, pre-indexed.
#[derive(Debug, Default)]
pub struct ResolverContext {
    // generic indexes
    pub file_set: AHashSet<String>,
    /// dir -> files directly inside it (sorted)
    pub dir_index: AHashMap<String, Vec<String>>,
    /// basename -> paths (sorted)
    pub suffix_index: AHashMap<String, Vec<String>>,
    /// extension-less path -> paths; `.ts|.tsx|.js|...` share one key
    pub file_paths_no_ext: AHashMap<String, Vec<String>>,

    // javascript / typescript
    pub alias_scopes: Vec<AliasScope>,
    pub workspace_packages: AHashMap<String, WorkspacePackage>,

    // go
    pub go_module_path: String,
    /// dir -> non-test, non-dead-named .go files
    pub go_files_by_dir: AHashMap<String, Vec<String>>,

    // java / kotlin
    pub java_source_roots: Vec<String>,
    /// "com.acme.Foo" -> defining file
    pub java_fqn_map: AHashMap<String, String>,
    /// "com.acme" -> files of that declared package
    pub java_package_dir_map: AHashMap<String, Vec<String>>,
    /// dotted directory suffix -> java/kotlin files in matching dirs
    /// (fallback when no file declared the package)
    pub java_dir_suffix_map: AHashMap<String, Vec<String>>,

    // rust
    /// dirs that contain a crate root (lib.rs / main.rs)
    pub rust_crate_roots: AHashSet<String>,
}

/// Manifest-derived inputs, gathered by the scanner before the context is
/// built.
#[derive(Debug, Default)]
pub struct ResolverInputs {
    /// `(package dir, manifest)` for every package.json in the project.
    pub packages: Vec<(String, PackageJson)>,
    /// `(dir, tsconfig)` for every tsconfig.json in the project.
    pub tsconfigs: Vec<(String, TsconfigJson)>,
    pub go_module_path: Option<String>,
}

impl ResolverContext {
    pub fn build(files: &[ParsedFile], inputs: &ResolverInputs) -> Self {
        let mut ctx = ResolverContext {
            go_module_path: inputs.go_module_path.clone().unwrap_or_default(),
            ..Default::default()
        };

        for file in files {
            let path = file.path.as_str();
            ctx.file_set.insert(path.to_string());

            let dir = dirname(path);
            ctx.dir_index
                .entry(dir.to_string())
                .or_default()
                .push(path.to_string());
            ctx.suffix_index
                .entry(basename(path).to_string())
                .or_default()
                .push(path.to_string());
            ctx.file_paths_no_ext
                .entry(strip_ext(path).to_string())
                .or_default()
                .push(path.to_string());

            match file.language {
                Language::Go => {
                    if let LangMetadata::Go { is_test_file, .. } = &file.metadata {
                        if !is_test_file && !is_dead_named(basename(path)) {
                            ctx.go_files_by_dir
                                .entry(dir.to_string())
                                .or_default()
                                .push(path.to_string());
                        }
                    }
                }
                Language::Java | Language::Kotlin => {
                    ctx.index_java_file(file);
                }
                Language::Rust => {
                    let base = basename(path);
                    if base == "lib.rs" || base == "main.rs" {
                        ctx.rust_crate_roots.insert(dir.to_string());
                    }
                }
                _ => {}
            }
        }

        ctx.index_java_dir_suffixes();
        ctx.build_workspace_packages(&inputs.packages);
        ctx.build_alias_scopes(&inputs.tsconfigs);

        // deterministic candidate ordering everywhere
        for bucket in ctx
            .dir_index
            .values_mut()
            .chain(ctx.suffix_index.values_mut())
            .chain(ctx.file_paths_no_ext.values_mut())
            .chain(ctx.go_files_by_dir.values_mut())
            .chain(ctx.java_package_dir_map.values_mut())
            .chain(ctx.java_dir_suffix_map.values_mut())
        {
            bucket.sort();
            bucket.dedup();
        }
        ctx.java_source_roots.sort();
        ctx.java_source_roots.dedup();

        ctx
    }

    fn index_java_file(&mut self, file: &ParsedFile) {
        let path = file.path.as_str();
        if is_dead_named(basename(path)) {
            return;
        }
        let LangMetadata::Java {
            package_name: Some(pkg),
            ..
        } = &file.metadata
        else {
            return;
        };

        let stem = strip_ext(basename(path));
        self.java_fqn_map
            .insert(format!("{pkg}.{stem}"), path.to_string());
        self.java_package_dir_map
            .entry(pkg.clone())
            .or_default()
            .push(path.to_string());

        // a file at `src/main/java/com/acme/Foo.java` declaring package
        // `com.acme` pins `src/main/java` as a source root
        let dir = dirname(path);
        let pkg_path = pkg.replace('.', "/");
        if let Some(root) = dir.strip_suffix(&pkg_path) {
            // only a whole-segment match pins a source root
            if root.is_empty() || root.ends_with('/') {
                self.java_source_roots
                    .push(root.trim_end_matches('/').to_string());
            }
        }
    }

    /// Registers every dotted suffix of each java/kotlin directory, so a
    /// wildcard import of an undeclared package still finds its files
    /// without a scan over the whole dir index.
    fn index_java_dir_suffixes(&mut self) {
        let mut suffix_map: AHashMap<String, Vec<String>> = AHashMap::default();
        for (dir, files) in &self.dir_index {
            let jk: Vec<&String> = files
                .iter()
                .filter(|f| matches!(Language::from_path(f), Some(Language::Java | Language::Kotlin)))
                .collect();
            if jk.is_empty() {
                continue;
            }
            let segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
            for start in 0..segments.len() {
                let dotted = segments[start..].join(".");
                let bucket = suffix_map.entry(dotted).or_default();
                bucket.extend(jk.iter().map(|f| (*f).clone()));
            }
        }
        self.java_dir_suffix_map = suffix_map;
    }

    fn build_workspace_packages(&mut self, packages: &[(String, PackageJson)]) {
        for (dir, manifest) in packages {
            let Some(name) = manifest.name.clone() else {
                continue;
            };
            let mut entry_points = Vec::new();
            entry_points.extend(manifest.main.iter().cloned());
            entry_points.extend(manifest.module.iter().cloned());

            let exports_map = manifest
                .export_targets()
                .into_iter()
                .map(|(subpath, target)| {
                    let subpath = subpath
                        .trim_start_matches('.')
                        .trim_start_matches('/')
                        .to_string();
                    (subpath, target)
                })
                .collect();

            let package = WorkspacePackage {
                name: name.clone(),
                dir: dir.clone(),
                entry_points,
                bin_files: manifest.bin_files(),
                exports_map,
            };
            // first manifest with a given name wins; duplicates are a
            // repo defect the scan should not amplify
            self.workspace_packages.entry(name).or_insert(package);
        }
    }

    fn build_alias_scopes(&mut self, tsconfigs: &[(String, TsconfigJson)]) {
        let mut scopes: Vec<AliasScope> = Vec::new();
        for (dir, tsconfig) in tsconfigs {
            let opts = &tsconfig.compiler_options;
            let base_url = opts
                .base_url
                .as_ref()
                .and_then(|b| join_normalize(dir, b));

            let mut aliases: Vec<(String, Vec<String>)> = Vec::new();
            for (pattern, targets) in &opts.paths {
                let alias = pattern.trim_end_matches("/*").to_string();
                let resolved_targets: Vec<String> = targets
                    .iter()
                    .filter_map(|target| {
                        let target = target.trim_end_matches("/*");
                        match &base_url {
                            Some(base) => join_normalize(base, target),
                            None => join_normalize(dir, target),
                        }
                    })
                    .collect();
                if !resolved_targets.is_empty() {
                    aliases.push((alias, resolved_targets));
                }
            }
            // longest alias first: `@app/util/x` must hit `@app/util`
            // before `@app`
            aliases.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(&b.0)));

            scopes.push(AliasScope {
                dir: dir.clone(),
                aliases,
                base_url,
            });
        }
        // nearest-ancestor scope first when several apply
        scopes.sort_by(|a, b| b.dir.len().cmp(&a.dir.len()).then(a.dir.cmp(&b.dir)));
        self.alias_scopes = scopes;
    }

    /// Alias scopes that apply to a file, nearest first.
    pub fn scopes_for<'a>(&'a self, file_path: &'a str) -> impl Iterator<Item = &'a AliasScope> {
        self.alias_scopes.iter().filter(move |scope| {
            scope.dir.is_empty() || file_path.starts_with(&format!("{}/", scope.dir))
        })
    }

    pub fn files_in_dir(&self, dir: &str) -> &[String] {
        self.dir_index.get(dir).map(Vec::as_slice).unwrap_or(&[])
    }
}
