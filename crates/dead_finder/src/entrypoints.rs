//! Entry-point classification. Thirteen sources checked in a fixed
//! order; a file is marked at most once and the first reason wins.

use std::path::Path;

use ahashmap::{AHashMap, AHashSet};
use knowledge::KnowledgeBase;
use lang_parsers::{LangMetadata, Language, ParsedFile};
use lazy_static::lazy_static;
use logger::Logger;
use manifests::{CargoManifest, ComposerJson, PackageJson};
use module_resolver::paths::{basename, dirname, join_normalize, strip_ext};
use module_resolver::{resolve_edge, ResolverContext};
use regex::Regex;

use crate::patterns::match_name_pattern;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EntryPoint {
    pub file: String,
    pub reason: String,
}

/// Decorators that mark a class as owned by a DI container or router,
/// keeping its file externally reachable.
const DI_DECORATORS: &[&str] = &[
    "Controller",
    "Module",
    "Resolver",
    "Service",
    "Injectable",
    "RestController",
    "Entity",
    "Get",
    "Post",
    "Put",
    "Delete",
    "Patch",
    "Component",
    "Repository",
    "Configuration",
    "Bean",
    "Aspect",
    "Middleware",
    "Guard",
    "Interceptor",
    "Pipe",
    "Filter",
    "WebSocketGateway",
    "EventPattern",
    "MessagePattern",
];

const COMPILED_DIR_PREFIXES: &[&str] = &["out/", "dist/", "build/"];

lazy_static! {
    static ref SCRIPT_RUNNER: Regex =
        Regex::new(r"(?:node|tsx|ts-node)\s+(?:-[-\w=]*\s+)*([\w@./-]+)").expect("static regex");
    static ref SCRIPT_LOCAL_PATH: Regex =
        Regex::new(r"(?:^|\s)(\./[\w@./-]+)").expect("static regex");
    static ref HTML_SCRIPT_SRC: Regex =
        Regex::new(r#"<script[^>]*\bsrc\s*=\s*["']([^"']+)["']"#).expect("static regex");
    static ref TEMPLATE_PLACEHOLDER: Regex =
        Regex::new(r"\{\{[^}]*\}\}|\{%[^%]*%\}").expect("static regex");
    static ref BUNDLER_CONFIG_NAME: Regex =
        Regex::new(r"^(rollup|webpack|vite|esbuild|tsup)\.config\.[cm]?[jt]s$").expect("static regex");
    static ref BUNDLER_ENTRY_KEY: Regex =
        Regex::new(r"(?:\binput\b|\bentry\b|\bentryPoints\b)\s*[:=]").expect("static regex");
    static ref QUOTED_PATH: Regex =
        Regex::new(r#"['"]([\w@][\w@./-]*|\./[\w@./-]+|\.\./[\w@./-]+)['"]"#).expect("static regex");
    static ref VITE_ALIAS_BLOCK: Regex =
        Regex::new(r"alias\s*:\s*\{([^}]*)\}").expect("static regex");
}

/// Everything the classifier consults, borrowed from the orchestrator.
pub struct EntryInputs<'a> {
    pub kb: &'a KnowledgeBase,
    pub ctx: &'a ResolverContext,
    pub files: &'a [ParsedFile],
    pub contents: &'a AHashMap<String, String>,
    /// `(dir, manifest)` for every discovered package.json, root included.
    pub packages: &'a [(String, PackageJson)],
    pub cargo_manifests: &'a [(String, CargoManifest)],
    pub composers: &'a [(String, ComposerJson)],
    pub gemspecs: &'a [String],
    pub html_files: &'a [String],
    /// Detected framework tags, sorted.
    pub frameworks: &'a [String],
    pub project_root: &'a Path,
}

pub struct EntryClassifier<'a, L: Logger> {
    inputs: &'a EntryInputs<'a>,
    logger: L,
    found: Vec<EntryPoint>,
    seen: AHashSet<String>,
}

impl<'a, L: Logger> EntryClassifier<'a, L> {
    pub fn classify(inputs: &'a EntryInputs<'a>, logger: L) -> Vec<EntryPoint> {
        let mut classifier = Self {
            inputs,
            logger,
            found: Vec::new(),
            seen: AHashSet::default(),
        };
        classifier.from_root_manifest();
        classifier.from_html_entries();
        classifier.from_bundler_configs();
        classifier.from_language_manifests();
        classifier.from_workspace_packages();
        classifier.from_nested_packages();
        classifier.from_file_metadata();
        classifier.from_di_decorators();
        classifier.from_name_patterns();
        classifier.from_kb_patterns();
        classifier.from_framework_patterns();
        classifier.from_di_container_refs();
        classifier.from_dynamic_fields();
        classifier.found
    }

    /// Marks a concrete project file; no-op for unknown paths and
    /// already-marked files (first reason wins).
    fn mark(&mut self, file: &str, reason: impl Into<String>) {
        if !self.inputs.ctx.file_set.contains(file) {
            return;
        }
        if self.seen.insert(file.to_string()) {
            self.found.push(EntryPoint {
                file: file.to_string(),
                reason: reason.into(),
            });
        }
    }

    /// Marks whatever project files a loosely-written reference matches:
    /// exact, extension-less, `/index`, then basename suffix.
    fn mark_fuzzy(&mut self, reference: &str, reason: &str) {
        for hit in fuzzy_match(self.inputs.ctx, reference) {
            self.mark(&hit, reason);
        }
    }

    // 1. root package manifest
    fn from_root_manifest(&mut self) {
        let Some((_, manifest)) = self
            .inputs
            .packages
            .iter()
            .find(|(dir, _)| dir.is_empty())
        else {
            return;
        };
        let manifest = manifest.clone();

        for entry in manifest.main.iter().chain(manifest.module.iter()) {
            self.mark_fuzzy(&clean_ref(entry), "package.json main");
        }
        for (_, target) in manifest.export_targets() {
            for candidate in rewrite_compiled(&clean_ref(&target)) {
                self.mark_fuzzy(&candidate, "package.json exports");
            }
        }

        // bin files also pull in whatever they import, which catches
        // `bin/cli.js` shims re-exporting the real entry
        for bin in manifest.bin_files() {
            let hits = fuzzy_match(self.inputs.ctx, &clean_ref(&bin));
            for hit in hits {
                self.mark(&hit, "package.json bin");
                self.chase_imports(&hit, "imported by bin script");
            }
        }

        for command in manifest.scripts.values() {
            for caps in SCRIPT_RUNNER.captures_iter(command) {
                let target = &caps[1];
                if target.contains('/') || target.contains('.') {
                    self.mark_fuzzy(&clean_ref(target), "package.json script");
                }
            }
            for caps in SCRIPT_LOCAL_PATH.captures_iter(command) {
                self.mark_fuzzy(&clean_ref(&caps[1]), "package.json script");
            }
        }
    }

    /// Resolves every import of an already-marked file and marks the
    /// targets too.
    fn chase_imports(&mut self, file_path: &str, reason: &str) {
        let Some(file) = self
            .inputs
            .files
            .iter()
            .find(|f| f.path == file_path)
        else {
            return;
        };
        let filter = self.inputs.kb.framework_filter(file.language.as_str());
        let mut targets = Vec::new();
        for edge in &file.imports {
            targets.extend(resolve_edge(self.inputs.ctx, file, edge, filter));
        }
        for target in targets {
            self.mark(&target, reason);
        }
    }

    // 2. html script tags
    fn from_html_entries(&mut self) {
        let html_files: Vec<String> = self
            .inputs
            .html_files
            .iter()
            .filter(|path| is_entry_html(path))
            .cloned()
            .collect();
        for html_path in html_files {
            let abs = self.inputs.project_root.join(&html_path);
            let content = match std::fs::read_to_string(&abs) {
                Ok(content) => content,
                Err(e) => {
                    self.logger.warn(format!("could not read {html_path}: {e}"));
                    continue;
                }
            };
            for caps in HTML_SCRIPT_SRC.captures_iter(&content) {
                let src = TEMPLATE_PLACEHOLDER.replace_all(&caps[1], "");
                let src = src.split(['?', '#']).next().unwrap_or("").trim();
                if src.is_empty() || src.starts_with("http") || src.starts_with("//") {
                    continue;
                }
                let reference = if let Some(rooted) = src.strip_prefix('/') {
                    rooted.to_string()
                } else {
                    match join_normalize(dirname(&html_path), src) {
                        Some(joined) => joined,
                        None => continue,
                    }
                };
                self.mark_fuzzy(&reference, "html script tag");
            }
        }
    }

    // 3. bundler configuration entries
    fn from_bundler_configs(&mut self) {
        let config_files: Vec<&ParsedFile> = self
            .inputs
            .files
            .iter()
            .filter(|f| BUNDLER_CONFIG_NAME.is_match(f.basename()))
            .collect();
        let mut marks: Vec<(String, String)> = Vec::new();
        for config in &config_files {
            let Some(content) = self.inputs.contents.get(&config.path) else {
                continue;
            };
            let dir = config.dir();
            for key_match in BUNDLER_ENTRY_KEY.find_iter(content) {
                let mut region_end = (key_match.end() + 400).min(content.len());
                while !content.is_char_boundary(region_end) {
                    region_end -= 1;
                }
                let region = &content[key_match.end()..region_end];
                for caps in QUOTED_PATH.captures_iter(region) {
                    if let Some(joined) = join_relative_loose(dir, &caps[1]) {
                        marks.push((joined, "bundler entry".to_string()));
                    }
                }
            }
            // vite alias replacement targets are reachable roots too
            for caps in VITE_ALIAS_BLOCK.captures_iter(content) {
                for quoted in QUOTED_PATH.captures_iter(&caps[1]) {
                    if let Some(joined) = join_relative_loose(dir, &quoted[1]) {
                        marks.push((joined, "bundler alias target".to_string()));
                    }
                }
            }
        }
        for (reference, reason) in marks {
            self.mark_fuzzy(&reference, &reason);
        }
    }

    // 4. cargo / composer / gemspec manifests
    fn from_language_manifests(&mut self) {
        let mut marks: Vec<(String, &str)> = Vec::new();
        let mut exact_marks: Vec<(String, &str)> = Vec::new();
        let mut exact_dirs: Vec<(String, &str)> = Vec::new();

        for (dir, manifest) in self.inputs.cargo_manifests {
            // cargo paths are written literally; fuzzy matching could leak
            // onto same-stem files of other languages
            for target in manifest.declared_target_paths() {
                if let Some(joined) = join_relative_loose(dir, &target) {
                    exact_marks.push((joined, "cargo target"));
                }
            }
            for default in ["src/main.rs", "src/lib.rs"] {
                if let Some(joined) = join_relative_loose(dir, default) {
                    exact_marks.push((joined, "cargo default target"));
                }
            }
            for convention in ["src/bin", "examples", "benches"] {
                if let Some(joined) = join_relative_loose(dir, convention) {
                    exact_dirs.push((joined, "cargo convention target"));
                }
            }
        }

        for (dir, composer) in self.inputs.composers {
            for psr4_dir in composer.psr4_dirs() {
                if let Some(joined) = join_relative_loose(dir, &psr4_dir) {
                    // PSR-4 classes load reflectively; the whole root stays live
                    let prefix = format!("{}/", joined.trim_end_matches('/'));
                    let under: Vec<String> = self
                        .inputs
                        .files
                        .iter()
                        .filter(|f| f.language == Language::Php && f.path.starts_with(&prefix))
                        .map(|f| f.path.clone())
                        .collect();
                    for path in under {
                        self.mark(&path, "composer psr-4 root");
                    }
                }
            }
            for file in composer.autoload_files() {
                if let Some(joined) = join_relative_loose(dir, &file) {
                    marks.push((joined, "composer autoload file"));
                }
            }
            for bin in &composer.bin {
                if let Some(joined) = join_relative_loose(dir, bin) {
                    marks.push((joined, "composer bin"));
                }
            }
        }

        for gemspec in self.inputs.gemspecs {
            // the conventional library entry next to the gemspec
            let lib_dir = match dirname(gemspec) {
                "" => "lib".to_string(),
                dir => format!("{dir}/lib"),
            };
            let lib_files: Vec<String> =
                self.inputs.ctx.files_in_dir(&lib_dir).to_vec();
            for path in lib_files {
                self.mark(&path, "gem library entry");
            }
        }

        for (reference, reason) in marks {
            self.mark_fuzzy(&reference, reason);
        }
        for (path, reason) in exact_marks {
            self.mark(&path, reason);
        }
        for (dir, reason) in exact_dirs {
            let files: Vec<String> = self.inputs.ctx.files_in_dir(&dir).to_vec();
            for path in files {
                self.mark(&path, reason);
            }
        }
    }

    // 5. workspace package entries
    fn from_workspace_packages(&mut self) {
        let mut names: Vec<&String> = self.inputs.ctx.workspace_packages.keys().collect();
        names.sort();
        let mut marks: Vec<(String, &str)> = Vec::new();
        for name in names {
            let package = &self.inputs.ctx.workspace_packages[name.as_str()];
            for entry in &package.entry_points {
                for candidate in rewrite_compiled(&clean_ref(entry)) {
                    if let Some(joined) = join_relative_loose(&package.dir, &candidate) {
                        marks.push((joined, "workspace package entry"));
                    }
                }
            }
            for bin in &package.bin_files {
                if let Some(joined) = join_relative_loose(&package.dir, &clean_ref(bin)) {
                    marks.push((joined, "workspace package bin"));
                }
            }
            for (_, target) in &package.exports_map {
                for candidate in rewrite_compiled(&clean_ref(target)) {
                    if let Some(joined) = join_relative_loose(&package.dir, &candidate) {
                        marks.push((joined, "workspace package export"));
                    }
                }
            }
        }
        for (reference, reason) in marks {
            self.mark_fuzzy(&reference, reason);
        }
    }

    // 6. nested sub-packages compiled entries mapped back to source
    fn from_nested_packages(&mut self) {
        let mut marks: Vec<String> = Vec::new();
        for (dir, manifest) in self.inputs.packages {
            if dir.is_empty() {
                continue;
            }
            for entry in manifest.main.iter().chain(manifest.module.iter()) {
                let cleaned = clean_ref(entry);
                let Some(rest) = COMPILED_DIR_PREFIXES
                    .iter()
                    .find_map(|prefix| cleaned.strip_prefix(prefix))
                else {
                    continue;
                };
                let stem = strip_ext(rest);
                for candidate in [format!("src/{stem}"), "src/index".to_string()] {
                    if let Some(joined) = join_relative_loose(dir, &candidate) {
                        marks.push(joined);
                    }
                }
            }
        }
        for reference in marks {
            self.mark_fuzzy(&reference, "compiled entry mapped to source");
        }
    }

    // 7. per-file language metadata
    fn from_file_metadata(&mut self) {
        let mut marks: Vec<(String, String)> = Vec::new();
        for file in self.inputs.files {
            match &file.metadata {
                LangMetadata::Python {
                    has_main_block,
                    framework_markers,
                } => {
                    if *has_main_block {
                        marks.push((file.path.clone(), "python __main__ block".to_string()));
                    }
                    for marker in framework_markers {
                        marks.push((file.path.clone(), format!("python {marker} marker")));
                    }
                }
                LangMetadata::Java {
                    has_main_method,
                    is_spring_component,
                    ..
                } => {
                    if *has_main_method {
                        marks.push((file.path.clone(), "jvm main method".to_string()));
                    }
                    if *is_spring_component {
                        marks.push((file.path.clone(), "spring component".to_string()));
                    }
                    let annotations =
                        self.inputs.kb.all_entry_annotations(file.language.as_str());
                    for annotation in &file.annotations {
                        if let Some(known) =
                            annotations.iter().find(|a| a.name == annotation.name)
                        {
                            let reason = known
                                .reason
                                .clone()
                                .unwrap_or_else(|| format!("@{} annotation", known.name));
                            marks.push((file.path.clone(), reason));
                        }
                    }
                }
                LangMetadata::Go {
                    is_main_package,
                    has_main_function,
                    has_init_function,
                    is_test_file,
                } => {
                    if *is_main_package && *has_main_function {
                        marks.push((file.path.clone(), "go main package".to_string()));
                    }
                    if *has_init_function {
                        marks.push((file.path.clone(), "go init function".to_string()));
                    }
                    if *is_test_file {
                        marks.push((file.path.clone(), "go test file".to_string()));
                    }
                }
                LangMetadata::None | LangMetadata::Failed { .. } => {}
            }

            // swift @main and friends, vb Sub Main
            if matches!(file.language, Language::Swift | Language::Vbnet | Language::Scala)
                && file
                    .annotations
                    .iter()
                    .any(|a| a.name.eq_ignore_ascii_case("main"))
            {
                marks.push((file.path.clone(), "application main".to_string()));
            }
        }
        for (path, reason) in marks {
            self.mark(&path, reason);
        }
    }

    // 8. DI decorators on classes
    fn from_di_decorators(&mut self) {
        let mut di_names: AHashSet<&str> = DI_DECORATORS.iter().copied().collect();
        for fw in self.inputs.frameworks {
            if let Some(rules) = self.inputs.kb.framework(fw) {
                di_names.extend(rules.di_decorators.iter().map(String::as_str));
            }
        }
        let mut marks: Vec<(String, String)> = Vec::new();
        for file in self.inputs.files {
            for class in &file.classes {
                if let Some(decorator) = class
                    .decorators
                    .iter()
                    .find(|d| di_names.contains(d.name.as_str()))
                {
                    marks.push((
                        file.path.clone(),
                        format!("di decorator @{}", decorator.name),
                    ));
                    break;
                }
            }
        }
        for (path, reason) in marks {
            self.mark(&path, reason);
        }
    }

    // 9. name-based pattern list
    fn from_name_patterns(&mut self) {
        let marks: Vec<(String, &str)> = self
            .inputs
            .files
            .iter()
            .filter_map(|f| match_name_pattern(&f.path).map(|reason| (f.path.clone(), reason)))
            .collect();
        for (path, reason) in marks {
            self.mark(&path, reason);
        }
    }

    // 10. knowledge-base file patterns
    fn from_kb_patterns(&mut self) {
        let regexes = compile_patterns(
            self.inputs.kb.entry_point_file_patterns().into_iter(),
            &self.logger,
        );
        let mut marks: Vec<String> = Vec::new();
        for file in self.inputs.files {
            if regexes.iter().any(|re| re.is_match(&file.path)) {
                marks.push(file.path.clone());
            }
        }
        for path in marks {
            self.mark(&path, "knowledge-base pattern");
        }
    }

    // 11. detected-framework entry patterns
    fn from_framework_patterns(&mut self) {
        let mut marks: Vec<(String, String)> = Vec::new();
        for fw in self.inputs.frameworks {
            let Some(rules) = self.inputs.kb.framework(fw) else {
                continue;
            };
            let regexes =
                compile_patterns(rules.entry_patterns.iter().map(String::as_str), &self.logger);
            for file in self.inputs.files {
                if regexes.iter().any(|re| re.is_match(&file.path)) {
                    marks.push((file.path.clone(), format!("{fw} entry pattern")));
                }
            }
        }
        for (path, reason) in marks {
            self.mark(&path, reason);
        }
    }

    // 12. DI container textual references
    fn from_di_container_refs(&mut self) {
        let regexes = compile_patterns(
            self.inputs.kb.di_container_patterns().into_iter(),
            &self.logger,
        );
        if regexes.is_empty() {
            return;
        }

        // class name -> defining file, first definition in path order wins
        let mut class_index: AHashMap<&str, &str> = AHashMap::default();
        for file in self.inputs.files {
            for class in &file.classes {
                class_index
                    .entry(class.name.as_str())
                    .or_insert(file.path.as_str());
            }
        }

        let mut marks: Vec<(String, String)> = Vec::new();
        for file in self.inputs.files {
            let Some(content) = self.inputs.contents.get(&file.path) else {
                continue;
            };
            for re in &regexes {
                for caps in re.captures_iter(content) {
                    let Some(name) = caps.get(1) else { continue };
                    if let Some(defining) = class_index.get(name.as_str()) {
                        marks.push((
                            defining.to_string(),
                            format!("di container reference to {}", name.as_str()),
                        ));
                    }
                }
            }
        }
        for (path, reason) in marks {
            self.mark(&path, reason);
        }
    }

    // 13. dynamic package.json plugin fields
    fn from_dynamic_fields(&mut self) {
        let mut marks: Vec<(String, String)> = Vec::new();
        for (dir, manifest) in self.inputs.packages {
            for (field, paths) in manifest.dynamic_entry_paths() {
                for path in paths {
                    if !path.contains('/') && !path.contains('.') {
                        continue;
                    }
                    for candidate in rewrite_compiled(&clean_ref(&path)) {
                        if let Some(joined) = join_relative_loose(dir, &candidate) {
                            marks.push((joined, format!("package.json {field} field")));
                        }
                    }
                }
            }
        }
        for (reference, reason) in marks {
            self.mark_fuzzy(&reference, &reason);
        }
    }
}

/// Exact, extension-less, `/index`, then basename-suffix matching, in
/// that order; the first stage with hits wins.
pub fn fuzzy_match(ctx: &ResolverContext, reference: &str) -> Vec<String> {
    if ctx.file_set.contains(reference) {
        return vec![reference.to_string()];
    }
    let key = strip_ext(reference);
    if let Some(paths) = ctx.file_paths_no_ext.get(key) {
        return paths.clone();
    }
    if let Some(paths) = ctx.file_paths_no_ext.get(&format!("{key}/index")) {
        return paths.clone();
    }
    let base = basename(reference);
    if !base.is_empty() {
        if let Some(paths) = ctx.suffix_index.get(base) {
            return paths.clone();
        }
    }
    Vec::new()
}

fn clean_ref(reference: &str) -> String {
    reference.trim().trim_start_matches("./").to_string()
}

/// `dist/x.js` and friends probably compile from `src/x.ts`; the probes
/// try the written path, its `src/` twin and the stripped form.
fn rewrite_compiled(reference: &str) -> Vec<String> {
    let mut out = vec![reference.to_string()];
    for prefix in COMPILED_DIR_PREFIXES {
        if let Some(rest) = reference.strip_prefix(prefix) {
            out.push(format!("src/{rest}"));
            out.push(rest.to_string());
        }
    }
    out
}

fn join_relative_loose(dir: &str, reference: &str) -> Option<String> {
    if dir.is_empty() {
        Some(clean_ref(reference))
    } else {
        join_normalize(dir, &clean_ref(reference))
    }
}

fn is_entry_html(path: &str) -> bool {
    let base = basename(path);
    if base == "index.html" || base == "index.htm" {
        return true;
    }
    const LAYOUT_DIRS: &[&str] = &["_layouts", "layouts", "templates", "views", "public", "src"];
    path.split('/')
        .any(|segment| LAYOUT_DIRS.contains(&segment))
}

fn compile_patterns<'p>(
    patterns: impl Iterator<Item = &'p str>,
    logger: impl Logger,
) -> Vec<Regex> {
    patterns
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                logger.warn(format!("skipping invalid entry pattern {pattern:?}: {e}"));
                None
            }
        })
        .collect()
}
