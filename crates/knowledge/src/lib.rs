//! The knowledge base: language rules, framework heuristics, universal
//! entry-point patterns and learned facts.
//!
//! The base is an explicit value constructed once per scan and shared by
//! reference. There is no global state; tests construct their own
//! (usually via [`KnowledgeBase::empty`] or [`KnowledgeBase::embedded`]).

use std::path::Path;

use ahashmap::{AHashMap, AHashSet};
use logger::Logger;
use serde::de::DeserializeOwned;

mod schema;

pub use schema::{
    DetectionSignals, EntryAnnotation, FalsePositive, FrameworkFilter, FrameworkRules,
    ImportResolution, LanguageRules, LearnedPattern, PatternRules, ResolutionStrategy,
};

/// Default language rules compiled into the binary. The same file names can
/// be overridden from a knowledge directory on disk.
const EMBEDDED_LANGUAGES: &[(&str, &str)] = &[
    ("elixir", include_str!("../data/languages/elixir.json")),
    ("erlang", include_str!("../data/languages/erlang.json")),
    ("fsharp", include_str!("../data/languages/fsharp.json")),
    ("go", include_str!("../data/languages/go.json")),
    ("java", include_str!("../data/languages/java.json")),
    ("javascript", include_str!("../data/languages/javascript.json")),
    ("kotlin", include_str!("../data/languages/kotlin.json")),
    ("ocaml", include_str!("../data/languages/ocaml.json")),
    ("perl", include_str!("../data/languages/perl.json")),
    ("php", include_str!("../data/languages/php.json")),
    ("python", include_str!("../data/languages/python.json")),
    ("ruby", include_str!("../data/languages/ruby.json")),
    ("rust", include_str!("../data/languages/rust.json")),
    ("scala", include_str!("../data/languages/scala.json")),
    ("swift", include_str!("../data/languages/swift.json")),
    ("typescript", include_str!("../data/languages/typescript.json")),
    ("vbnet", include_str!("../data/languages/vbnet.json")),
    ("zig", include_str!("../data/languages/zig.json")),
];

const EMBEDDED_FRAMEWORKS: &[(&str, &str)] = &[
    ("angular", include_str!("../data/frameworks/angular.json")),
    ("celery", include_str!("../data/frameworks/celery.json")),
    ("django", include_str!("../data/frameworks/django.json")),
    ("express", include_str!("../data/frameworks/express.json")),
    ("fastapi", include_str!("../data/frameworks/fastapi.json")),
    ("flask", include_str!("../data/frameworks/flask.json")),
    ("gin", include_str!("../data/frameworks/gin.json")),
    ("laravel", include_str!("../data/frameworks/laravel.json")),
    ("nestjs", include_str!("../data/frameworks/nestjs.json")),
    ("nextjs", include_str!("../data/frameworks/nextjs.json")),
    ("nuxt", include_str!("../data/frameworks/nuxt.json")),
    ("quarkus", include_str!("../data/frameworks/quarkus.json")),
    ("rails", include_str!("../data/frameworks/rails.json")),
    ("spring-boot", include_str!("../data/frameworks/spring-boot.json")),
    ("vue", include_str!("../data/frameworks/vue.json")),
];

const EMBEDDED_PATTERNS: &[(&str, &str)] =
    &[("entry-points", include_str!("../data/patterns/entry-points.json"))];

#[derive(Debug, Default)]
pub struct KnowledgeBase {
    languages: AHashMap<String, LanguageRules>,
    frameworks: AHashMap<String, FrameworkRules>,
    patterns: AHashMap<String, PatternRules>,
    /// Paths a reviewer declared alive; excluded from dead reports.
    false_positives: AHashSet<String>,
    /// Promoted entry-point patterns from the learned pool.
    approved_patterns: Vec<LearnedPattern>,
    /// extension (no dot, lowercase) -> language key
    ext_to_language: AHashMap<String, String>,
}

fn parse_pool_entry<T: DeserializeOwned>(
    pool: &str,
    key: &str,
    raw: &str,
    logger: impl Logger,
) -> Option<T> {
    match serde_json::from_str::<T>(raw) {
        Ok(v) => Some(v),
        Err(e) => {
            logger.warn(format!("skipping malformed {pool} entry '{key}': {e}"));
            None
        }
    }
}

impl KnowledgeBase {
    /// A base with no rules at all. Scans still run; only extension
    /// mapping and heuristics degrade. Meant for unit tests.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the default pools compiled into the binary.
    pub fn embedded(logger: impl Logger) -> Self {
        let mut base = Self::default();
        for (key, raw) in EMBEDDED_LANGUAGES {
            if let Some(rules) = parse_pool_entry("language", key, raw, &logger) {
                base.languages.insert((*key).to_string(), rules);
            }
        }
        for (key, raw) in EMBEDDED_FRAMEWORKS {
            if let Some(rules) = parse_pool_entry("framework", key, raw, &logger) {
                base.frameworks.insert((*key).to_string(), rules);
            }
        }
        for (key, raw) in EMBEDDED_PATTERNS {
            if let Some(rules) = parse_pool_entry("pattern", key, raw, &logger) {
                base.patterns.insert((*key).to_string(), rules);
            }
        }
        base.rebuild_extension_index();
        base
    }

    /// Loads the embedded pools, then overlays entries found in `dir`
    /// (the on-disk layout: `languages/`, `frameworks/`, `patterns/`,
    /// `learned/`). Entries with the same file stem replace embedded ones.
    pub fn with_overrides(dir: Option<&Path>, logger: impl Logger) -> Self {
        let mut base = Self::embedded(&logger);
        if let Some(dir) = dir {
            base.overlay_dir(dir, &logger);
        }
        base
    }

    fn overlay_dir(&mut self, dir: &Path, logger: impl Logger) {
        overlay_pool(&mut self.languages, &dir.join("languages"), "language", &logger);
        overlay_pool(&mut self.frameworks, &dir.join("frameworks"), "framework", &logger);
        overlay_pool(&mut self.patterns, &dir.join("patterns"), "pattern", &logger);
        self.load_learned(&dir.join("learned"), &logger);
        self.rebuild_extension_index();
    }

    fn load_learned(&mut self, dir: &Path, logger: impl Logger) {
        if let Ok(raw) = std::fs::read_to_string(dir.join("false-positives.json")) {
            if let Some(entries) =
                parse_pool_entry::<Vec<FalsePositive>>("learned", "false-positives", &raw, &logger)
            {
                self.false_positives.extend(entries.into_iter().map(|e| e.path));
            }
        }
        if let Ok(raw) = std::fs::read_to_string(dir.join("approved.json")) {
            if let Some(entries) =
                parse_pool_entry::<Vec<LearnedPattern>>("learned", "approved", &raw, &logger)
            {
                self.approved_patterns.extend(entries);
            }
        }
    }

    fn rebuild_extension_index(&mut self) {
        self.ext_to_language.clear();
        // sorted so that a duplicate extension claim resolves the same way
        // on every run
        let mut keys: Vec<&String> = self.languages.keys().collect();
        keys.sort();
        let mut index = AHashMap::default();
        for key in keys {
            let rules = &self.languages[key.as_str()];
            for ext in &rules.file_extensions {
                index
                    .entry(ext.to_ascii_lowercase())
                    .or_insert_with(|| key.to_string());
            }
        }
        self.ext_to_language = index;
    }

    pub fn language_rules(&self, lang: &str) -> Option<&LanguageRules> {
        self.languages.get(lang)
    }

    /// extension without the leading dot, case-insensitive
    pub fn language_for_extension(&self, ext: &str) -> Option<&str> {
        self.ext_to_language
            .get(&ext.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn known_extensions(&self) -> impl Iterator<Item = &str> {
        self.ext_to_language.keys().map(String::as_str)
    }

    pub fn all_frameworks(&self) -> impl Iterator<Item = &FrameworkRules> {
        // deterministic iteration order for detection and reporting
        let mut keys: Vec<&String> = self.frameworks.keys().collect();
        keys.sort();
        keys.into_iter().map(|k| &self.frameworks[k.as_str()])
    }

    pub fn framework(&self, name: &str) -> Option<&FrameworkRules> {
        self.frameworks.get(name)
    }

    /// Universal entry-point path regexes: the `entry-points` pattern pool
    /// plus any promoted learned patterns.
    pub fn entry_point_file_patterns(&self) -> Vec<&str> {
        let mut patterns: Vec<&str> = self
            .patterns
            .values()
            .flat_map(|p| p.file_patterns.iter().map(String::as_str))
            .collect();
        patterns.extend(self.approved_patterns.iter().map(|p| p.pattern.as_str()));
        patterns.sort();
        patterns
    }

    pub fn di_container_patterns(&self) -> Vec<&str> {
        let mut patterns: Vec<&str> = self
            .patterns
            .values()
            .flat_map(|p| p.di_container_patterns.iter().map(String::as_str))
            .collect();
        patterns.sort();
        patterns
    }

    /// Import prefixes that are external for this language (`java.`,
    /// `org.springframework.`, ...). Empty when the language has none.
    pub fn framework_filter(&self, lang: &str) -> &[String] {
        self.languages
            .get(lang)
            .map(|r| r.framework_filter.prefixes.as_slice())
            .unwrap_or(&[])
    }

    /// Every entry annotation for the language across all framework
    /// groups, with its reason.
    pub fn all_entry_annotations(&self, lang: &str) -> Vec<&EntryAnnotation> {
        let Some(rules) = self.languages.get(lang) else {
            return Vec::new();
        };
        let mut groups: Vec<(&String, &Vec<EntryAnnotation>)> =
            rules.entry_point_annotations.iter().collect();
        groups.sort_by_key(|(k, _)| k.as_str());
        groups.into_iter().flat_map(|(_, v)| v.iter()).collect()
    }

    pub fn same_package_linking(&self, lang: &str) -> bool {
        self.languages
            .get(lang)
            .map(|r| r.same_package_linking)
            .unwrap_or(false)
    }

    pub fn is_false_positive(&self, path: &str) -> bool {
        self.false_positives.contains(path)
    }
}

fn overlay_pool<T: DeserializeOwned>(
    pool: &mut AHashMap<String, T>,
    dir: &Path,
    pool_name: &str,
    logger: impl Logger,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        // a missing pool directory is not an error; the embedded defaults stand
        Err(_) => return,
    };
    let mut paths: Vec<_> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                logger.warn(format!("could not read {pool_name} entry '{stem}': {e}"));
                continue;
            }
        };
        if let Some(parsed) = parse_pool_entry::<T>(pool_name, stem, &raw, &logger) {
            pool.insert(stem.to_string(), parsed);
        }
    }
}

#[cfg(test)]
mod test {
    use logger::{NullLogger, VecLogger};
    use pretty_assertions::assert_eq;
    use test_tmpdir::test_tmpdir;

    use super::*;

    #[test]
    fn embedded_pools_load() {
        let kb = KnowledgeBase::embedded(NullLogger);
        assert!(kb.language_rules("javascript").is_some());
        assert!(kb.language_rules("zig").is_some());
        assert_eq!(kb.language_for_extension("tsx"), Some("typescript"));
        assert_eq!(kb.language_for_extension("KT"), Some("kotlin"));
        assert!(kb.same_package_linking("go"));
        assert!(!kb.same_package_linking("python"));
        assert!(kb
            .framework_filter("java")
            .iter()
            .any(|p| p == "org.springframework."));
    }

    #[test]
    fn annotations_flatten_across_groups() {
        let kb = KnowledgeBase::embedded(NullLogger);
        let names: Vec<&str> = kb
            .all_entry_annotations("java")
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert!(names.contains(&"SpringBootApplication"));
        assert!(names.contains(&"Test"));
    }

    #[test]
    fn malformed_override_is_skipped_with_warning() {
        let tmp = test_tmpdir!(
            "kb/languages/java.json" => r#"{"language": "java", "#,
            "kb/languages/basic.json" => r#"{
                "language": "basic",
                "version": "1.0",
                "file_extensions": ["bas"]
            }"#
        );

        let logger = VecLogger::new();
        let kb = KnowledgeBase::with_overrides(Some(&tmp.root_join("kb")), &logger);

        // the malformed java override is dropped; the embedded rules stand
        assert!(kb.framework_filter("java").iter().any(|p| p == "java."));
        // the well-formed sibling still loaded
        assert_eq!(kb.language_for_extension("bas"), Some("basic"));
        let logs = logger.get_logs().unwrap();
        assert!(logs.iter().any(|l| l.contains("malformed language entry 'java'")));
    }

    #[test]
    fn learned_pools_are_consumed() {
        let tmp = test_tmpdir!(
            "kb/learned/false-positives.json" =>
                r#"[{ "path": "src/keep-me.ts", "note": "loaded reflectively" }]"#,
            "kb/learned/approved.json" =>
                r#"[{ "pattern": "(^|/)generated/" }]"#
        );

        let kb = KnowledgeBase::with_overrides(Some(&tmp.root_join("kb")), NullLogger);
        assert!(kb.is_false_positive("src/keep-me.ts"));
        assert!(kb
            .entry_point_file_patterns()
            .contains(&"(^|/)generated/"));
    }
}
