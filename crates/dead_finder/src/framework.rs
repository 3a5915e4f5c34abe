//! Framework detection. Signals are checked in order per framework and
//! short-circuit on the first hit: declared dependencies in the root
//! manifests, marker files, keyword matches in build files, and `go.mod`
//! import substrings.

use std::path::Path;

use ahashmap::AHashMap;
use knowledge::KnowledgeBase;
use logger::Logger;
use manifests::{
    declares_python_dependency, CargoManifest, ComposerJson, GoMod, PackageJson,
};

const PYTHON_REQUIREMENT_FILES: &[&str] = &[
    "requirements.txt",
    "requirements-dev.txt",
    "requirements/base.txt",
    "pyproject.toml",
    "Pipfile",
];

/// The root-level manifests, already loaded by the orchestrator.
#[derive(Default)]
pub struct RootManifests<'a> {
    pub package: Option<&'a PackageJson>,
    pub composer: Option<&'a ComposerJson>,
    pub cargo: Option<&'a CargoManifest>,
    pub go_mod: Option<&'a GoMod>,
}

pub fn detect_frameworks(
    root: &Path,
    kb: &KnowledgeBase,
    manifests: &RootManifests<'_>,
    logger: impl Logger,
) -> Vec<String> {
    // requirement files and build files are read once and shared across
    // framework rules
    let mut file_cache: AHashMap<String, Option<String>> = AHashMap::default();
    let mut read_cached = |rel: &str| -> Option<String> {
        file_cache
            .entry(rel.to_string())
            .or_insert_with(|| std::fs::read_to_string(root.join(rel)).ok())
            .clone()
    };

    let mut detected = Vec::new();
    for rules in kb.all_frameworks() {
        let detection = &rules.detection;

        // 1. declared dependency in a root manifest
        let dependency_hit = detection.dependencies.iter().any(|dep| {
            if manifests.package.is_some_and(|p| p.has_dependency(dep)) {
                return true;
            }
            if manifests.composer.is_some_and(|c| c.has_dependency(dep)) {
                return true;
            }
            if manifests.cargo.is_some_and(|c| c.has_dependency(dep)) {
                return true;
            }
            PYTHON_REQUIREMENT_FILES.iter().any(|file| {
                read_cached(file)
                    .map(|content| declares_python_dependency(&content, dep))
                    .unwrap_or(false)
            })
        });
        if dependency_hit {
            detected.push(rules.framework.clone());
            continue;
        }

        // 2. marker file
        if detection.files.iter().any(|f| root.join(f).exists()) {
            detected.push(rules.framework.clone());
            continue;
        }

        // 3. build-file keyword ("pom.xml::spring-boot")
        let build_hit = detection.build_files.iter().any(|descriptor| {
            let (file, keyword) = match descriptor.split_once("::") {
                Some(pair) => pair,
                None => (descriptor.as_str(), rules.framework.as_str()),
            };
            read_cached(file)
                .map(|content| {
                    content
                        .to_ascii_lowercase()
                        .contains(&keyword.to_ascii_lowercase())
                })
                .unwrap_or(false)
        });
        if build_hit {
            detected.push(rules.framework.clone());
            continue;
        }

        // 4. go.mod import substring
        if let Some(go_mod) = manifests.go_mod {
            if detection
                .go_imports
                .iter()
                .any(|import| go_mod.requires.iter().any(|r| r.contains(import.as_str())))
            {
                detected.push(rules.framework.clone());
            }
        }
    }

    detected.sort();
    if !detected.is_empty() {
        logger.log(format!("detected frameworks: {}", detected.join(", ")));
    }
    detected
}
