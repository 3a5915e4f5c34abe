//! File discovery: a parallel walk of the project tree that yields source
//! candidates, manifests and HTML files, sorted for reproducibility.
//! Errors on individual directories are logged and skipped; the walk
//! itself never fails on them.

use std::path::Path;

use anyhow::Context;
use ignore::overrides::OverrideBuilder;
use ignore::DirEntry;
use lang_parsers::Language;
use logger::Logger;
use path_slash::PathExt;

use crate::cfg::ScanConfig;

/// Vendor and build output directories that never contain first-party
/// source. Overrides use inverted globs: `!name` excludes.
pub const DEFAULT_SKIPPED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "out",
    "target",
    "vendor",
    "__pycache__",
    ".venv",
    "venv",
    ".tox",
    "coverage",
    ".next",
    ".nuxt",
    ".output",
    ".cache",
    "bower_components",
    "Pods",
    "DerivedData",
    "_build",
    ".gradle",
    ".idea",
    ".vscode",
    ".terraform",
];

const MANIFEST_NAMES: &[&str] = &[
    "package.json",
    "Cargo.toml",
    "go.mod",
    "composer.json",
    "tsconfig.json",
    "pyproject.toml",
    "Pipfile",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "Gemfile",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredSource {
    /// root-relative POSIX path
    pub rel_path: String,
    pub size: u64,
}

/// Everything the walk found, each list sorted by path.
#[derive(Debug, Default)]
pub struct Discovered {
    pub sources: Vec<DiscoveredSource>,
    pub manifests: Vec<String>,
    pub html_files: Vec<String>,
    /// True when the soft file cap truncated the source list.
    pub truncated: bool,
}

enum WalkedFile {
    Source(DiscoveredSource),
    Manifest(String),
    Html(String),
}

pub fn walk_project(
    root: &Path,
    config: &ScanConfig,
    logger: impl Logger + Sync,
) -> Result<Discovered, anyhow::Error> {
    let (tx, rx) = std::sync::mpsc::channel::<Result<WalkedFile, anyhow::Error>>();
    let mut discovered = Discovered::default();
    let discovered_ref = &mut discovered;

    std::thread::scope(|scope| -> Result<(), anyhow::Error> {
        let logger_ref = &logger;
        let collector = scope.spawn(move || {
            for file in rx {
                match file {
                    Ok(WalkedFile::Source(source)) => discovered_ref.sources.push(source),
                    Ok(WalkedFile::Manifest(path)) => discovered_ref.manifests.push(path),
                    Ok(WalkedFile::Html(path)) => discovered_ref.html_files.push(path),
                    Err(e) => logger_ref.warn(format!("error during walk: {e:#}")),
                }
            }
        });

        let walk = build_walk(root, &config.skip)?;
        let max_file_size = config.max_file_size;
        walk.run(|| {
            let tx = tx.clone();
            Box::new(move |result| {
                match result {
                    Ok(entry) => {
                        if let Some(file) = visit_entry(root, entry, max_file_size) {
                            // the collector outlives every sender
                            tx.send(Ok(file)).unwrap();
                        }
                    }
                    Err(e) => {
                        tx.send(Err(anyhow::anyhow!(e))).unwrap();
                    }
                }
                ignore::WalkState::Continue
            })
        });

        drop(tx);
        collector
            .join()
            .map_err(|_| anyhow::anyhow!("walk collector thread panicked"))?;
        Ok(())
    })?;

    discovered.sources.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    discovered.manifests.sort();
    discovered.html_files.sort();

    if let Some(cap) = config.max_files {
        if discovered.sources.len() > cap {
            logger.warn(format!(
                "file cap reached: scanning {cap} of {} source files",
                discovered.sources.len()
            ));
            discovered.sources.truncate(cap);
            discovered.truncated = true;
        }
    }

    Ok(discovered)
}

fn build_walk(root: &Path, skip: &[String]) -> Result<ignore::WalkParallel, anyhow::Error> {
    let mut override_builder = OverrideBuilder::new(root);
    override_builder
        .add("*")
        .expect("default glob should be valid");
    for dir in DEFAULT_SKIPPED_DIRS {
        override_builder
            .add(&format!("!{dir}"))
            .expect("builtin overrides should be valid");
    }
    for pattern in skip {
        let inverted = if let Some(stripped) = pattern.strip_prefix('!') {
            stripped.to_string()
        } else {
            format!("!{pattern}")
        };
        override_builder
            .add(&inverted)
            .with_context(|| format!("failed to add skip pattern {pattern:?}"))?;
    }
    let overrides = override_builder
        .build()
        .context("failed to build walk overrides")?;

    let mut walk_builder = ignore::WalkBuilder::new(root);
    walk_builder.standard_filters(false).hidden(false);
    walk_builder.overrides(overrides);
    Ok(walk_builder.build_parallel())
}

fn visit_entry(root: &Path, entry: DirEntry, max_file_size: u64) -> Option<WalkedFile> {
    let file_type = entry.file_type()?;
    if !file_type.is_file() {
        return None;
    }
    let rel_path = entry
        .path()
        .strip_prefix(root)
        .ok()?
        .to_slash()?
        .to_string();
    let file_name = rel_path.rsplit('/').next().unwrap_or(&rel_path);

    if MANIFEST_NAMES.contains(&file_name)
        || file_name.ends_with(".gemspec")
        || is_requirements_file(file_name)
    {
        return Some(WalkedFile::Manifest(rel_path));
    }
    if file_name.ends_with(".html") || file_name.ends_with(".htm") {
        return Some(WalkedFile::Html(rel_path));
    }
    if Language::from_path(&rel_path).is_some() {
        let size = entry.metadata().ok()?.len();
        if size > max_file_size {
            return None;
        }
        return Some(WalkedFile::Source(DiscoveredSource { rel_path, size }));
    }
    None
}

fn is_requirements_file(name: &str) -> bool {
    name.starts_with("requirements") && name.ends_with(".txt")
}

#[cfg(test)]
mod test {
    use logger::NullLogger;
    use pretty_assertions::assert_eq;
    use test_tmpdir::test_tmpdir;

    use super::*;

    #[test]
    fn walk_is_sorted_and_skips_vendor_dirs() {
        let tmp = test_tmpdir!(
            "src/b.ts" => "",
            "src/a.ts" => "",
            "node_modules/pkg/index.js" => "",
            "dist/bundle.js" => "",
            "package.json" => "{}",
            "public/index.html" => "<html></html>"
        );

        let discovered =
            walk_project(tmp.root(), &ScanConfig::default(), NullLogger).unwrap();
        let paths: Vec<&str> = discovered
            .sources
            .iter()
            .map(|s| s.rel_path.as_str())
            .collect();
        assert_eq!(paths, vec!["src/a.ts", "src/b.ts"]);
        assert_eq!(discovered.manifests, vec!["package.json"]);
        assert_eq!(discovered.html_files, vec!["public/index.html"]);
    }

    #[test]
    fn user_skips_and_file_cap() {
        let tmp = test_tmpdir!(
            "src/a.ts" => "",
            "src/b.ts" => "",
            "generated/c.ts" => ""
        );

        let config = ScanConfig {
            skip: vec!["generated".to_string()],
            max_files: Some(1),
            ..Default::default()
        };
        let discovered = walk_project(tmp.root(), &config, NullLogger).unwrap();
        assert_eq!(discovered.sources.len(), 1);
        assert_eq!(discovered.sources[0].rel_path, "src/a.ts");
        assert!(discovered.truncated);
    }
}
