//! The orchestrator: sequences knowledge loading, discovery, parallel
//! parsing, framework detection, entry classification, resolver-context
//! construction, the BFS and the dead-file computation. Recoverable
//! per-file failures are logged and skipped; only cancellation and host
//! faults surface to the caller.

use std::path::Path;

use ahashmap::{AHashMap, AHashSet};
use anyhow::Context;
use knowledge::KnowledgeBase;
use lang_parsers::{parse_source, ParsedFile};
use logger::Logger;
use manifests::{CargoManifest, ComposerJson, GoMod, PackageJson, TsconfigJson};
use module_resolver::paths::dirname;
use module_resolver::{ResolverContext, ResolverInputs};
use rayon::prelude::*;

use crate::cfg::ScanConfig;
use crate::entrypoints::{EntryClassifier, EntryInputs};
use crate::framework::{detect_frameworks, RootManifests};
use crate::graph::GraphWalker;
use crate::progress::{CancelToken, ProgressEvent, ProgressHandler, ScanError, ScanPhase};
use crate::report::{DeadExport, DeadFile, ScanResult};
use crate::walk::{walk_project, Discovered};

pub fn scan(
    project_root: impl AsRef<Path>,
    config: &ScanConfig,
    logger: impl Logger + Sync,
    progress: impl ProgressHandler,
    cancel: &CancelToken,
) -> Result<ScanResult, ScanError> {
    let root = project_root.as_ref();
    let check = |token: &CancelToken| -> Result<(), ScanError> {
        if token.is_cancelled() {
            Err(ScanError::Cancelled)
        } else {
            Ok(())
        }
    };
    check(cancel)?;

    let kb = KnowledgeBase::with_overrides(
        config.knowledge_dir.as_deref().map(Path::new),
        &logger,
    );

    progress.on_progress(ProgressEvent::phase(ScanPhase::Discovery));
    let discovered = walk_project(root, config, &logger)?;
    progress.on_progress(
        ProgressEvent::phase(ScanPhase::Discovery)
            .with_files_found(discovered.sources.len()),
    );
    check(cancel)?;

    let total = discovered.sources.len();
    progress.on_progress(ProgressEvent::phase(ScanPhase::Parsing).with_counts(0, total));
    let (files, contents) = parse_all(root, &discovered, config, &logger, &progress, cancel)?;
    check(cancel)?;
    logger.log(format!("parsed {} of {} source files", files.len(), total));

    progress.on_progress(ProgressEvent::phase(ScanPhase::Analysis));
    let loaded = load_manifests(root, &discovered.manifests, &logger);
    let frameworks = detect_frameworks(root, &kb, &loaded.root_manifests(), &logger);
    let ctx = ResolverContext::build(&files, &loaded.resolver_inputs);
    check(cancel)?;

    let entry_inputs = EntryInputs {
        kb: &kb,
        ctx: &ctx,
        files: &files,
        contents: &contents,
        packages: &loaded.resolver_inputs.packages,
        cargo_manifests: &loaded.cargo,
        composers: &loaded.composers,
        gemspecs: &loaded.gemspecs,
        html_files: &discovered.html_files,
        frameworks: &frameworks,
        project_root: root,
    };
    let entry_points = EntryClassifier::classify(&entry_inputs, &logger);
    logger.log(format!("{} entry points", entry_points.len()));
    check(cancel)?;

    progress.on_progress(ProgressEvent::phase(ScanPhase::Graph));
    let entry_paths: Vec<String> = entry_points.iter().map(|e| e.file.clone()).collect();
    let walker = GraphWalker::new(&files, &ctx, &kb, &contents, &logger);
    let reachable = walker.walk(&entry_paths);
    check(cancel)?;

    progress.on_progress(ProgressEvent::phase(ScanPhase::Detection));
    let entry_set: AHashSet<&str> = entry_paths.iter().map(String::as_str).collect();
    let mut dead_files = Vec::new();
    for file in &files {
        if entry_set.contains(file.path.as_str()) || reachable.contains(&file.path) {
            continue;
        }
        if kb.is_false_positive(&file.path) {
            continue;
        }
        let empty = contents
            .get(&file.path)
            .map(|c| c.trim().is_empty())
            .unwrap_or(true);
        if empty {
            continue;
        }
        dead_files.push(DeadFile {
            file: file.path.clone(),
            size: file.size,
            lines: file.lines,
            language: file.language,
            exports: file
                .exports
                .iter()
                .map(|e| DeadExport {
                    name: e.name.clone(),
                    kind: e.kind,
                })
                .collect(),
        });
    }

    Ok(ScanResult::assemble(
        dead_files,
        entry_points,
        files.len(),
        reachable.len(),
    ))
}

/// Reads and parses every discovered source in parallel, then merges in
/// path order so downstream indexes are reproducible.
fn parse_all(
    root: &Path,
    discovered: &Discovered,
    config: &ScanConfig,
    logger: &(impl Logger + Sync),
    progress: &impl ProgressHandler,
    cancel: &CancelToken,
) -> Result<(Vec<ParsedFile>, AHashMap<String, String>), ScanError> {
    let total = discovered.sources.len();
    let parse_one = |source: &crate::walk::DiscoveredSource| -> Option<(ParsedFile, String)> {
        if cancel.is_cancelled() {
            return None;
        }
        let content = match read_source(root, &source.rel_path) {
            Ok(Some(content)) => content,
            Ok(None) => return None, // binary
            Err(e) => {
                logger.warn(format!("skipping {}: {e:#}", source.rel_path));
                return None;
            }
        };
        let mut parsed = parse_source(&source.rel_path, &content)?;
        parsed.size = source.size;
        Some((parsed, content))
    };

    let mut pairs: Vec<(ParsedFile, String)> = if config.workers > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .build()
            .context("building parser thread pool")?;
        pool.install(|| {
            discovered
                .sources
                .par_iter()
                .filter_map(parse_one)
                .collect()
        })
    } else {
        discovered
            .sources
            .par_iter()
            .filter_map(parse_one)
            .collect()
    };
    if cancel.is_cancelled() {
        return Err(ScanError::Cancelled);
    }

    pairs.sort_by(|a, b| a.0.path.cmp(&b.0.path));
    progress.on_progress(ProgressEvent::phase(ScanPhase::Parsing).with_counts(pairs.len(), total));

    let mut files = Vec::with_capacity(pairs.len());
    let mut contents = AHashMap::default();
    for (parsed, content) in pairs {
        contents.insert(parsed.path.clone(), content);
        files.push(parsed);
    }
    Ok((files, contents))
}

/// `Ok(None)` for binary files (NUL byte in the first 8 KiB).
fn read_source(root: &Path, rel_path: &str) -> anyhow::Result<Option<String>> {
    let bytes = std::fs::read(root.join(rel_path))
        .with_context(|| format!("reading {rel_path}"))?;
    let sniff_len = bytes.len().min(8192);
    if bytes[..sniff_len].contains(&0) {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

pub(crate) struct LoadedManifests {
    pub resolver_inputs: ResolverInputs,
    pub cargo: Vec<(String, CargoManifest)>,
    pub composers: Vec<(String, ComposerJson)>,
    pub gemspecs: Vec<String>,
    pub go_mod: Option<GoMod>,
}

impl LoadedManifests {
    fn root_manifests(&self) -> RootManifests<'_> {
        RootManifests {
            package: self
                .resolver_inputs
                .packages
                .iter()
                .find(|(dir, _)| dir.is_empty())
                .map(|(_, m)| m),
            composer: self
                .composers
                .iter()
                .find(|(dir, _)| dir.is_empty())
                .map(|(_, m)| m),
            cargo: self
                .cargo
                .iter()
                .find(|(dir, _)| dir.is_empty())
                .map(|(_, m)| m),
            go_mod: self.go_mod.as_ref(),
        }
    }
}

/// A malformed manifest degrades to an empty one: entry-point coverage
/// shrinks, the scan continues.
fn load_manifests(
    root: &Path,
    manifest_paths: &[String],
    logger: &impl Logger,
) -> LoadedManifests {
    let mut resolver_inputs = ResolverInputs::default();
    let mut cargo = Vec::new();
    let mut composers = Vec::new();
    let mut gemspecs = Vec::new();
    let mut go_mod: Option<GoMod> = None;

    for rel in manifest_paths {
        let dir = dirname(rel).to_string();
        let abs = root.join(rel);
        let name = rel.rsplit('/').next().unwrap_or(rel);
        match name {
            "package.json" => {
                let manifest = match PackageJson::from_path(&abs) {
                    Ok(Some(m)) => m,
                    Ok(None) => continue,
                    Err(e) => {
                        logger.warn(format!("unparseable {rel}: {e:#}; treating as empty"));
                        PackageJson::default()
                    }
                };
                resolver_inputs.packages.push((dir, manifest));
            }
            "tsconfig.json" => match TsconfigJson::from_path(&abs) {
                Ok(Some(tsconfig)) => resolver_inputs.tsconfigs.push((dir, tsconfig)),
                Ok(None) => {}
                Err(e) => logger.warn(format!("unparseable {rel}: {e:#}; ignoring")),
            },
            "Cargo.toml" => match CargoManifest::from_path(&abs) {
                Ok(Some(manifest)) => cargo.push((dir, manifest)),
                Ok(None) => {}
                Err(e) => {
                    logger.warn(format!("unparseable {rel}: {e:#}; treating as empty"));
                    cargo.push((dir, CargoManifest::default()));
                }
            },
            "composer.json" => match ComposerJson::from_path(&abs) {
                Ok(Some(manifest)) => composers.push((dir, manifest)),
                Ok(None) => {}
                Err(e) => {
                    logger.warn(format!("unparseable {rel}: {e:#}; treating as empty"));
                    composers.push((dir, ComposerJson::default()));
                }
            },
            "go.mod" => match GoMod::from_path(&abs) {
                // the root module wins when nested modules exist
                Ok(Some(parsed)) => {
                    if dir.is_empty() || go_mod.is_none() {
                        go_mod = Some(parsed);
                    }
                }
                Ok(None) => {}
                Err(e) => logger.warn(format!("unparseable {rel}: {e:#}; ignoring")),
            },
            _ if name.ends_with(".gemspec") => gemspecs.push(rel.clone()),
            // pom.xml, build.gradle, Gemfile, requirement files: consumed
            // as raw text by the framework detector
            _ => {}
        }
    }

    resolver_inputs.go_module_path = go_mod.as_ref().map(|m| m.module_path.clone());
    LoadedManifests {
        resolver_inputs,
        cargo,
        composers,
        gemspecs,
        go_mod,
    }
}
