//! The reachability walker: a single-threaded BFS from the entry-point
//! set over import edges plus the language-specific linking rules
//! (same-package units, Rust module trees, re-export chains). Glob
//! imports and directory-scanning auto-loaders are expanded into seeds
//! before the walk starts.
//!
//! The queue is a plain `Vec` advanced by index; nothing is ever shifted
//! off the front.

use ahashmap::{AHashMap, AHashSet};
use knowledge::KnowledgeBase;
use lang_parsers::{ImportEdge, ImportKind, LangMetadata, ParsedFile};
use lazy_static::lazy_static;
use logger::Logger;
use module_resolver::paths::{basename, dirname, is_dead_named, join_normalize};
use module_resolver::{resolve_edge, ResolverContext};
use regex::Regex;

lazy_static! {
    static ref AUTOLOADER: Regex =
        Regex::new(r"requireDirectory|readdirSync\(\s*__dirname|glob\.sync|globSync")
            .expect("static regex");
}

pub struct GraphWalker<'a, L: Logger> {
    files: &'a [ParsedFile],
    path_to_id: AHashMap<&'a str, usize>,
    ctx: &'a ResolverContext,
    kb: &'a KnowledgeBase,
    contents: &'a AHashMap<String, String>,
    logger: L,
    visited: Vec<bool>,
    queue: Vec<usize>,
}

impl<'a, L: Logger> GraphWalker<'a, L> {
    pub fn new(
        files: &'a [ParsedFile],
        ctx: &'a ResolverContext,
        kb: &'a KnowledgeBase,
        contents: &'a AHashMap<String, String>,
        logger: L,
    ) -> Self {
        let mut path_to_id = AHashMap::default();
        for (id, file) in files.iter().enumerate() {
            path_to_id.insert(file.path.as_str(), id);
        }
        Self {
            visited: vec![false; files.len()],
            queue: Vec::with_capacity(files.len()),
            files,
            path_to_id,
            ctx,
            kb,
            contents,
            logger,
        }
    }

    /// Runs the BFS and returns the reachable set. Deterministic for a
    /// given parsed-file order and entry list.
    pub fn walk(mut self, entry_points: &[String]) -> AHashSet<String> {
        for path in entry_points {
            self.enqueue_path(path);
        }
        for path in self.glob_import_seeds() {
            self.enqueue_path(&path);
        }
        for path in self.autoloader_seeds() {
            self.enqueue_path(&path);
        }

        let mut head = 0usize;
        while head < self.queue.len() {
            let id = self.queue[head];
            head += 1;
            self.visit(id);
        }

        self.visited
            .iter()
            .enumerate()
            .filter(|(_, seen)| **seen)
            .map(|(id, _)| self.files[id].path.clone())
            .collect()
    }

    fn enqueue_path(&mut self, path: &str) {
        match self.path_to_id.get(path) {
            Some(&id) => {
                if !self.visited[id] {
                    self.visited[id] = true;
                    self.queue.push(id);
                }
            }
            None => {
                self.logger
                    .log(format!("frontier file not in graph: {path}"));
            }
        }
    }

    fn visit(&mut self, id: usize) {
        let file = &self.files[id];
        let mut targets: Vec<String> = Vec::new();

        self.same_package_targets(file, &mut targets);

        // import edges, through the resolver
        let filter = self.kb.framework_filter(file.language.as_str());
        for edge in &file.imports {
            if edge.is_glob {
                continue; // expanded before the walk
            }
            targets.extend(resolve_edge(self.ctx, file, edge, filter));
        }

        // re-export chains keep barrel targets alive
        for export in &file.exports {
            if let Some(source) = &export.source_module {
                let edge = ImportEdge::new(source.as_str(), ImportKind::ReExport, export.line);
                if !edge.is_glob {
                    targets.extend(resolve_edge(self.ctx, file, &edge, filter));
                }
            }
        }

        for target in targets {
            self.enqueue_known(&target);
        }
    }

    /// Like enqueue_path but silent: resolver output is already known to
    /// exist, and repeats are common.
    fn enqueue_known(&mut self, path: &str) {
        if let Some(&id) = self.path_to_id.get(path) {
            if !self.visited[id] {
                self.visited[id] = true;
                self.queue.push(id);
            }
        }
    }

    /// Go compiles a package from every non-test file in its directory;
    /// Java and Kotlin link a package's files the same way. Reaching one
    /// file of the unit reaches them all.
    fn same_package_targets(&self, file: &ParsedFile, targets: &mut Vec<String>) {
        match &file.metadata {
            LangMetadata::Go { is_test_file, .. } => {
                if !is_test_file
                    && !is_dead_named(file.basename())
                    && self.kb.same_package_linking(file.language.as_str())
                {
                    if let Some(siblings) = self.ctx.go_files_by_dir.get(file.dir()) {
                        targets.extend(siblings.iter().cloned());
                    }
                }
            }
            LangMetadata::Java {
                package_name: Some(pkg),
                ..
            } => {
                if self.kb.same_package_linking(file.language.as_str()) {
                    if let Some(members) = self.ctx.java_package_dir_map.get(pkg) {
                        targets.extend(
                            members
                                .iter()
                                .filter(|p| !is_dead_named(basename(p)))
                                .cloned(),
                        );
                    }
                }
            }
            _ => {}
        }
    }

    /// Every file matched by any glob import anywhere becomes a seed;
    /// the walk then propagates from those files normally.
    fn glob_import_seeds(&self) -> Vec<String> {
        let mut patterns: Vec<glob::Pattern> = Vec::new();
        for file in self.files {
            for edge in &file.imports {
                if !edge.is_glob {
                    continue;
                }
                let raw = if edge.module.starts_with('.') {
                    match join_normalize(file.dir(), &edge.module) {
                        Some(joined) => joined,
                        None => continue,
                    }
                } else {
                    edge.module.clone()
                };
                match glob::Pattern::new(&raw) {
                    Ok(pattern) => patterns.push(pattern),
                    Err(e) => {
                        self.logger
                            .log(format!("unusable glob import {:?}: {e}", edge.module));
                    }
                }
            }
        }
        if patterns.is_empty() {
            return Vec::new();
        }

        self.files
            .iter()
            .filter(|f| patterns.iter().any(|p| p.matches(&f.path)))
            .map(|f| f.path.clone())
            .collect()
    }

    /// Index files that enumerate their own directory at runtime
    /// (`readdirSync(__dirname)`, glob.sync, require-directory) keep
    /// every sibling alive; static tracing cannot see those edges.
    fn autoloader_seeds(&self) -> Vec<String> {
        let mut seeds = Vec::new();
        for file in self.files {
            if !file.basename().starts_with("index.") {
                continue;
            }
            let Some(content) = self.contents.get(&file.path) else {
                continue;
            };
            if AUTOLOADER.is_match(content) {
                seeds.push(file.path.clone());
                if let Some(siblings) = self.ctx.dir_index.get(dirname(&file.path)) {
                    seeds.extend(siblings.iter().cloned());
                }
            }
        }
        seeds
    }
}

#[cfg(test)]
mod test {
    use logger::NullLogger;
    use module_resolver::ResolverInputs;
    use pretty_assertions::assert_eq;

    use super::*;

    fn walk_files(
        specs: &[(&str, &str)],
        entries: &[&str],
    ) -> Vec<String> {
        let files: Vec<ParsedFile> = specs
            .iter()
            .filter_map(|(path, content)| lang_parsers::parse_source(path, content))
            .collect();
        let contents: AHashMap<String, String> = specs
            .iter()
            .map(|(path, content)| (path.to_string(), content.to_string()))
            .collect();
        let ctx = ResolverContext::build(&files, &ResolverInputs::default());
        let kb = knowledge::KnowledgeBase::embedded(NullLogger);
        let walker = GraphWalker::new(&files, &ctx, &kb, &contents, NullLogger);
        let entries: Vec<String> = entries.iter().map(|s| s.to_string()).collect();
        let mut reachable: Vec<String> = walker.walk(&entries).into_iter().collect();
        reachable.sort();
        reachable
    }

    #[test]
    fn follows_import_chains() {
        let reachable = walk_files(
            &[
                ("src/index.ts", "import './a';\n"),
                ("src/a.ts", "import './b';\n"),
                ("src/b.ts", "export const b = 1;\n"),
                ("src/orphan.ts", "export const o = 1;\n"),
            ],
            &["src/index.ts"],
        );
        assert_eq!(reachable, vec!["src/a.ts", "src/b.ts", "src/index.ts"]);
    }

    #[test]
    fn re_export_chain_keeps_target_alive() {
        let reachable = walk_files(
            &[
                ("src/index.ts", "import { x } from './barrel';\n"),
                ("src/barrel.ts", "export * from './real';\n"),
                ("src/real.ts", "export const x = 1;\n"),
            ],
            &["src/index.ts"],
        );
        assert_eq!(
            reachable,
            vec!["src/barrel.ts", "src/index.ts", "src/real.ts"]
        );
    }

    #[test]
    fn go_same_directory_linking() {
        let reachable = walk_files(
            &[
                ("pkg/main.go", "package main\n\nfunc main() {}\n"),
                ("pkg/util.go", "package main\n\nfunc helper() {}\n"),
                ("pkg/util_test.go", "package main\n"),
                ("other/lone.go", "package other\n"),
            ],
            &["pkg/main.go"],
        );
        assert_eq!(reachable, vec!["pkg/main.go", "pkg/util.go"]);
    }

    #[test]
    fn java_same_package_linking() {
        let reachable = walk_files(
            &[
                (
                    "src/com/acme/A.java",
                    "package com.acme;\npublic class A {}\n",
                ),
                (
                    "src/com/acme/B.java",
                    "package com.acme;\npublic class B {}\n",
                ),
                (
                    "src/com/other/C.java",
                    "package com.other;\npublic class C {}\n",
                ),
            ],
            &["src/com/acme/A.java"],
        );
        assert_eq!(
            reachable,
            vec!["src/com/acme/A.java", "src/com/acme/B.java"]
        );
    }

    #[test]
    fn rust_module_tree() {
        let reachable = walk_files(
            &[
                ("src/main.rs", "mod collector;\n"),
                ("src/collector.rs", "pub fn collect() {}\n"),
                ("src/stale.rs", "pub fn stale() {}\n"),
            ],
            &["src/main.rs"],
        );
        assert_eq!(reachable, vec!["src/collector.rs", "src/main.rs"]);
    }

    #[test]
    fn glob_imports_pre_expand() {
        let reachable = walk_files(
            &[
                (
                    "src/host.ts",
                    "const mods = require.context('./plugins', true);\n",
                ),
                ("src/plugins/a.ts", "import '../deep';\n"),
                ("src/deep.ts", "export const d = 1;\n"),
                ("src/unrelated.ts", "export const u = 1;\n"),
            ],
            &["src/host.ts"],
        );
        assert_eq!(
            reachable,
            vec![
                "src/deep.ts",
                "src/host.ts",
                "src/plugins/a.ts"
            ]
        );
    }

    #[test]
    fn autoloader_index_pulls_directory() {
        let reachable = walk_files(
            &[
                (
                    "src/commands/index.js",
                    "const fs = require('fs');\nconst files = fs.readdirSync(__dirname);\n",
                ),
                ("src/commands/deploy.js", "module.exports = () => {};\n"),
                ("src/away.js", "module.exports = 1;\n"),
            ],
            &["src/commands/index.js"],
        );
        assert_eq!(
            reachable,
            vec!["src/commands/deploy.js", "src/commands/index.js"]
        );
    }
}
