//! End-to-end scans over fixture trees: the literal boundary scenarios
//! the reachability pipeline must get right, plus the universal
//! invariants (entry ⊆ reachable, determinism, dead-set complement).

use dead_finder::{scan, CancelToken, NoProgress, ScanConfig, ScanError, ScanResult};
use logger::NullLogger;
use pretty_assertions::assert_eq;
use test_tmpdir::{test_tmpdir, TmpDir};

fn run(tmp: &TmpDir) -> ScanResult {
    scan(
        tmp.root(),
        &ScanConfig::default(),
        NullLogger,
        NoProgress,
        &CancelToken::new(),
    )
    .expect("scan should succeed")
}

fn dead_paths(result: &ScanResult) -> Vec<&str> {
    let mut paths: Vec<&str> = result.dead_files.iter().map(|f| f.file.as_str()).collect();
    paths.sort();
    paths
}

fn entry_files(result: &ScanResult) -> Vec<&str> {
    result.entry_points.iter().map(|e| e.file.as_str()).collect()
}

// scenario A: everything imported from the declared main is alive
#[test]
fn fully_reachable_project_has_no_dead_files() {
    let tmp = test_tmpdir!(
        "package.json" => r#"{ "name": "demo", "main": "src/index.ts" }"#,
        "src/index.ts" => "import { helper } from './util';\nhelper();\n",
        "src/util.ts" => "export function helper() {}\n"
    );
    let result = run(&tmp);
    assert_eq!(dead_paths(&result), Vec::<&str>::new());
    assert!(entry_files(&result).contains(&"src/index.ts"));
    assert_eq!(result.summary.dead_rate, "0.00%");
}

// scenario B: an orphan module is dead
#[test]
fn orphan_file_is_reported_dead() {
    let tmp = test_tmpdir!(
        "package.json" => r#"{ "name": "demo", "main": "src/index.ts" }"#,
        "src/index.ts" => "import { helper } from './util';\n",
        "src/util.ts" => "export function helper() {}\n",
        "src/orphan.ts" => "export const unused = 1;\n"
    );
    let result = run(&tmp);
    assert_eq!(dead_paths(&result), vec!["src/orphan.ts"]);
    let orphan = &result.dead_files[0];
    assert_eq!(orphan.language.as_str(), "typescript");
    assert_eq!(orphan.exports[0].name, "unused");
}

// scenario C: re-export chains keep barrel targets alive
#[test]
fn barrel_re_export_keeps_target_alive() {
    let tmp = test_tmpdir!(
        "package.json" => r#"{ "name": "demo", "main": "src/index.ts" }"#,
        "src/index.ts" => "import { x } from './barrel';\n",
        "src/barrel.ts" => "export * from './real';\n",
        "src/real.ts" => "export const x = 1;\n"
    );
    let result = run(&tmp);
    assert_eq!(dead_paths(&result), Vec::<&str>::new());
}

// scenario D: workspace exports map with dist -> src rewrite
#[test]
fn workspace_exports_map_rewrites_dist_to_src() {
    let tmp = test_tmpdir!(
        "package.json" => r#"{ "name": "root", "workspaces": ["pkgs/*"] }"#,
        "pkgs/a/package.json" => r#"{ "name": "@org/a", "exports": { "./x": "./dist/x.js" } }"#,
        "pkgs/a/src/x.ts" => "export const x = 1;\n",
        "pkgs/b/package.json" => r#"{ "name": "@org/b", "main": "src/index.ts" }"#,
        "pkgs/b/src/index.ts" => "import { x } from '@org/a/x';\n"
    );
    let result = run(&tmp);
    assert!(!dead_paths(&result).contains(&"pkgs/a/src/x.ts"));
}

// scenario E: rust 2015 layout from a module root
#[test]
fn rust_mod_from_main_rs_resolves_sibling() {
    let tmp = test_tmpdir!(
        "Cargo.toml" => "[package]\nname = \"demo\"\n",
        "src/main.rs" => "mod collector;\n\nfn main() {}\n",
        "src/collector.rs" => "pub fn collect() {}\n"
    );
    let result = run(&tmp);
    assert_eq!(dead_paths(&result), Vec::<&str>::new());
}

// scenario F: rust 2018 layout from a non-root file
#[test]
fn rust_mod_from_plain_file_resolves_nested() {
    let tmp = test_tmpdir!(
        "Cargo.toml" => "[package]\nname = \"demo\"\n",
        "src/main.rs" => "mod nameres;\n\nfn main() {}\n",
        "src/nameres.rs" => "mod collector;\n",
        "src/nameres/collector.rs" => "pub fn collect() {}\n"
    );
    let result = run(&tmp);
    assert_eq!(dead_paths(&result), Vec::<&str>::new());
}

// scenario G: java same-package linking
#[test]
fn java_same_package_files_live_together() {
    let tmp = test_tmpdir!(
        "lib/com/acme/Main.java" =>
            "package com.acme;\n\npublic class Main {\n    public static void main(String[] args) {}\n}\n",
        "lib/com/acme/Helper.java" =>
            "package com.acme;\n\npublic class Helper {}\n",
        "lib/com/lone/Unused.java" =>
            "package com.lone;\n\npublic class Unused {}\n"
    );
    let result = run(&tmp);
    assert_eq!(dead_paths(&result), vec!["lib/com/lone/Unused.java"]);
}

// scenario H: go same-directory package linking
#[test]
fn go_package_directory_lives_together() {
    let tmp = test_tmpdir!(
        "go.mod" => "module example.com/demo\n",
        "pkg/main.go" => "package main\n\nfunc main() {}\n",
        "pkg/util.go" => "package main\n\nfunc helper() {}\n",
        "stray/attic.go" => "package attic\n\nfunc Forgotten() {}\n"
    );
    let result = run(&tmp);
    assert_eq!(dead_paths(&result), vec!["stray/attic.go"]);
}

// scenario I: python relative import from a package __init__
#[test]
fn python_relative_import_reaches_submodule() {
    let tmp = test_tmpdir!(
        "main.py" => "import app\n\nif __name__ == '__main__':\n    pass\n",
        "app/__init__.py" => "from .sub import x\n",
        "app/sub.py" => "x = 1\n",
        "app/forgotten.py" => "y = 2\n"
    );
    let result = run(&tmp);
    assert_eq!(dead_paths(&result), vec!["app/forgotten.py"]);
}

#[test]
fn entry_points_are_subset_of_reachable_and_counts_agree() {
    let tmp = test_tmpdir!(
        "package.json" => r#"{ "name": "demo", "main": "src/index.ts" }"#,
        "src/index.ts" => "import './a';\n",
        "src/a.ts" => "export {};\n",
        "src/orphan.ts" => "export const nope = 1;\n"
    );
    let result = run(&tmp);
    assert!(result.summary.entry_points <= result.summary.reachable_files);
    assert_eq!(
        result.summary.total_files,
        result.summary.reachable_files + result.summary.dead_files
    );
}

#[test]
fn scans_are_deterministic() {
    let tmp = test_tmpdir!(
        "package.json" => r#"{ "name": "demo", "main": "src/index.ts" }"#,
        "src/index.ts" => "import './a';\nimport './b';\n",
        "src/a.ts" => "import './b';\n",
        "src/b.ts" => "export {};\n",
        "src/dead1.ts" => "export const a = 1;\n",
        "src/dead2.ts" => "export const b = 2;\n"
    );
    let first = run(&tmp);
    let second = run(&tmp);
    assert_eq!(first, second);
}

#[test]
fn empty_files_are_not_reported_dead() {
    let tmp = test_tmpdir!(
        "package.json" => r#"{ "name": "demo", "main": "src/index.ts" }"#,
        "src/index.ts" => "export {};\n",
        "src/empty.ts" => "   \n\n"
    );
    let result = run(&tmp);
    assert_eq!(dead_paths(&result), Vec::<&str>::new());
}

#[test]
fn unreachable_generated_code_is_reported_dead() {
    let tmp = test_tmpdir!(
        "package.json" => r#"{ "name": "demo", "main": "src/index.ts" }"#,
        "src/index.ts" => "import { live } from './generated/schema';\n",
        "src/generated/schema.ts" => "export const live = 1;\n",
        "src/generated/stale.ts" => "export const stale = 1;\n",
        "proto/api_pb2.py" => "class Api:\n    pass\n"
    );
    let result = run(&tmp);
    // generated files follow normal reachability: the imported one lives,
    // the rest land in the dead set like any other file
    assert_eq!(
        dead_paths(&result),
        vec!["proto/api_pb2.py", "src/generated/stale.ts"]
    );
}

#[test]
fn cancellation_returns_distinguished_error() {
    let tmp = test_tmpdir!(
        "src/index.ts" => "export {};\n"
    );
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = scan(
        tmp.root(),
        &ScanConfig::default(),
        NullLogger,
        NoProgress,
        &cancel,
    )
    .unwrap_err();
    assert!(matches!(err, ScanError::Cancelled));
}

#[test]
fn di_container_reference_keeps_class_file_alive() {
    let tmp = test_tmpdir!(
        "package.json" => r#"{ "name": "demo", "main": "src/index.ts" }"#,
        "src/index.ts" => "import { container } from './container';\ncontainer.get(MailService);\n",
        "src/container.ts" => "export const container = { get: (x: unknown) => x };\n",
        "src/mail-service.ts" => "export class MailService {}\n"
    );
    let result = run(&tmp);
    assert!(!dead_paths(&result).contains(&"src/mail-service.ts"));
    assert!(result
        .entry_points
        .iter()
        .any(|e| e.file == "src/mail-service.ts"
            && e.reason.contains("di container reference")));
}

#[test]
fn test_files_are_entry_points_not_dead() {
    let tmp = test_tmpdir!(
        "package.json" => r#"{ "name": "demo", "main": "src/index.ts" }"#,
        "src/index.ts" => "export {};\n",
        "src/util.test.ts" => "import './helper-only-tests';\n",
        "src/helper-only-tests.ts" => "export const h = 1;\n"
    );
    let result = run(&tmp);
    // the test file is an entry, and what only it imports stays alive
    assert_eq!(dead_paths(&result), Vec::<&str>::new());
}

#[test]
fn progress_phases_arrive_in_order() {
    use std::sync::Mutex;

    let tmp = test_tmpdir!(
        "package.json" => r#"{ "name": "demo", "main": "src/index.ts" }"#,
        "src/index.ts" => "export {};\n"
    );
    let phases: Mutex<Vec<dead_finder::ScanPhase>> = Mutex::new(Vec::new());
    scan(
        tmp.root(),
        &ScanConfig::default(),
        NullLogger,
        |event: dead_finder::ProgressEvent| {
            phases.lock().unwrap().push(event.phase);
        },
        &CancelToken::new(),
    )
    .unwrap();

    let seen = phases.into_inner().unwrap();
    use dead_finder::ScanPhase::*;
    let mut deduped = seen.clone();
    deduped.dedup();
    assert_eq!(deduped, vec![Discovery, Parsing, Analysis, Graph, Detection]);
}
