//! Serde models for the project manifests the scanner consults: npm
//! `package.json`, `Cargo.toml`, `go.mod`, `composer.json` and
//! `tsconfig.json`, plus the anchored Python-requirements matcher.
//!
//! Loaders return `Ok(None)` for a missing file; a malformed manifest is
//! an error the caller downgrades to an empty manifest so the scan
//! continues with degraded entry-point coverage.

mod cargo_toml;
mod composer_json;
mod go_mod;
mod package_json;
mod python_deps;
mod tsconfig;

pub use cargo_toml::{CargoManifest, CargoPackage, CargoTarget, CargoWorkspace};
pub use composer_json::{ComposerAutoload, ComposerJson};
pub use go_mod::GoMod;
pub use package_json::{PackageJson, DYNAMIC_ENTRY_FIELDS};
pub use python_deps::declares_python_dependency;
pub use tsconfig::{TsconfigCompilerOptions, TsconfigJson};
