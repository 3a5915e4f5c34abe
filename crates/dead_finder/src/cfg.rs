//! Scan configuration: a serde-deserialized JSON proxy validated into the
//! runtime config, with glob lists compiled up front so bad patterns fail
//! before any I/O happens.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Eq, PartialEq)]
pub struct ErrList<E>(pub Vec<E>);

impl<E: Display> Display for ErrList<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for err in &self.0 {
            writeln!(f, "{}", err)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct PatErr(pub usize, pub globset::Error);

impl Display for PatErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "In pattern at idx {}: {:#}", self.0, self.1)
    }
}

impl PartialEq for PatErr {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
            && self.1.glob() == other.1.glob()
            && self.1.kind() == other.1.kind()
    }
}
impl Eq for PatErr {}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Error parsing skip glob(s): {0}")]
    InvalidSkipGlob(ErrList<PatErr>),
}

/// JSON-facing proxy for [`ScanConfig`], deserialized from a config file.
#[derive(Debug, Default, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanJSONConfig {
    /// Globs of files and directories to skip during the walk, on top of
    /// the built-in vendor/build exclusions.
    #[serde(default)]
    pub skip: Vec<String>,
    /// Parser worker threads; 0 picks the rayon default.
    #[serde(default)]
    pub workers: usize,
    /// Soft cap on the number of files the walk will yield.
    #[serde(default)]
    pub max_files: Option<usize>,
    /// Per-file size cap in bytes; larger files are skipped as
    /// generated/vendored blobs.
    #[serde(default)]
    pub max_file_size: Option<u64>,
    /// Optional knowledge directory overlaid over the embedded pools.
    #[serde(default)]
    pub knowledge_dir: Option<String>,
}

const DEFAULT_MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub skip: Vec<String>,
    pub workers: usize,
    pub max_files: Option<usize>,
    pub max_file_size: u64,
    pub knowledge_dir: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            skip: Vec::new(),
            workers: 0,
            max_files: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            knowledge_dir: None,
        }
    }
}

impl TryFrom<ScanJSONConfig> for ScanConfig {
    type Error = ConfigError;

    fn try_from(value: ScanJSONConfig) -> Result<Self, Self::Error> {
        let errs: Vec<PatErr> = value
            .skip
            .iter()
            .enumerate()
            .filter_map(|(idx, pattern)| match globset::Glob::new(pattern) {
                Ok(_) => None,
                Err(err) => Some(PatErr(idx, err)),
            })
            .collect_vec();
        if !errs.is_empty() {
            return Err(ConfigError::InvalidSkipGlob(ErrList(errs)));
        }

        Ok(ScanConfig {
            skip: value.skip,
            workers: value.workers,
            max_files: value.max_files,
            max_file_size: value.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE),
            knowledge_dir: value.knowledge_dir,
        })
    }
}
