//! On-disk shapes of the four knowledge pools.
//!
//! Every pool is a directory of JSON files, one file per entity. A file
//! that fails to deserialize is skipped with a warning; it never poisons
//! the rest of the pool.

use ahashmap::AHashMap;
use serde::Deserialize;

/// An annotation that marks a file as externally reachable, together with
/// the human-readable reason recorded in the scan result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntryAnnotation {
    pub name: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResolutionStrategy {
    pub order: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImportResolution {
    #[serde(default)]
    pub strategies: Vec<ResolutionStrategy>,
}

/// Import prefixes that belong to the platform or external frameworks.
/// A module reference starting with one of these resolves to nothing
/// inside the project.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FrameworkFilter {
    #[serde(default)]
    pub prefixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LanguageRules {
    pub language: String,
    pub version: String,
    pub file_extensions: Vec<String>,
    /// Keyed by framework name; each entry is a group of annotations that
    /// mark entry points when that framework is in play.
    #[serde(default)]
    pub entry_point_annotations: AHashMap<String, Vec<EntryAnnotation>>,
    #[serde(default)]
    pub import_resolution: ImportResolution,
    #[serde(default)]
    pub framework_filter: FrameworkFilter,
    /// True for languages whose compilation unit is a directory or
    /// package (Go, Java, Kotlin): reaching one file keeps the unit alive.
    #[serde(default)]
    pub same_package_linking: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DetectionSignals {
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub build_files: Vec<String>,
    #[serde(default)]
    pub go_imports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FrameworkRules {
    pub framework: String,
    #[serde(default)]
    pub detection: DetectionSignals,
    /// Path regexes contributed to the entry-point classifier once the
    /// framework is detected.
    #[serde(default)]
    pub entry_patterns: Vec<String>,
    #[serde(default)]
    pub entry_annotations: Vec<String>,
    #[serde(default)]
    pub di_decorators: Vec<String>,
    #[serde(default)]
    pub special_files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PatternRules {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub file_patterns: Vec<String>,
    #[serde(default)]
    pub di_container_patterns: Vec<String>,
}

/// A path a human reviewed and declared alive despite the scanner's
/// verdict. Excluded from future dead lists.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FalsePositive {
    pub path: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// A promoted entry-point pattern from the learned pool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LearnedPattern {
    pub pattern: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}
