//! The scan result: the stable shape external collaborators consume,
//! plus a human-readable `Display` for terminal use.

use std::collections::BTreeMap;
use std::fmt::Display;

use lang_parsers::{ExportKind, Language};
use serde::Serialize;

use crate::entrypoints::EntryPoint;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadExport {
    pub name: String,
    pub kind: ExportKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadFile {
    pub file: String,
    pub size: u64,
    pub lines: usize,
    pub language: Language,
    pub exports: Vec<DeadExport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub total_files: usize,
    pub entry_points: usize,
    pub reachable_files: usize,
    pub dead_files: usize,
    /// Formatted as "NN.NN%".
    pub dead_rate: String,
    pub total_dead_bytes: u64,
    /// Dead-file count per language; languages with no dead files are
    /// omitted.
    pub languages: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Sorted by size descending, then path, so the biggest wins surface
    /// first.
    pub dead_files: Vec<DeadFile>,
    pub entry_points: Vec<EntryPoint>,
    pub summary: ScanSummary,
}

impl ScanResult {
    pub fn assemble(
        mut dead_files: Vec<DeadFile>,
        entry_points: Vec<EntryPoint>,
        total_files: usize,
        reachable_files: usize,
    ) -> Self {
        dead_files.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.file.cmp(&b.file)));

        let dead_rate = if total_files == 0 {
            "0.00%".to_string()
        } else {
            format!(
                "{:.2}%",
                dead_files.len() as f64 * 100.0 / total_files as f64
            )
        };
        let total_dead_bytes = dead_files.iter().map(|f| f.size).sum();
        let mut languages: BTreeMap<String, usize> = BTreeMap::new();
        for file in &dead_files {
            *languages
                .entry(file.language.as_str().to_string())
                .or_default() += 1;
        }

        let summary = ScanSummary {
            total_files,
            entry_points: entry_points.len(),
            reachable_files,
            dead_files: dead_files.len(),
            dead_rate,
            total_dead_bytes,
            languages,
        };

        Self {
            dead_files,
            entry_points,
            summary,
        }
    }
}

impl Display for ScanResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} of {} files dead ({}), {} bytes reclaimable",
            self.summary.dead_files,
            self.summary.total_files,
            self.summary.dead_rate,
            self.summary.total_dead_bytes,
        )?;
        for (language, count) in &self.summary.languages {
            writeln!(f, "  {language}: {count}")?;
        }
        for file in &self.dead_files {
            let exports = if file.exports.is_empty() {
                String::new()
            } else {
                format!(
                    " ({} export{})",
                    file.exports.len(),
                    if file.exports.len() > 1 { "s" } else { "" }
                )
            };
            writeln!(
                f,
                "{}  [{} lines, {} bytes]{exports}",
                file.file, file.lines, file.size
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn dead(file: &str, size: u64, language: Language) -> DeadFile {
        DeadFile {
            file: file.to_string(),
            size,
            lines: 1,
            language,
            exports: Vec::new(),
        }
    }

    #[test]
    fn summary_counts_and_sorting() {
        let result = ScanResult::assemble(
            vec![
                dead("small.ts", 10, Language::Typescript),
                dead("big.py", 500, Language::Python),
                dead("mid.ts", 100, Language::Typescript),
            ],
            vec![EntryPoint {
                file: "index.ts".to_string(),
                reason: "package.json main".to_string(),
            }],
            10,
            7,
        );

        let order: Vec<&str> = result.dead_files.iter().map(|f| f.file.as_str()).collect();
        assert_eq!(order, vec!["big.py", "mid.ts", "small.ts"]);
        assert_eq!(result.summary.dead_rate, "30.00%");
        assert_eq!(result.summary.total_dead_bytes, 610);
        assert_eq!(result.summary.languages.get("typescript"), Some(&2));
        assert_eq!(result.summary.languages.get("python"), Some(&1));
    }

    #[test]
    fn serializes_to_camel_case() {
        let result = ScanResult::assemble(vec![], vec![], 0, 0);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["summary"]["deadRate"].is_string());
        assert!(json["summary"]["totalDeadBytes"].is_u64());
        assert!(json["deadFiles"].is_array());
    }
}
