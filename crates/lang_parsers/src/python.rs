//! Python extraction: `import`/`from ... import`, decorators, the
//! `__main__` block, and web-framework markers the entry-point classifier
//! reads.

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::{strip_hash_comments, strip_triple_quoted};
use crate::data::*;
use crate::language::Language;

lazy_static! {
    static ref IMPORT: Regex =
        Regex::new(r"(?m)^\s*import\s+([\w.]+(?:\s*,\s*[\w.]+)*)").expect("static regex");
    // `from .sub import (a, b)` — the name list may be parenthesized and
    // span lines, so it is captured lazily up to the closing paren or EOL
    static ref FROM_IMPORT: Regex =
        Regex::new(r"(?m)^\s*from\s+([.\w]+)\s+import\s+(\([^)]*\)|[^\n]+)").expect("static regex");
    static ref DEF: Regex = Regex::new(r"(?m)^(?:async\s+)?def\s+(\w+)").expect("static regex");
    static ref CLASS: Regex = Regex::new(r"(?m)^class\s+(\w+)").expect("static regex");
    static ref DECORATOR: Regex = Regex::new(r"^\s*@([\w.]+)").expect("static regex");
    static ref CLASS_LINE: Regex = Regex::new(r"^\s*class\s+(\w+)").expect("static regex");
    static ref MAIN_BLOCK: Regex =
        Regex::new(r#"if\s+__name__\s*==\s*['"]__main__['"]"#).expect("static regex");
}

pub fn parse(path: &str, content: &str, language: Language) -> ParsedFile {
    let mut file = ParsedFile::empty(path, language, content);
    let stripped = strip_hash_comments(&strip_triple_quoted(content));

    for caps in IMPORT.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        let line = line_of(&stripped, m.start());
        for module in m.as_str().split(',') {
            let module = module.split_whitespace().next().unwrap_or("");
            if module.is_empty() {
                continue;
            }
            file.imports
                .push(ImportEdge::new(module, ImportKind::Absolute, line));
        }
    }

    for caps in FROM_IMPORT.captures_iter(&stripped) {
        let module = caps.get(1).expect("group 1 always present");
        let line = line_of(&stripped, module.start());
        let kind = if module.as_str().starts_with('.') {
            ImportKind::Relative
        } else {
            ImportKind::From
        };
        let names = caps[2]
            .trim_start_matches('(')
            .trim_end_matches(')')
            .to_string();
        let mut pushed_any = false;
        for raw in names.split(',') {
            let name = raw.split_whitespace().next().unwrap_or("").trim();
            if name.is_empty() {
                continue;
            }
            let edge = if name == "*" {
                ImportEdge::new(module.as_str(), kind, line)
            } else {
                ImportEdge::new(module.as_str(), kind, line).with_symbol(name)
            };
            file.imports.push(edge);
            pushed_any = true;
        }
        if !pushed_any {
            file.imports
                .push(ImportEdge::new(module.as_str(), kind, line));
        }
    }

    for caps in DEF.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        if !name.as_str().starts_with('_') {
            file.exports.push(ExportRecord::new(
                name.as_str(),
                ExportKind::Function,
                line_of(&stripped, name.start()),
            ));
        }
    }
    for caps in CLASS.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        if !name.as_str().starts_with('_') {
            file.exports.push(ExportRecord::new(
                name.as_str(),
                ExportKind::Class,
                line_of(&stripped, name.start()),
            ));
        }
    }

    collect_decorated(&stripped, &mut file);

    file.metadata = LangMetadata::Python {
        has_main_block: MAIN_BLOCK.is_match(&stripped),
        framework_markers: framework_markers(&stripped, &file),
    };

    file
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

fn collect_decorated(stripped: &str, file: &mut ParsedFile) {
    let mut pending: Vec<AnnotationRecord> = Vec::new();
    for (i, line) in stripped.lines().enumerate() {
        let line_no = i + 1;
        if let Some(caps) = DECORATOR.captures(line) {
            let record = AnnotationRecord {
                name: caps[1].to_string(),
                line: line_no,
            };
            file.annotations.push(record.clone());
            pending.push(record);
            continue;
        }
        if let Some(caps) = CLASS_LINE.captures(line) {
            file.classes.push(ClassRecord {
                name: caps[1].to_string(),
                line: line_no,
                decorators: std::mem::take(&mut pending),
            });
            continue;
        }
        if !line.trim().is_empty() {
            pending.clear();
        }
    }
}

/// Textual markers for frameworks whose files are externally reachable
/// (route registration, task queues) even without inbound imports.
fn framework_markers(stripped: &str, file: &ParsedFile) -> Vec<String> {
    let mut markers = Vec::new();
    if stripped.contains("Flask(__name__") {
        markers.push("flask".to_string());
    }
    if stripped.contains("FastAPI(") || stripped.contains("APIRouter(") {
        markers.push("fastapi".to_string());
    }
    if stripped.contains("urlpatterns") {
        markers.push("django-urls".to_string());
    }
    let celery = file.annotations.iter().any(|a| {
        let tail = a.name.rsplit('.').next().unwrap_or(&a.name);
        tail == "task" || tail == "shared_task"
    });
    if celery {
        markers.push("celery-task".to_string());
    }
    markers
}
