//! Scala: imports, non-private top-level declarations (including `given`
//! instances), and `extends App` / `def main` detection via annotations.

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::strip_c_comments;
use crate::data::*;
use crate::language::Language;

lazy_static! {
    static ref IMPORT: Regex =
        Regex::new(r"(?m)^\s*import\s+([\w.]+)").expect("static regex");
    static ref DECL: Regex = Regex::new(
        r"(?m)^\s*(?:(private|protected)\s+)?(?:final\s+|implicit\s+|sealed\s+|abstract\s+|case\s+)*(class|trait|object|enum|given|type|def)\s+(\w+)"
    )
    .expect("static regex");
    static ref MAIN_MARKER: Regex =
        Regex::new(r"extends\s+App\b|def\s+main\s*\(").expect("static regex");
}

pub fn parse(path: &str, content: &str, language: Language) -> ParsedFile {
    let mut file = ParsedFile::empty(path, language, content);
    let stripped = strip_c_comments(content);

    for caps in IMPORT.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::Absolute,
            line_of(&stripped, m.start()),
        ));
    }

    for caps in DECL.captures_iter(&stripped) {
        if caps.get(1).is_some() {
            continue;
        }
        let keyword = caps.get(2).expect("group 2 always present");
        let name = caps.get(3).expect("group 3 always present");
        let line = line_of(&stripped, name.start());
        file.exports
            .push(ExportRecord::new(name.as_str(), decl_kind(keyword.as_str()), line));
        if matches!(keyword.as_str(), "class" | "object" | "trait") {
            file.classes.push(ClassRecord {
                name: name.as_str().to_string(),
                line,
                decorators: Vec::new(),
            });
        }
    }

    if let Some(m) = MAIN_MARKER.find(&stripped) {
        file.annotations.push(AnnotationRecord {
            name: "main".to_string(),
            line: line_of(&stripped, m.start()),
        });
    }

    file
}

fn decl_kind(keyword: &str) -> ExportKind {
    match keyword {
        "class" => ExportKind::Class,
        "trait" => ExportKind::Trait,
        "object" => ExportKind::Object,
        "enum" => ExportKind::Enum,
        "given" => ExportKind::Given,
        "type" => ExportKind::TypeAlias,
        _ => ExportKind::Function,
    }
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}
