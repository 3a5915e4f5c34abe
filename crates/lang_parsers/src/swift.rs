//! Swift: module imports and `public`/`open` declarations. `@main` and
//! the application-delegate attributes are recorded as annotations.

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::strip_c_comments;
use crate::data::*;
use crate::language::Language;

lazy_static! {
    static ref IMPORT: Regex =
        Regex::new(r"(?m)^\s*(?:@testable\s+)?import\s+([\w.]+)").expect("static regex");
    static ref PUBLIC_DECL: Regex = Regex::new(
        r"(?m)^\s*(?:public|open)\s+(?:final\s+)?(class|struct|enum|protocol|actor|extension|func|var|let|typealias)\s+(\w+)"
    )
    .expect("static regex");
    static ref ATTRIBUTE: Regex =
        Regex::new(r"(?m)^\s*@(main|UIApplicationMain|NSApplicationMain)\b").expect("static regex");
    static ref TYPE_DECL: Regex = Regex::new(
        r"(?m)^\s*(?:public\s+|open\s+|final\s+)*(?:class|struct|actor)\s+(\w+)"
    )
    .expect("static regex");
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

    for caps in PUBLIC_DECL.captures_iter(&stripped) {
        let keyword = caps.get(1).expect("group 1 always present");
        let name = caps.get(2).expect("group 2 always present");
        file.exports.push(ExportRecord::new(
            name.as_str(),
            decl_kind(keyword.as_str()),
            line_of(&stripped, name.start()),
        ));
    }

    for caps in ATTRIBUTE.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        file.annotations.push(AnnotationRecord {
            name: name.as_str().to_string(),
            line: line_of(&stripped, name.start()),
        });
    }

    for caps in TYPE_DECL.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        file.classes.push(ClassRecord {
            name: name.as_str().to_string(),
            line: line_of(&stripped, name.start()),
            decorators: Vec::new(),
        });
    }

    file
}

fn decl_kind(keyword: &str) -> ExportKind {
    match keyword {
        "class" => ExportKind::Class,
        "struct" => ExportKind::Struct,
        "enum" => ExportKind::Enum,
        "protocol" => ExportKind::Protocol,
        "actor" => ExportKind::Actor,
        "extension" => ExportKind::Extension,
        "func" => ExportKind::Function,
        "typealias" => ExportKind::TypeAlias,
        _ => ExportKind::Const,
    }
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn public_and_open_only() {
        let src = "import Foundation\n\npublic struct Payload {}\nopen class Base {}\ninternal struct Hidden {}\n@main\nstruct App {}\n";
        let file = parse("Sources/App.swift", src, Language::Swift);
        let names: Vec<&str> = file.exports.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Payload", "Base"]);
        assert_eq!(file.annotations[0].name, "main");
        assert_eq!(file.imports[0].module, "Foundation");
    }
}
