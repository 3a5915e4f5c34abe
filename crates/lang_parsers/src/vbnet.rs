//! VB.NET: `Imports` namespace references and type declarations. Comments
//! use `'`, which doubles as nothing else in VB, so stripping is simple.

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::strip_vb_comments;
use crate::data::*;
use crate::language::Language;

lazy_static! {
    static ref IMPORTS: Regex =
        Regex::new(r"(?mi)^\s*Imports\s+([\w.]+)").expect("static regex");
    static ref TYPE_DECL: Regex = Regex::new(
        r"(?mi)^\s*(?:Public\s+|Friend\s+|Partial\s+|NotInheritable\s+|MustInherit\s+)*(Class|Module|Structure|Interface|Enum)\s+(\w+)"
    )
    .expect("static regex");
    static ref SUB_MAIN: Regex =
        Regex::new(r"(?mi)^\s*(?:Public\s+|Shared\s+)*Sub\s+Main\b").expect("static regex");
}

pub fn parse(path: &str, content: &str, language: Language) -> ParsedFile {
    let mut file = ParsedFile::empty(path, language, content);
    let stripped = strip_vb_comments(content);

    for caps in IMPORTS.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::Absolute,
            line_of(&stripped, m.start()),
        ));
    }

    for caps in TYPE_DECL.captures_iter(&stripped) {
        let keyword = caps.get(1).expect("group 1 always present");
        let name = caps.get(2).expect("group 2 always present");
        let kind = match keyword.as_str().to_ascii_lowercase().as_str() {
            "module" => ExportKind::Module,
            "structure" => ExportKind::Struct,
            "interface" => ExportKind::Interface,
            "enum" => ExportKind::Enum,
            _ => ExportKind::Class,
        };
        let line = line_of(&stripped, name.start());
        file.exports
            .push(ExportRecord::new(name.as_str(), kind, line));
        file.classes.push(ClassRecord {
            name: name.as_str().to_string(),
            line,
            decorators: Vec::new(),
        });
    }

    if let Some(m) = SUB_MAIN.find(&stripped) {
        file.annotations.push(AnnotationRecord {
            name: "Main".to_string(),
            line: line_of(&stripped, m.start()),
        });
    }

    file
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}
