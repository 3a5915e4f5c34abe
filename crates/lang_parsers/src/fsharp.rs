//! F#: `open` references, `#load` script inclusion, modules and bindings.

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::strip_ml_comments;
use crate::data::*;
use crate::language::Language;

lazy_static! {
    static ref OPEN: Regex = Regex::new(r"(?m)^\s*open\s+([\w.]+)").expect("static regex");
    static ref LOAD: Regex = Regex::new(r#"(?m)^\s*#load\s+"([^"]+)""#).expect("static regex");
    static ref MODULE: Regex =
        Regex::new(r"(?m)^module\s+(?:rec\s+)?([\w.]+)").expect("static regex");
    static ref LET: Regex =
        Regex::new(r"(?m)^\s*let\s+(?:rec\s+)?(?:private\s+)?([a-z_]\w*)").expect("static regex");
    static ref TYPE: Regex = Regex::new(r"(?m)^\s*type\s+(\w+)").expect("static regex");
}

pub fn parse(path: &str, content: &str, language: Language) -> ParsedFile {
    let mut file = ParsedFile::empty(path, language, content);
    let stripped = strip_ml_comments(content);

    for caps in OPEN.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::Open,
            line_of(&stripped, m.start()),
        ));
    }
    for caps in LOAD.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::Include,
            line_of(&stripped, m.start()),
        ));
    }

    for caps in MODULE.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        file.exports.push(ExportRecord::new(
            name.as_str(),
            ExportKind::Module,
            line_of(&stripped, name.start()),
        ));
    }
    for caps in LET.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        file.exports.push(ExportRecord::new(
            name.as_str(),
            ExportKind::Function,
            line_of(&stripped, name.start()),
        ));
    }
    for caps in TYPE.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        file.exports.push(ExportRecord::new(
            name.as_str(),
            ExportKind::TypeAlias,
            line_of(&stripped, name.start()),
        ));
    }

    file
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn loads_are_file_relative_includes() {
        let src = "module Tool\n\nopen System.IO\n#load \"helpers.fsx\"\nlet main argv = 0\n";
        let file = parse("build.fsx", src, Language::Fsharp);
        assert!(file
            .imports
            .iter()
            .any(|i| i.kind == ImportKind::Include && i.module == "helpers.fsx"));
        assert!(file.exports.iter().any(|e| e.name == "Tool"));
    }
}
