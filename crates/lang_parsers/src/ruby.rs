//! Ruby: `require`/`require_relative`/`load`, top-level classes and
//! modules. Every top-level `class`/`module` is exportable.

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::strip_hash_comments;
use crate::data::*;
use crate::language::Language;

lazy_static! {
    static ref REQUIRE: Regex =
        Regex::new(r#"(?m)^\s*require\s+['"]([^'"]+)['"]"#).expect("static regex");
    static ref REQUIRE_RELATIVE: Regex =
        Regex::new(r#"(?m)^\s*require_relative\s+['"]([^'"]+)['"]"#).expect("static regex");
    static ref LOAD: Regex =
        Regex::new(r#"(?m)^\s*load\s+['"]([^'"]+)['"]"#).expect("static regex");
    static ref TYPE_DECL: Regex =
        Regex::new(r"(?m)^(class|module)\s+([A-Z]\w*)").expect("static regex");
    static ref METHOD: Regex = Regex::new(r"(?m)^def\s+(\w+)").expect("static regex");
}

pub fn parse(path: &str, content: &str, language: Language) -> ParsedFile {
    let mut file = ParsedFile::empty(path, language, content);
    let stripped = strip_hash_comments(content);

    for caps in REQUIRE_RELATIVE.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::Relative,
            line_of(&stripped, m.start()),
        ));
    }
    for caps in REQUIRE.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::Require,
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

    for caps in TYPE_DECL.captures_iter(&stripped) {
        let keyword = caps.get(1).expect("group 1 always present");
        let name = caps.get(2).expect("group 2 always present");
        let kind = if keyword.as_str() == "module" {
            ExportKind::Module
        } else {
            ExportKind::Class
        };
        file.exports.push(ExportRecord::new(
            name.as_str(),
            kind,
            line_of(&stripped, name.start()),
        ));
        file.classes.push(ClassRecord {
            name: name.as_str().to_string(),
            line: line_of(&stripped, name.start()),
            decorators: Vec::new(),
        });
    }
    for caps in METHOD.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        file.exports.push(ExportRecord::new(
            name.as_str(),
            ExportKind::Function,
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
    fn requires_split_by_kind() {
        let src = "require 'json'\nrequire_relative 'lib/helper'\n\nclass Widget\nend\n";
        let file = parse("widget.rb", src, Language::Ruby);
        assert_eq!(file.imports[0].module, "lib/helper");
        assert_eq!(file.imports[0].kind, ImportKind::Relative);
        assert_eq!(file.imports[1].module, "json");
        assert_eq!(file.imports[1].kind, ImportKind::Require);
        assert_eq!(file.exports[0].name, "Widget");
    }
}
