//! Perl: `use`/`require` module references (`Foo::Bar` -> `Foo/Bar.pm`),
//! `do FILE` inclusion, packages and subs.

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::strip_hash_comments;
use crate::data::*;
use crate::language::Language;

lazy_static! {
    static ref USE: Regex =
        Regex::new(r"(?m)^\s*use\s+(?:parent\s+|base\s+)?([A-Za-z][\w:]*)").expect("static regex");
    static ref REQUIRE_MOD: Regex =
        Regex::new(r"(?m)^\s*require\s+([A-Za-z][\w:]*)").expect("static regex");
    static ref REQUIRE_FILE: Regex =
        Regex::new(r#"(?m)^\s*(?:require|do)\s+['"]([^'"]+)['"]"#).expect("static regex");
    static ref PACKAGE: Regex = Regex::new(r"(?m)^\s*package\s+([\w:]+)").expect("static regex");
    static ref SUB: Regex = Regex::new(r"(?m)^\s*sub\s+(\w+)").expect("static regex");
}

/// Pragmas that look like module imports but configure the interpreter.
const PRAGMAS: &[&str] = &[
    "strict", "warnings", "utf8", "vars", "constant", "lib", "feature", "v5",
];

pub fn parse(path: &str, content: &str, language: Language) -> ParsedFile {
    let mut file = ParsedFile::empty(path, language, content);
    let stripped = strip_hash_comments(content);

    for re in [&*USE, &*REQUIRE_MOD] {
        for caps in re.captures_iter(&stripped) {
            let m = caps.get(1).expect("group 1 always present");
            if PRAGMAS.contains(&m.as_str()) || m.as_str().starts_with("v5") {
                continue;
            }
            file.imports.push(ImportEdge::new(
                m.as_str(),
                ImportKind::Absolute,
                line_of(&stripped, m.start()),
            ));
        }
    }
    for caps in REQUIRE_FILE.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::Include,
            line_of(&stripped, m.start()),
        ));
    }

    for caps in PACKAGE.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        file.exports.push(ExportRecord::new(
            name.as_str(),
            ExportKind::Module,
            line_of(&stripped, name.start()),
        ));
    }
    for caps in SUB.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        if !name.as_str().starts_with('_') {
            file.exports.push(ExportRecord::new(
                name.as_str(),
                ExportKind::Sub,
                line_of(&stripped, name.start()),
            ));
        }
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
    fn pragmas_are_not_imports() {
        let src = "use strict;\nuse warnings;\nuse My::Helper;\nrequire 'legacy.pl';\n\npackage My::Tool;\nsub run { }\n";
        let file = parse("tool.pl", src, Language::Perl);
        let modules: Vec<&str> = file.imports.iter().map(|i| i.module.as_str()).collect();
        assert_eq!(modules, vec!["My::Helper", "legacy.pl"]);
        let names: Vec<&str> = file.exports.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["My::Tool", "run"]);
    }
}
