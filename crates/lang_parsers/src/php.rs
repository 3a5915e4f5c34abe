//! PHP: `require`/`include` path inclusion, namespace `use` imports, and
//! top-level functions/classes (all exportable).

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::strip_php_comments;
use crate::data::*;
use crate::language::Language;

lazy_static! {
    static ref INCLUDE: Regex = Regex::new(
        r#"(?:require|include)(?:_once)?\s*\(?\s*(?:__DIR__\s*\.\s*)?['"]([^'"]+)['"]"#
    )
    .expect("static regex");
    static ref USE_NS: Regex =
        Regex::new(r"(?m)^\s*use\s+([\w\\]+)(?:\s+as\s+\w+)?\s*;").expect("static regex");
    static ref NAMESPACE: Regex =
        Regex::new(r"(?m)^\s*namespace\s+([\w\\]+)").expect("static regex");
    static ref FUNCTION: Regex =
        Regex::new(r"(?m)^\s*function\s+(\w+)").expect("static regex");
    static ref TYPE_DECL: Regex = Regex::new(
        r"(?m)^\s*(?:final\s+|abstract\s+)*(class|interface|trait|enum)\s+(\w+)"
    )
    .expect("static regex");
}

pub fn parse(path: &str, content: &str, language: Language) -> ParsedFile {
    let mut file = ParsedFile::empty(path, language, content);
    let stripped = strip_php_comments(content);

    for caps in INCLUDE.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::Include,
            line_of(&stripped, m.start()),
        ));
    }
    for caps in USE_NS.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::Use,
            line_of(&stripped, m.start()),
        ));
    }

    for caps in FUNCTION.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        file.exports.push(ExportRecord::new(
            name.as_str(),
            ExportKind::Function,
            line_of(&stripped, name.start()),
        ));
    }
    for caps in TYPE_DECL.captures_iter(&stripped) {
        let keyword = caps.get(1).expect("group 1 always present");
        let name = caps.get(2).expect("group 2 always present");
        let kind = match keyword.as_str() {
            "interface" => ExportKind::Interface,
            "trait" => ExportKind::Trait,
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

    file
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn include_forms() {
        let src = "<?php\nrequire_once __DIR__ . '/bootstrap.php';\ninclude('legacy/init.php');\nuse App\\Services\\Mailer;\n\nclass Kernel {}\n";
        let file = parse("app/Kernel.php", src, Language::Php);
        let includes: Vec<&str> = file
            .imports
            .iter()
            .filter(|i| i.kind == ImportKind::Include)
            .map(|i| i.module.as_str())
            .collect();
        assert_eq!(includes, vec!["/bootstrap.php", "legacy/init.php"]);
        assert!(file
            .imports
            .iter()
            .any(|i| i.kind == ImportKind::Use && i.module == "App\\Services\\Mailer"));
        assert_eq!(file.classes[0].name, "Kernel");
    }
}
