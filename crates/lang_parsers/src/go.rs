//! Go extraction: import blocks, package clause, `main`/`init` and test
//! files. Exported symbols are the capitalised top-level declarations.

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::strip_c_comments;
use crate::data::*;
use crate::language::Language;

lazy_static! {
    static ref PACKAGE: Regex = Regex::new(r"(?m)^package\s+(\w+)").expect("static regex");
    static ref IMPORT_SINGLE: Regex =
        Regex::new(r#"(?m)^import\s+(?:[\w.]+\s+)?"([^"]+)""#).expect("static regex");
    static ref IMPORT_BLOCK: Regex =
        Regex::new(r"(?ms)^import\s*\((.*?)\)").expect("static regex");
    static ref IMPORT_LINE: Regex =
        Regex::new(r#"(?:[\w.]+\s+|_\s+)?"([^"]+)""#).expect("static regex");
    static ref FUNC: Regex =
        Regex::new(r"(?m)^func\s+(?:\([^)]*\)\s+)?([A-Za-z_]\w*)").expect("static regex");
    static ref TYPE: Regex = Regex::new(r"(?m)^type\s+([A-Za-z_]\w*)").expect("static regex");
    static ref MAIN_FUNC: Regex = Regex::new(r"(?m)^func\s+main\s*\(").expect("static regex");
    static ref INIT_FUNC: Regex = Regex::new(r"(?m)^func\s+init\s*\(").expect("static regex");
    static ref EMBED: Regex =
        Regex::new(r"(?m)^//go:embed\s+(.+)$").expect("static regex");
}

pub fn parse(path: &str, content: &str, language: Language) -> ParsedFile {
    let mut file = ParsedFile::empty(path, language, content);

    // embed directives live in comments, so read them before stripping
    for caps in EMBED.captures_iter(content) {
        let line = line_of(content, caps.get(1).expect("group 1 always present").start());
        for pattern in caps[1].split_whitespace() {
            let mut edge = ImportEdge::new(pattern, ImportKind::Embed, line);
            edge.is_glob = pattern.contains('*');
            file.imports.push(edge);
        }
    }

    let stripped = strip_c_comments(content);

    for caps in IMPORT_SINGLE.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::Absolute,
            line_of(&stripped, m.start()),
        ));
    }
    for block in IMPORT_BLOCK.captures_iter(&stripped) {
        let body = block.get(1).expect("group 1 always present");
        let base = body.start();
        for caps in IMPORT_LINE.captures_iter(body.as_str()) {
            let m = caps.get(1).expect("group 1 always present");
            file.imports.push(ImportEdge::new(
                m.as_str(),
                ImportKind::Absolute,
                line_of(&stripped, base + m.start()),
            ));
        }
    }

    for caps in FUNC.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        if name.as_str().starts_with(char::is_uppercase) {
            file.exports.push(ExportRecord::new(
                name.as_str(),
                ExportKind::Function,
                line_of(&stripped, name.start()),
            ));
        }
    }
    for caps in TYPE.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        if name.as_str().starts_with(char::is_uppercase) {
            file.exports.push(ExportRecord::new(
                name.as_str(),
                ExportKind::Struct,
                line_of(&stripped, name.start()),
            ));
        }
    }

    let package = PACKAGE.captures(&stripped).map(|c| c[1].to_string());
    file.metadata = LangMetadata::Go {
        is_main_package: package.as_deref() == Some("main"),
        has_main_function: MAIN_FUNC.is_match(&stripped),
        has_init_function: INIT_FUNC.is_match(&stripped),
        is_test_file: path.ends_with("_test.go"),
    };

    file
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn import_block_and_aliases() {
        let src = "package server\n\nimport (\n\t\"fmt\"\n\tapi \"example.com/mod/api\"\n\t_ \"example.com/mod/driver\"\n)\n\nimport \"strings\"\n";
        let file = parse("server/server.go", src, Language::Go);
        let modules: Vec<&str> = file.imports.iter().map(|i| i.module.as_str()).collect();
        assert_eq!(
            modules,
            vec![
                "strings",
                "fmt",
                "example.com/mod/api",
                "example.com/mod/driver"
            ]
        );
    }

    #[test]
    fn main_package_metadata() {
        let src = "package main\n\nfunc main() {}\nfunc init() {}\n";
        let file = parse("cmd/app/main.go", src, Language::Go);
        assert_eq!(
            file.metadata,
            LangMetadata::Go {
                is_main_package: true,
                has_main_function: true,
                has_init_function: true,
                is_test_file: false,
            }
        );
    }

    #[test]
    fn test_files_are_flagged() {
        let file = parse("pkg/util_test.go", "package util\n", Language::Go);
        assert!(matches!(
            file.metadata,
            LangMetadata::Go { is_test_file: true, .. }
        ));
    }

    #[test]
    fn exported_names_are_capitalized_only() {
        let src = "package util\n\nfunc Public() {}\nfunc private() {}\ntype Thing struct{}\n";
        let file = parse("pkg/util.go", src, Language::Go);
        let names: Vec<&str> = file.exports.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Public", "Thing"]);
    }

    #[test]
    fn embed_directives_survive_comment_stripping() {
        let src = "package assets\n\n//go:embed static/* templates/index.html\nvar content embed.FS\n";
        let file = parse("assets/assets.go", src, Language::Go);
        let embeds: Vec<(&str, bool)> = file
            .imports
            .iter()
            .map(|i| (i.module.as_str(), i.is_glob))
            .collect();
        assert_eq!(
            embeds,
            vec![("static/*", true), ("templates/index.html", false)]
        );
    }
}
