//! Rust extraction: `mod` declarations (the module tree is what drives
//! reachability), `use` paths, `include!`-family macros and `#[path]`
//! attributes, plus `pub` items as exports.

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::strip_c_comments;
use crate::data::*;
use crate::language::Language;

lazy_static! {
    static ref MOD_DECL: Regex =
        Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?mod\s+(\w+)\s*;").expect("static regex");
    static ref PATH_ATTR_MOD: Regex = Regex::new(
        r#"(?m)^\s*#\[path\s*=\s*"([^"]+)"\]\s*(?:pub(?:\([^)]*\))?\s+)?mod\s+(\w+)"#
    )
    .expect("static regex");
    static ref USE_DECL: Regex =
        Regex::new(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?use\s+([\w:]+)").expect("static regex");
    static ref INCLUDE: Regex =
        Regex::new(r#"include(_str|_bytes)?!\s*\(\s*"([^"]+)"\s*\)"#).expect("static regex");
    static ref PUB_ITEM: Regex = Regex::new(
        r"(?m)^\s*pub(?:\([^)]*\))?\s+(?:unsafe\s+)?(?:async\s+)?(fn|struct|enum|trait|type|const|static|mod|union)\s+(\w+)"
    )
    .expect("static regex");
    static ref MACRO_EXPORT: Regex =
        Regex::new(r"(?m)#\[macro_export\]\s*macro_rules!\s*(\w+)").expect("static regex");
}

pub fn parse(path: &str, content: &str, language: Language) -> ParsedFile {
    let mut file = ParsedFile::empty(path, language, content);
    let stripped = strip_c_comments(content);

    // `#[path = "..."] mod x;` overrides the conventional file location,
    // so collect those names first and skip them in the plain pass
    let mut overridden: Vec<String> = Vec::new();
    for caps in PATH_ATTR_MOD.captures_iter(&stripped) {
        let target = caps.get(1).expect("group 1 always present");
        overridden.push(caps[2].to_string());
        file.imports.push(ImportEdge::new(
            target.as_str(),
            ImportKind::Include,
            line_of(&stripped, target.start()),
        ));
    }

    for caps in MOD_DECL.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        if overridden.iter().any(|m| m == name.as_str()) {
            continue;
        }
        file.imports.push(ImportEdge::new(
            name.as_str(),
            ImportKind::Mod,
            line_of(&stripped, name.start()),
        ));
    }

    for caps in USE_DECL.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        // `use serde::{..}` captures a trailing `::` before the brace
        file.imports.push(ImportEdge::new(
            m.as_str().trim_end_matches(':'),
            ImportKind::Use,
            line_of(&stripped, m.start()),
        ));
    }

    for caps in INCLUDE.captures_iter(&stripped) {
        let target = caps.get(2).expect("group 2 always present");
        let kind = match caps.get(1).map(|m| m.as_str()) {
            Some("_bytes") => ImportKind::Embed,
            _ => ImportKind::Include,
        };
        file.imports.push(ImportEdge::new(
            target.as_str(),
            kind,
            line_of(&stripped, target.start()),
        ));
    }

    for caps in PUB_ITEM.captures_iter(&stripped) {
        let keyword = caps.get(1).expect("group 1 always present");
        let name = caps.get(2).expect("group 2 always present");
        file.exports.push(ExportRecord::new(
            name.as_str(),
            item_kind(keyword.as_str()),
            line_of(&stripped, name.start()),
        ));
    }
    for caps in MACRO_EXPORT.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        file.exports.push(ExportRecord::new(
            name.as_str(),
            ExportKind::Macro,
            line_of(&stripped, name.start()),
        ));
    }

    file
}

fn item_kind(keyword: &str) -> ExportKind {
    match keyword {
        "fn" => ExportKind::Function,
        "struct" | "union" => ExportKind::Struct,
        "enum" => ExportKind::Enum,
        "trait" => ExportKind::Trait,
        "type" => ExportKind::TypeAlias,
        "const" | "static" => ExportKind::Const,
        "mod" => ExportKind::Module,
        _ => ExportKind::Other,
    }
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn mod_declarations_only_with_semicolon() {
        let src = "mod collector;\npub mod walker;\nmod inline {\n    fn f() {}\n}\n";
        let file = parse("src/lib.rs", src, Language::Rust);
        let mods: Vec<&str> = file
            .imports
            .iter()
            .filter(|i| i.kind == ImportKind::Mod)
            .map(|i| i.module.as_str())
            .collect();
        assert_eq!(mods, vec!["collector", "walker"]);
    }

    #[test]
    fn path_attribute_overrides_mod_location() {
        let src = "#[path = \"generated/schema.rs\"]\nmod schema;\nmod plain;\n";
        let file = parse("src/lib.rs", src, Language::Rust);
        let includes: Vec<&str> = file
            .imports
            .iter()
            .filter(|i| i.kind == ImportKind::Include)
            .map(|i| i.module.as_str())
            .collect();
        assert_eq!(includes, vec!["generated/schema.rs"]);
        let mods: Vec<&str> = file
            .imports
            .iter()
            .filter(|i| i.kind == ImportKind::Mod)
            .map(|i| i.module.as_str())
            .collect();
        assert_eq!(mods, vec!["plain"]);
    }

    #[test]
    fn use_paths_and_includes() {
        let src = "use crate::walker::Walker;\nuse serde::Deserialize;\nconst SQL: &str = include_str!(\"queries/init.sql\");\n";
        let file = parse("src/db.rs", src, Language::Rust);
        let uses: Vec<&str> = file
            .imports
            .iter()
            .filter(|i| i.kind == ImportKind::Use)
            .map(|i| i.module.as_str())
            .collect();
        assert_eq!(uses, vec!["crate::walker::Walker", "serde::Deserialize"]);
        assert!(file
            .imports
            .iter()
            .any(|i| i.kind == ImportKind::Include && i.module == "queries/init.sql"));
    }

    #[test]
    fn pub_items_are_exported() {
        let src = "pub fn run() {}\nfn private() {}\npub struct Scan;\npub(crate) enum Phase { A }\n#[macro_export]\nmacro_rules! logf { () => {} }\n";
        let file = parse("src/lib.rs", src, Language::Rust);
        let names: Vec<&str> = file.exports.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["run", "Scan", "Phase", "logf"]);
    }
}
