//! Zig: `@import` (file-relative `.zig` paths or package names) and
//! `@embedFile` assets, plus `pub` declarations.

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::strip_c_comments;
use crate::data::*;
use crate::language::Language;

lazy_static! {
    static ref IMPORT: Regex =
        Regex::new(r#"@import\(\s*"([^"]+)"\s*\)"#).expect("static regex");
    static ref EMBED: Regex =
        Regex::new(r#"@embedFile\(\s*"([^"]+)"\s*\)"#).expect("static regex");
    static ref PUB_DECL: Regex =
        Regex::new(r"(?m)^\s*pub\s+(?:export\s+)?(fn|const|var)\s+(\w+)").expect("static regex");
}

pub fn parse(path: &str, content: &str, language: Language) -> ParsedFile {
    let mut file = ParsedFile::empty(path, language, content);
    let stripped = strip_c_comments(content);

    for caps in IMPORT.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        let kind = if m.as_str().ends_with(".zig") {
            ImportKind::Relative
        } else {
            ImportKind::Absolute
        };
        file.imports
            .push(ImportEdge::new(m.as_str(), kind, line_of(&stripped, m.start())));
    }
    for caps in EMBED.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::Embed,
            line_of(&stripped, m.start()),
        ));
    }

    for caps in PUB_DECL.captures_iter(&stripped) {
        let keyword = caps.get(1).expect("group 1 always present");
        let name = caps.get(2).expect("group 2 always present");
        let kind = match keyword.as_str() {
            "fn" => ExportKind::Function,
            _ => ExportKind::Const,
        };
        file.exports.push(ExportRecord::new(
            name.as_str(),
            kind,
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
    fn file_imports_are_relative() {
        let src = "const std = @import(\"std\");\nconst util = @import(\"util.zig\");\nconst logo = @embedFile(\"assets/logo.png\");\n\npub fn main() !void {}\n";
        let file = parse("src/main.zig", src, Language::Zig);
        assert_eq!(file.imports[0].kind, ImportKind::Absolute);
        assert_eq!(file.imports[1].kind, ImportKind::Relative);
        assert_eq!(file.imports[1].module, "util.zig");
        assert_eq!(file.imports[2].kind, ImportKind::Embed);
        assert_eq!(file.exports[0].name, "main");
    }
}
