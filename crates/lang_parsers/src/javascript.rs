//! JavaScript / TypeScript extraction (also `.jsx/.tsx/.mjs/.cjs/.mts/.cts`).
//!
//! ES module syntax, CommonJS `require`, dynamic `import()`, re-export
//! chains and `require.context` directory globs. TypeScript decorators are
//! recorded on classes for DI detection.

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::{strip_c_comments, LineIndex};
use crate::data::*;
use crate::language::Language;

lazy_static! {
    // `import defaultName, { a, b } from 'mod'` / `import * as ns from 'mod'`
    // The clause charset excludes quotes so side-effect imports never match.
    static ref IMPORT_FROM: Regex =
        Regex::new(r#"import\s+(?:type\s+)?[\w$*{},\s]+?from\s*['"]([^'"\n]+)['"]"#).expect("static regex");
    static ref IMPORT_SIDE_EFFECT: Regex =
        Regex::new(r#"import\s*['"]([^'"\n]+)['"]"#).expect("static regex");
    static ref DYNAMIC_IMPORT: Regex =
        Regex::new(r#"import\(\s*['"]([^'"\n]+)['"]\s*\)"#).expect("static regex");
    static ref REQUIRE: Regex =
        Regex::new(r#"require(?:\.resolve)?\(\s*['"]([^'"\n]+)['"]\s*\)"#).expect("static regex");
    static ref REQUIRE_CONTEXT: Regex =
        Regex::new(r#"require\.context\(\s*['"]([^'"\n]+)['"]"#).expect("static regex");
    static ref EXPORT_STAR: Regex =
        Regex::new(r#"export\s+\*(?:\s+as\s+([\w$]+))?\s*from\s*['"]([^'"\n]+)['"]"#).expect("static regex");
    // one pattern for `export { a, b }` and `export { a } from 'mod'`;
    // the optional tail decides which it was
    static ref EXPORT_BRACE: Regex =
        Regex::new(r#"export\s+(?:type\s+)?\{([^}]*)\}(\s*from\s*['"]([^'"\n]+)['"])?"#).expect("static regex");
    static ref EXPORT_DECL: Regex = Regex::new(
        r#"export\s+(?:declare\s+)?(?:abstract\s+)?(async\s+function\*?|function\*?|class|const|let|var|type|interface|enum|namespace)\s+([\w$]+)"#
    ).expect("static regex");
    static ref EXPORT_DEFAULT: Regex = Regex::new(r"export\s+default\b").expect("static regex");
    static ref MODULE_EXPORTS: Regex = Regex::new(r"module\.exports\s*=").expect("static regex");
    static ref DECORATOR_LINE: Regex =
        Regex::new(r"^\s*@([A-Za-z_$][\w$]*)").expect("static regex");
    static ref CLASS_DECL: Regex =
        Regex::new(r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?class\s+([\w$]+)")
            .expect("static regex");
}

fn decl_kind(keyword: &str) -> ExportKind {
    match keyword {
        "class" => ExportKind::Class,
        "type" => ExportKind::TypeAlias,
        "interface" => ExportKind::Interface,
        "enum" => ExportKind::Enum,
        "const" | "let" | "var" => ExportKind::Const,
        "namespace" => ExportKind::Module,
        _ => ExportKind::Function,
    }
}

fn relative_or_bare(module: &str) -> ImportKind {
    if module.starts_with('.') || module.starts_with('/') {
        ImportKind::Relative
    } else {
        ImportKind::Absolute
    }
}

pub fn parse(path: &str, content: &str, language: Language) -> ParsedFile {
    let mut file = ParsedFile::empty(path, language, content);
    let stripped = strip_c_comments(content);
    let lines = LineIndex::new(&stripped);

    for caps in IMPORT_FROM.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            relative_or_bare(m.as_str()),
            lines.line_of(m.start()),
        ));
    }
    for caps in IMPORT_SIDE_EFFECT.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        // IMPORT_FROM already claimed anything with a clause
        if stripped[..m.start()].trim_end().ends_with("from") {
            continue;
        }
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::SideEffect,
            lines.line_of(m.start()),
        ));
    }
    for caps in DYNAMIC_IMPORT.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            relative_or_bare(m.as_str()),
            lines.line_of(m.start()),
        ));
    }
    for caps in REQUIRE.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::Require,
            lines.line_of(m.start()),
        ));
    }
    for caps in REQUIRE_CONTEXT.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        // the runtime enumerates the directory; model it as a glob over it
        let mut edge = ImportEdge::new(
            format!("{}/**", m.as_str().trim_end_matches('/')),
            ImportKind::Glob,
            lines.line_of(m.start()),
        );
        edge.is_glob = true;
        file.imports.push(edge);
    }

    for caps in EXPORT_STAR.captures_iter(&stripped) {
        let module = caps.get(2).expect("group 2 always present");
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or("*");
        file.exports.push(ExportRecord::re_export(
            name,
            module.as_str(),
            lines.line_of(module.start()),
        ));
    }
    for caps in EXPORT_BRACE.captures_iter(&stripped) {
        let names = caps.get(1).expect("group 1 always present");
        let line = lines.line_of(names.start());
        let source = caps.get(3).map(|m| m.as_str());
        for raw in names.as_str().split(',') {
            let name = raw
                .split_whitespace()
                .last()
                .unwrap_or("")
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '_' && c != '$');
            if name.is_empty() {
                continue;
            }
            match source {
                Some(module) => file
                    .exports
                    .push(ExportRecord::re_export(name, module, line)),
                None => file
                    .exports
                    .push(ExportRecord::new(name, ExportKind::Other, line)),
            }
        }
    }
    for caps in EXPORT_DECL.captures_iter(&stripped) {
        let keyword = caps.get(1).expect("group 1 always present");
        let name = caps.get(2).expect("group 2 always present");
        file.exports.push(ExportRecord::new(
            name.as_str(),
            decl_kind(keyword.as_str()),
            lines.line_of(name.start()),
        ));
    }
    if let Some(m) = EXPORT_DEFAULT.find(&stripped) {
        file.exports.push(ExportRecord::new(
            "default",
            ExportKind::Default,
            lines.line_of(m.start()),
        ));
    }
    if let Some(m) = MODULE_EXPORTS.find(&stripped) {
        file.exports.push(ExportRecord::new(
            "default",
            ExportKind::Default,
            lines.line_of(m.start()),
        ));
    }

    collect_decorated_classes(&stripped, &mut file);

    file
}

/// Stacks `@Decorator(...)` lines onto the class declaration that follows
/// them. Any other non-blank line resets the stack.
fn collect_decorated_classes(stripped: &str, file: &mut ParsedFile) {
    let mut pending: Vec<AnnotationRecord> = Vec::new();
    for (i, line) in stripped.lines().enumerate() {
        let line_no = i + 1;
        if let Some(caps) = DECORATOR_LINE.captures(line) {
            let record = AnnotationRecord {
                name: caps[1].to_string(),
                line: line_no,
            };
            file.annotations.push(record.clone());
            pending.push(record);
            continue;
        }
        if let Some(caps) = CLASS_DECL.captures(line) {
            file.classes.push(ClassRecord {
                name: caps[1].to_string(),
                line: line_no,
                decorators: std::mem::take(&mut pending),
            });
            continue;
        }
        if !line.trim().is_empty() {
            pending.clear();
        }
    }
}
