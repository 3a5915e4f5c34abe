//! Java and Kotlin extraction: package declaration, imports (plain,
//! static, wildcard), annotated type declarations and main-method
//! detection. The two languages share enough surface syntax that one
//! extractor covers both; Kotlin simply never matches the Java-only forms.

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::strip_c_comments;
use crate::data::*;
use crate::language::Language;

lazy_static! {
    static ref PACKAGE: Regex = Regex::new(r"(?m)^\s*package\s+([\w.]+)").expect("static regex");
    static ref IMPORT: Regex =
        Regex::new(r"(?m)^\s*import\s+(static\s+)?([\w.]+(?:\.\*)?)").expect("static regex");
    static ref TYPE_DECL: Regex = Regex::new(
        r"(?m)^\s*(?:public\s+|private\s+|protected\s+|open\s+|final\s+|abstract\s+|data\s+|sealed\s+|internal\s+|static\s+)*(class|interface|enum|object|record|annotation\s+class)\s+(\w+)"
    )
    .expect("static regex");
    static ref ANNOTATION: Regex = Regex::new(r"^\s*@(\w+)").expect("static regex");
    static ref JAVA_MAIN: Regex =
        Regex::new(r"(?:public\s+)?static\s+void\s+main\s*\(").expect("static regex");
    static ref KOTLIN_MAIN: Regex = Regex::new(r"(?m)^\s*fun\s+main\s*\(").expect("static regex");
    static ref KOTLIN_FUN: Regex =
        Regex::new(r"(?m)^\s*(?:suspend\s+)?fun\s+(\w+)").expect("static regex");
    static ref PRIVATE_DECL: Regex = Regex::new(r"^\s*private\b").expect("static regex");
}

const SPRING_COMPONENT_ANNOTATIONS: &[&str] = &[
    "Component",
    "Service",
    "Controller",
    "RestController",
    "Repository",
    "Configuration",
    "SpringBootApplication",
];

pub fn parse(path: &str, content: &str, language: Language) -> ParsedFile {
    let mut file = ParsedFile::empty(path, language, content);
    let stripped = strip_c_comments(content);

    let package_name = PACKAGE
        .captures(&stripped)
        .map(|caps| caps[1].to_string());

    for caps in IMPORT.captures_iter(&stripped) {
        let module = caps.get(2).expect("group 2 always present");
        let line = line_of(&stripped, module.start());
        let kind = if caps.get(1).is_some() {
            ImportKind::Static
        } else if module.as_str().ends_with(".*") {
            ImportKind::Wildcard
        } else {
            ImportKind::Absolute
        };
        // `pkg.*` is resolved through the package-directory index, not
        // expanded as a file glob
        let edge = ImportEdge {
            module: module.as_str().to_string(),
            kind,
            symbol: None,
            line,
            is_glob: false,
        };
        file.imports.push(edge);
    }

    collect_annotated_types(&stripped, &mut file);

    if language == Language::Kotlin {
        for caps in KOTLIN_FUN.captures_iter(&stripped) {
            let name = caps.get(1).expect("group 1 always present");
            file.exports.push(ExportRecord::new(
                name.as_str(),
                ExportKind::Function,
                line_of(&stripped, name.start()),
            ));
        }
    }

    let has_main_method =
        JAVA_MAIN.is_match(&stripped) || (language == Language::Kotlin && KOTLIN_MAIN.is_match(&stripped));
    let is_spring_component = file.classes.iter().any(|class| {
        class
            .decorators
            .iter()
            .any(|d| SPRING_COMPONENT_ANNOTATIONS.contains(&d.name.as_str()))
    });

    file.metadata = LangMetadata::Java {
        package_name,
        has_main_method,
        is_spring_component,
    };

    file
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

fn type_kind(keyword: &str) -> ExportKind {
    match keyword {
        "interface" => ExportKind::Interface,
        "enum" => ExportKind::Enum,
        "object" => ExportKind::Object,
        "record" => ExportKind::Record,
        _ => ExportKind::Class,
    }
}

fn collect_annotated_types(stripped: &str, file: &mut ParsedFile) {
    let mut pending: Vec<AnnotationRecord> = Vec::new();
    for (i, line) in stripped.lines().enumerate() {
        let line_no = i + 1;
        if let Some(caps) = ANNOTATION.captures(line) {
            let record = AnnotationRecord {
                name: caps[1].to_string(),
                line: line_no,
            };
            file.annotations.push(record.clone());
            pending.push(record);
            // an annotated declaration may share the line: `@Entity class X`
            if !TYPE_DECL.is_match(line) {
                continue;
            }
        }
        if let Some(caps) = TYPE_DECL.captures(line) {
            let keyword = caps.get(1).expect("group 1 always present");
            let name = caps.get(2).expect("group 2 always present");
            file.classes.push(ClassRecord {
                name: name.as_str().to_string(),
                line: line_no,
                decorators: std::mem::take(&mut pending),
            });
            if !PRIVATE_DECL.is_match(line) {
                file.exports.push(ExportRecord::new(
                    name.as_str(),
                    type_kind(keyword.as_str()),
                    line_no,
                ));
            }
            continue;
        }
        if !line.trim().is_empty() && !ANNOTATION.is_match(line) {
            pending.clear();
        }
    }
}
