//! Per-language import/export extraction.
//!
//! Every parser is a pure function of `(path, content)` built from static
//! regexes. Semantic understanding is explicitly out of scope: a missed
//! import costs reachability, a phantom import costs nothing unless it
//! resolves, and that trade drives the whole design.

pub mod comments;
mod data;
mod language;

mod elixir;
mod erlang;
mod fsharp;
mod go;
mod java;
mod javascript;
mod ocaml;
mod perl;
mod php;
mod python;
mod ruby;
mod rust_lang;
mod scala;
mod swift;
mod vbnet;
mod zig;

pub use data::{
    AnnotationRecord, ClassRecord, ExportKind, ExportRecord, ImportEdge, ImportKind, LangMetadata,
    ParsedFile,
};
pub use language::Language;

/// Parses one source file. Returns `None` for paths whose extension maps
/// to no known language.
pub fn parse_source(path: &str, content: &str) -> Option<ParsedFile> {
    let language = Language::from_path(path)?;
    Some(parse_with_language(path, content, language))
}

pub fn parse_with_language(path: &str, content: &str, language: Language) -> ParsedFile {
    use Language::*;
    match language {
        Javascript | Typescript => javascript::parse(path, content, language),
        Python => python::parse(path, content, language),
        Java | Kotlin => java::parse(path, content, language),
        Go => go::parse(path, content, language),
        Rust => rust_lang::parse(path, content, language),
        Ruby => ruby::parse(path, content, language),
        Php => php::parse(path, content, language),
        Swift => swift::parse(path, content, language),
        Scala => scala::parse(path, content, language),
        Elixir => elixir::parse(path, content, language),
        Erlang => erlang::parse(path, content, language),
        Ocaml => ocaml::parse(path, content, language),
        Fsharp => fsharp::parse(path, content, language),
        Perl => perl::parse(path, content, language),
        Zig => zig::parse(path, content, language),
        Vbnet => vbnet::parse(path, content, language),
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn dispatch_follows_extension() {
        let parsed = parse_source("src/lib.rs", "mod walker;\n").unwrap();
        assert_eq!(parsed.language, Language::Rust);
        assert_eq!(parsed.imports[0].kind, ImportKind::Mod);
        assert!(parse_source("README.md", "# nope").is_none());
    }

    #[test]
    fn parsing_is_idempotent() {
        let content = "import { a } from './a';\nexport const b = 1;\n";
        let one = parse_source("src/x.ts", content).unwrap();
        let two = parse_source("src/x.ts", content).unwrap();
        assert_eq!(one, two);
    }
}
