//! OCaml: `open`/`include` module references and top-level bindings.
//! Module names map to files by lowercasing the first letter
//! (`Foo_bar` -> `foo_bar.ml`), which the resolver exploits.

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::strip_ml_comments;
use crate::data::*;
use crate::language::Language;

lazy_static! {
    static ref OPEN: Regex =
        Regex::new(r"(?m)^\s*open\s+([A-Z][\w.]*)").expect("static regex");
    static ref INCLUDE_MOD: Regex =
        Regex::new(r"(?m)^\s*include\s+([A-Z][\w.]*)").expect("static regex");
    static ref LET: Regex = Regex::new(r"(?m)^let\s+(?:rec\s+)?([a-z_]\w*)").expect("static regex");
    static ref TYPE: Regex = Regex::new(r"(?m)^type\s+(?:\([^)]*\)\s+|'\w+\s+)?(\w+)").expect("static regex");
    static ref MODULE: Regex =
        Regex::new(r"(?m)^module\s+(?:type\s+)?([A-Z]\w*)").expect("static regex");
    static ref EXCEPTION: Regex = Regex::new(r"(?m)^exception\s+(\w+)").expect("static regex");
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
    for caps in INCLUDE_MOD.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::Open,
            line_of(&stripped, m.start()),
        ));
    }

    for (re, kind) in [
        (&*LET, ExportKind::Function),
        (&*TYPE, ExportKind::TypeAlias),
        (&*MODULE, ExportKind::Module),
        (&*EXCEPTION, ExportKind::Exception),
    ] {
        for caps in re.captures_iter(&stripped) {
            let name = caps.get(1).expect("group 1 always present");
            file.exports.push(ExportRecord::new(
                name.as_str(),
                kind,
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
    fn opens_and_bindings() {
        let src = "open Str_util\n(* open Commented *)\n\nlet run () = ()\nmodule Cache = struct end\nexception Overflow\n";
        let file = parse("src/main.ml", src, Language::Ocaml);
        let modules: Vec<&str> = file.imports.iter().map(|i| i.module.as_str()).collect();
        assert_eq!(modules, vec!["Str_util"]);
        let names: Vec<&str> = file.exports.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["run", "Cache", "Overflow"]);
    }
}
