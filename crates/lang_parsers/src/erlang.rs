//! Erlang: `-module`, `-import`, `-include`/`-include_lib` and the
//! `-export` attribute list.

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::strip_percent_comments;
use crate::data::*;
use crate::language::Language;

lazy_static! {
    static ref IMPORT: Regex =
        Regex::new(r"(?m)^-import\(\s*(\w+)").expect("static regex");
    static ref INCLUDE: Regex =
        Regex::new(r#"(?m)^-include(_lib)?\(\s*"([^"]+)""#).expect("static regex");
    static ref EXPORT: Regex =
        Regex::new(r"(?m)^-export\(\s*\[([^\]]*)\]").expect("static regex");
    static ref MODULE: Regex = Regex::new(r"(?m)^-module\(\s*(\w+)").expect("static regex");
}

pub fn parse(path: &str, content: &str, language: Language) -> ParsedFile {
    let mut file = ParsedFile::empty(path, language, content);
    let stripped = strip_percent_comments(content);

    for caps in IMPORT.captures_iter(&stripped) {
        let m = caps.get(1).expect("group 1 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::Absolute,
            line_of(&stripped, m.start()),
        ));
    }
    for caps in INCLUDE.captures_iter(&stripped) {
        let m = caps.get(2).expect("group 2 always present");
        // -include_lib paths start with an application name we cannot
        // resolve locally; plain -include is file-relative
        let kind = if caps.get(1).is_some() {
            ImportKind::Absolute
        } else {
            ImportKind::Include
        };
        file.imports
            .push(ImportEdge::new(m.as_str(), kind, line_of(&stripped, m.start())));
    }

    if let Some(caps) = MODULE.captures(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        file.exports.push(ExportRecord::new(
            name.as_str(),
            ExportKind::Module,
            line_of(&stripped, name.start()),
        ));
    }
    for caps in EXPORT.captures_iter(&stripped) {
        let list = caps.get(1).expect("group 1 always present");
        let line = line_of(&stripped, list.start());
        for item in list.as_str().split(',') {
            let name = item.trim().split('/').next().unwrap_or("").trim();
            if !name.is_empty() {
                file.exports
                    .push(ExportRecord::new(name, ExportKind::Function, line));
            }
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
    fn header_includes_and_exports() {
        let src = "-module(worker).\n-export([start/0, stop/1]).\n-include(\"records.hrl\").\n-include_lib(\"kernel/include/file.hrl\").\n";
        let file = parse("src/worker.erl", src, Language::Erlang);
        let include = file
            .imports
            .iter()
            .find(|i| i.kind == ImportKind::Include)
            .unwrap();
        assert_eq!(include.module, "records.hrl");
        let names: Vec<&str> = file.exports.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["worker", "start", "stop"]);
    }
}
