//! Elixir: `alias`/`import`/`require`/`use` module references and
//! `defmodule` declarations. `@doc` heredocs are blanked first; their
//! prose routinely contains `import` examples.

use lazy_static::lazy_static;
use regex::Regex;

use crate::comments::strip_elixir_docs;
use crate::data::*;
use crate::language::Language;

lazy_static! {
    static ref MODULE_REF: Regex =
        Regex::new(r"(?m)^\s*(alias|import|require|use)\s+([A-Z][\w.]*)").expect("static regex");
    static ref DEFMODULE: Regex =
        Regex::new(r"(?m)^\s*defmodule\s+([\w.]+)").expect("static regex");
    static ref PUBLIC_DEF: Regex =
        Regex::new(r"(?m)^\s*def\s+(\w+)").expect("static regex");
}

pub fn parse(path: &str, content: &str, language: Language) -> ParsedFile {
    let mut file = ParsedFile::empty(path, language, content);
    let stripped = strip_elixir_docs(content);

    for caps in MODULE_REF.captures_iter(&stripped) {
        let m = caps.get(2).expect("group 2 always present");
        file.imports.push(ImportEdge::new(
            m.as_str(),
            ImportKind::Use,
            line_of(&stripped, m.start()),
        ));
    }

    for caps in DEFMODULE.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        let line = line_of(&stripped, name.start());
        file.exports
            .push(ExportRecord::new(name.as_str(), ExportKind::Module, line));
        file.classes.push(ClassRecord {
            name: name.as_str().to_string(),
            line,
            decorators: Vec::new(),
        });
    }
    for caps in PUBLIC_DEF.captures_iter(&stripped) {
        let name = caps.get(1).expect("group 1 always present");
        file.exports.push(ExportRecord::new(
            name.as_str(),
            ExportKind::Function,
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
    fn doc_heredoc_examples_do_not_import() {
        let src = "defmodule Demo do\n  @doc \"\"\"\n  import Fake\n  \"\"\"\n  import Real.Helper\n  def run, do: :ok\nend\n";
        let file = parse("lib/demo.ex", src, Language::Elixir);
        let modules: Vec<&str> = file.imports.iter().map(|i| i.module.as_str()).collect();
        assert_eq!(modules, vec!["Real.Helper"]);
        assert_eq!(file.exports[0].name, "Demo");
    }
}
