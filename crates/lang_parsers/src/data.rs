use serde::Serialize;

use crate::language::Language;

/// How a module reference was written. The resolver dispatches on this
/// before applying its per-language strategy list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    /// `./foo`, `../foo`, `from .sub import x`, `require_relative`
    Relative,
    /// a bare or dotted reference resolved against project roots
    Absolute,
    /// a monorepo workspace package reference (`@org/pkg/sub`)
    Workspace,
    /// a configured path alias (`@app/util`)
    Alias,
    /// Java `import pkg.*`
    Wildcard,
    /// a module reference containing `*` / `**`, expanded against the file list
    Glob,
    /// Java `import static pkg.Class.member`
    Static,
    /// Rust `use` declaration
    Use,
    /// Rust `mod name;` declaration
    Mod,
    /// `export ... from` re-export edge
    ReExport,
    /// a textual inclusion of another file (`include!`, `#load`, PHP
    /// `require`, Erlang `-include`)
    Include,
    /// an embedded asset (`@embedFile`, `include_bytes!`)
    Embed,
    /// CommonJS `require(...)`
    Require,
    /// `from pkg import name`
    From,
    /// OCaml/F# `open`
    Open,
    /// `import './foo'` for side effects only
    SideEffect,
}

/// A directed import edge extracted from one file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportEdge {
    /// The textual reference as written (`"./foo"`, `"org.acme.Bean"`, ...)
    pub module: String,
    pub kind: ImportKind,
    /// Optional imported symbol (`from pkg import name` style)
    pub symbol: Option<String>,
    pub line: usize,
    /// True when `module` is a glob pattern to expand against the file list
    pub is_glob: bool,
}

impl ImportEdge {
    pub fn new(module: impl Into<String>, kind: ImportKind, line: usize) -> Self {
        let module = module.into();
        let is_glob = module.contains('*');
        Self {
            module,
            kind,
            symbol: None,
            line,
            is_glob,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportKind {
    Function,
    Class,
    Struct,
    Enum,
    Trait,
    Interface,
    TypeAlias,
    Const,
    Module,
    Object,
    Protocol,
    Actor,
    Extension,
    Record,
    Given,
    Sub,
    Exception,
    Macro,
    Default,
    ReExport,
    Other,
}

/// A top-level exportable symbol. When `source_module` is set the export
/// is a re-export and the graph walker follows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportRecord {
    pub name: String,
    pub kind: ExportKind,
    pub line: usize,
    pub source_module: Option<String>,
}

impl ExportRecord {
    pub fn new(name: impl Into<String>, kind: ExportKind, line: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            line,
            source_module: None,
        }
    }

    pub fn re_export(name: impl Into<String>, source: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            kind: ExportKind::ReExport,
            line,
            source_module: Some(source.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationRecord {
    pub name: String,
    pub line: usize,
}

/// A class (or equivalent) declaration, with the decorators/annotations
/// stacked on it. Consulted by the DI-container entry detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord {
    pub name: String,
    pub line: usize,
    pub decorators: Vec<AnnotationRecord>,
}

/// Per-language facts the entry-point classifier and graph walker read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LangMetadata {
    #[default]
    None,
    /// The parser failed; the file contributes nothing but still exists.
    Failed { error: String },
    Python {
        has_main_block: bool,
        /// e.g. "flask", "fastapi", "django-urls", "celery-task"
        framework_markers: Vec<String>,
    },
    Java {
        package_name: Option<String>,
        has_main_method: bool,
        is_spring_component: bool,
    },
    Go {
        is_main_package: bool,
        has_main_function: bool,
        has_init_function: bool,
        is_test_file: bool,
    },
}

/// Everything extracted from one source file. Pure function of
/// `(path, content)`; parsing the same input twice yields equal values.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    /// Project-root-relative POSIX path; the universal file identifier.
    pub path: String,
    pub language: Language,
    pub size: u64,
    pub lines: usize,
    pub imports: Vec<ImportEdge>,
    pub exports: Vec<ExportRecord>,
    pub classes: Vec<ClassRecord>,
    pub annotations: Vec<AnnotationRecord>,
    pub metadata: LangMetadata,
}

impl ParsedFile {
    pub fn empty(path: impl Into<String>, language: Language, content: &str) -> Self {
        Self {
            path: path.into(),
            language,
            size: content.len() as u64,
            lines: content.lines().count(),
            imports: Vec::new(),
            exports: Vec::new(),
            classes: Vec::new(),
            annotations: Vec::new(),
            metadata: LangMetadata::None,
        }
    }

    /// Directory part of the path, `""` for top-level files.
    pub fn dir(&self) -> &str {
        match self.path.rsplit_once('/') {
            Some((dir, _)) => dir,
            None => "",
        }
    }

    /// File name without its directory.
    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}
