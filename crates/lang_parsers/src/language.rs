use std::fmt;

use serde::Serialize;

/// The closed set of languages the scanner understands. A file's language
/// is a pure function of its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Typescript,
    Python,
    Java,
    Kotlin,
    Go,
    Rust,
    Ruby,
    Php,
    Swift,
    Scala,
    Elixir,
    Erlang,
    Ocaml,
    Fsharp,
    Perl,
    Zig,
    Vbnet,
}

impl Language {
    /// Maps an extension (without the dot, any case) to a language.
    pub fn from_extension(ext: &str) -> Option<Language> {
        use Language::*;
        let lang = match ext.to_ascii_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Javascript,
            "ts" | "tsx" | "mts" | "cts" => Typescript,
            "py" | "pyi" => Python,
            "java" => Java,
            "kt" | "kts" => Kotlin,
            "go" => Go,
            "rs" => Rust,
            "rb" | "rake" => Ruby,
            "php" => Php,
            "swift" => Swift,
            "scala" | "sc" => Scala,
            "ex" | "exs" => Elixir,
            "erl" | "hrl" => Erlang,
            "ml" | "mli" => Ocaml,
            "fs" | "fsx" | "fsi" => Fsharp,
            "pl" | "pm" => Perl,
            "zig" => Zig,
            "vb" => Vbnet,
            _ => return None,
        };
        Some(lang)
    }

    /// Maps a slash-separated path to a language by its extension.
    pub fn from_path(path: &str) -> Option<Language> {
        let basename = path.rsplit('/').next()?;
        let ext = basename.rsplit_once('.')?.1;
        Self::from_extension(ext)
    }

    pub fn as_str(&self) -> &'static str {
        use Language::*;
        match self {
            Javascript => "javascript",
            Typescript => "typescript",
            Python => "python",
            Java => "java",
            Kotlin => "kotlin",
            Go => "go",
            Rust => "rust",
            Ruby => "ruby",
            Php => "php",
            Swift => "swift",
            Scala => "scala",
            Elixir => "elixir",
            Erlang => "erlang",
            Ocaml => "ocaml",
            Fsharp => "fsharp",
            Perl => "perl",
            Zig => "zig",
            Vbnet => "vbnet",
        }
    }

    pub const ALL: &'static [Language] = &[
        Language::Javascript,
        Language::Typescript,
        Language::Python,
        Language::Java,
        Language::Kotlin,
        Language::Go,
        Language::Rust,
        Language::Ruby,
        Language::Php,
        Language::Swift,
        Language::Scala,
        Language::Elixir,
        Language::Erlang,
        Language::Ocaml,
        Language::Fsharp,
        Language::Perl,
        Language::Zig,
        Language::Vbnet,
    ];
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extension_mapping_is_stable() {
        assert_eq!(Language::from_extension("TSX"), Some(Language::Typescript));
        assert_eq!(Language::from_path("a/b/c.go"), Some(Language::Go));
        assert_eq!(Language::from_path("a/b/Makefile"), None);
        assert_eq!(Language::from_path("noext"), None);
    }
}
