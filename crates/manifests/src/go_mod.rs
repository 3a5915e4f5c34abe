use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MODULE: Regex = Regex::new(r"(?m)^module\s+(\S+)").expect("static regex");
    static ref REQUIRE_LINE: Regex =
        Regex::new(r"(?m)^\s*([\w./\-]+\.[\w./\-]+)\s+v[\w.\-+]+").expect("static regex");
    static ref REQUIRE_SINGLE: Regex =
        Regex::new(r"(?m)^require\s+([\w./\-]+)\s+v").expect("static regex");
}

/// `go.mod`: the module path plus required module paths (used for
/// framework detection by import substring).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoMod {
    pub module_path: String,
    pub requires: Vec<String>,
}

impl GoMod {
    pub fn parse(content: &str) -> Self {
        let module_path = MODULE
            .captures(content)
            .map(|c| c[1].to_string())
            .unwrap_or_default();
        let mut requires: Vec<String> = REQUIRE_LINE
            .captures_iter(content)
            .map(|c| c[1].to_string())
            .chain(
                REQUIRE_SINGLE
                    .captures_iter(content)
                    .map(|c| c[1].to_string()),
            )
            .collect();
        requires.sort();
        requires.dedup();
        Self {
            module_path,
            requires,
        }
    }

    pub fn from_path(path: &std::path::Path) -> anyhow::Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(Some(Self::parse(&raw))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
