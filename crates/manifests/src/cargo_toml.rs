use serde::Deserialize;

/// The subset of `Cargo.toml` the entry-point classifier reads: explicit
/// targets, the lib table and workspace members.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CargoManifest {
    #[serde(default)]
    pub package: Option<CargoPackage>,
    #[serde(default)]
    pub bin: Vec<CargoTarget>,
    #[serde(default)]
    pub example: Vec<CargoTarget>,
    #[serde(default)]
    pub bench: Vec<CargoTarget>,
    #[serde(default)]
    pub lib: Option<CargoTarget>,
    #[serde(default)]
    pub workspace: Option<CargoWorkspace>,
    #[serde(default)]
    pub dependencies: Option<toml::Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CargoPackage {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CargoTarget {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CargoWorkspace {
    #[serde(default)]
    pub members: Vec<String>,
}

impl CargoManifest {
    pub fn from_path(path: &std::path::Path) -> anyhow::Result<Option<Self>> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&raw).map(Some).map_err(Into::into)
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies
            .as_ref()
            .map(|deps| deps.contains_key(name))
            .unwrap_or(false)
    }

    /// Explicit target paths plus the conventional defaults that exist
    /// only when the corresponding file does (the caller probes them).
    pub fn declared_target_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        for target in self.bin.iter().chain(&self.example).chain(&self.bench) {
            if let Some(path) = &target.path {
                out.push(path.clone());
            }
        }
        if let Some(lib) = &self.lib {
            if let Some(path) = &lib.path {
                out.push(path.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn targets_and_members() {
        let manifest: CargoManifest = toml::from_str(
            r#"
[package]
name = "tool"

[[bin]]
name = "tool"
path = "src/bin/tool.rs"

[[example]]
name = "demo"
path = "examples/demo.rs"

[lib]
path = "src/lib.rs"

[workspace]
members = ["crates/*"]

[dependencies]
actix-web = "4"
"#,
        )
        .unwrap();
        assert_eq!(
            manifest.declared_target_paths(),
            vec!["src/bin/tool.rs", "examples/demo.rs", "src/lib.rs"]
        );
        assert_eq!(
            manifest.workspace.as_ref().unwrap().members,
            vec!["crates/*"]
        );
        assert!(manifest.has_dependency("actix-web"));
    }
}
