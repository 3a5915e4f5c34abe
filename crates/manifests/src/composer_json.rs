use ahashmap::AHashMap;
use serde::Deserialize;

/// `composer.json`: PSR-4 roots, eagerly-loaded files and bin scripts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ComposerJson {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub require: AHashMap<String, String>,
    #[serde(default, rename = "require-dev")]
    pub require_dev: AHashMap<String, String>,
    #[serde(default)]
    pub autoload: ComposerAutoload,
    #[serde(default, rename = "autoload-dev")]
    pub autoload_dev: ComposerAutoload,
    #[serde(default)]
    pub bin: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ComposerAutoload {
    #[serde(default, rename = "psr-4")]
    pub psr4: AHashMap<String, serde_json::Value>,
    #[serde(default)]
    pub files: Vec<String>,
}

impl ComposerJson {
    pub fn from_path(path: &std::path::Path) -> anyhow::Result<Option<Self>> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw).map(Some).map_err(Into::into)
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.require.contains_key(name) || self.require_dev.contains_key(name)
    }

    /// PSR-4 root directories from both autoload sections; a mapping value
    /// may be one directory or a list of them.
    pub fn psr4_dirs(&self) -> Vec<String> {
        let mut out = Vec::new();
        for autoload in [&self.autoload, &self.autoload_dev] {
            for value in autoload.psr4.values() {
                match value {
                    serde_json::Value::String(dir) => out.push(dir.clone()),
                    serde_json::Value::Array(items) => out.extend(
                        items
                            .iter()
                            .filter_map(|v| v.as_str().map(String::from)),
                    ),
                    _ => {}
                }
            }
        }
        out.sort();
        out.dedup();
        out
    }

    pub fn autoload_files(&self) -> Vec<String> {
        let mut out = self.autoload.files.clone();
        out.extend(self.autoload_dev.files.iter().cloned());
        out
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn psr4_roots_both_shapes() {
        let composer: ComposerJson = serde_json::from_str(
            r#"{
                "require": { "laravel/framework": "^11" },
                "autoload": {
                    "psr-4": { "App\\": "app/", "Support\\": ["lib/", "support/"] },
                    "files": ["app/helpers.php"]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(composer.psr4_dirs(), vec!["app/", "lib/", "support/"]);
        assert_eq!(composer.autoload_files(), vec!["app/helpers.php"]);
        assert!(composer.has_dependency("laravel/framework"));
    }
}
