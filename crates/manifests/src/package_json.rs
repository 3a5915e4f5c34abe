use ahashmap::AHashMap;
use serde::Deserialize;
use serde_json::Value;

/// Fields of `package.json` whose string contents are dynamically loaded
/// plugin paths (n8n nodes, vscode extensions, and similar hosts).
pub const DYNAMIC_ENTRY_FIELDS: &[&str] = &[
    "nodes",
    "credentials",
    "plugins",
    "extensions",
    "adapters",
    "connectors",
];

/// The subset of `package.json` the scanner reads. `exports`, `bin` and
/// `workspaces` keep their raw JSON shape; the accessors below deep-walk
/// them, because all three fields are polymorphic in the wild.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PackageJson {
    pub name: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub exports: Option<Value>,
    #[serde(default)]
    pub bin: Option<Value>,
    #[serde(default)]
    pub scripts: AHashMap<String, String>,
    #[serde(default)]
    pub workspaces: Option<Value>,
    #[serde(default)]
    pub dependencies: AHashMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: AHashMap<String, String>,
    /// Everything else, kept for the dynamic-field entry scan.
    #[serde(flatten)]
    pub extra: AHashMap<String, Value>,
}

impl PackageJson {
    /// `Ok(None)` when the file does not exist; malformed JSON is an error
    /// the caller downgrades to an empty manifest.
    pub fn from_path(path: &std::path::Path) -> anyhow::Result<Option<Self>> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw).map(Some).map_err(Into::into)
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }

    /// Deep-walks the `exports` field, yielding `(subpath, target)` pairs.
    /// Subpaths are the `"."` / `"./x"` keys; conditional objects
    /// (`import`/`require`/`default`/...) are flattened to their string
    /// leaves.
    pub fn export_targets(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        match &self.exports {
            Some(Value::String(target)) => out.push((".".to_string(), target.clone())),
            Some(Value::Object(map)) => {
                for (key, value) in map {
                    if key.starts_with('.') {
                        collect_string_leaves(value, |target| {
                            out.push((key.clone(), target.to_string()))
                        });
                    } else {
                        // a conditional map at the top level applies to "."
                        collect_string_leaves(value, |target| {
                            out.push((".".to_string(), target.to_string()))
                        });
                    }
                }
            }
            _ => {}
        }
        out
    }

    /// Paths of every bin script, whichever shape the field takes.
    pub fn bin_files(&self) -> Vec<String> {
        let mut out = Vec::new();
        match &self.bin {
            Some(Value::String(path)) => out.push(path.clone()),
            Some(Value::Object(map)) => {
                for value in map.values() {
                    if let Value::String(path) = value {
                        out.push(path.clone());
                    }
                }
            }
            _ => {}
        }
        out
    }

    /// Workspace globs from either the array or the `{ packages: [...] }`
    /// form.
    pub fn workspace_globs(&self) -> Vec<String> {
        let mut out = Vec::new();
        match &self.workspaces {
            Some(Value::Array(items)) => {
                out.extend(items.iter().filter_map(|v| v.as_str().map(String::from)));
            }
            Some(Value::Object(map)) => {
                if let Some(Value::Array(items)) = map.get("packages") {
                    out.extend(items.iter().filter_map(|v| v.as_str().map(String::from)));
                }
            }
            _ => {}
        }
        out
    }

    /// `(field, paths)` for the dynamic plugin-host fields. Strings are
    /// collected recursively; non-path noise is left to the caller.
    pub fn dynamic_entry_paths(&self) -> Vec<(String, Vec<String>)> {
        let mut out = Vec::new();
        for field in DYNAMIC_ENTRY_FIELDS {
            let Some(value) = self.extra.get(*field) else {
                continue;
            };
            let mut paths = Vec::new();
            collect_string_leaves(value, |s| paths.push(s.to_string()));
            if !paths.is_empty() {
                out.push((field.to_string(), paths));
            }
        }
        out
    }
}

fn collect_string_leaves(value: &Value, mut sink: impl FnMut(&str)) {
    fn walk(value: &Value, sink: &mut impl FnMut(&str)) {
        match value {
            Value::String(s) => sink(s),
            Value::Array(items) => {
                for item in items {
                    walk(item, sink);
                }
            }
            Value::Object(map) => {
                for item in map.values() {
                    walk(item, sink);
                }
            }
            _ => {}
        }
    }
    walk(value, &mut sink)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn exports_deep_walk() {
        let pkg: PackageJson = serde_json::from_str(
            r#"{
                "name": "@org/a",
                "exports": {
                    ".": { "import": "./dist/index.mjs", "require": "./dist/index.cjs" },
                    "./x": "./dist/x.js",
                    "types": "./dist/index.d.ts"
                }
            }"#,
        )
        .unwrap();
        let mut targets = pkg.export_targets();
        targets.sort();
        assert_eq!(
            targets,
            vec![
                (".".to_string(), "./dist/index.cjs".to_string()),
                (".".to_string(), "./dist/index.d.ts".to_string()),
                (".".to_string(), "./dist/index.mjs".to_string()),
                ("./x".to_string(), "./dist/x.js".to_string()),
            ]
        );
    }

    #[test]
    fn bin_shapes() {
        let single: PackageJson =
            serde_json::from_str(r#"{ "name": "x", "bin": "./bin/cli.js" }"#).unwrap();
        assert_eq!(single.bin_files(), vec!["./bin/cli.js"]);

        let map: PackageJson = serde_json::from_str(
            r#"{ "name": "x", "bin": { "a": "./bin/a.js", "b": "./bin/b.js" } }"#,
        )
        .unwrap();
        let mut bins = map.bin_files();
        bins.sort();
        assert_eq!(bins, vec!["./bin/a.js", "./bin/b.js"]);
    }

    #[test]
    fn dynamic_fields_are_collected() {
        let pkg: PackageJson = serde_json::from_str(
            r#"{
                "name": "x",
                "n8n": true,
                "nodes": ["dist/nodes/Widget.node.js"],
                "credentials": ["dist/credentials/WidgetApi.credentials.js"]
            }"#,
        )
        .unwrap();
        let fields = pkg.dynamic_entry_paths();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].0, "nodes");
        assert_eq!(fields[0].1, vec!["dist/nodes/Widget.node.js"]);
    }
}
