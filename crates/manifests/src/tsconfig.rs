use ahashmap::AHashMap;
use serde::Deserialize;

/// The `compilerOptions` subset that affects import resolution.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsconfigJson {
    #[serde(default)]
    pub compiler_options: TsconfigCompilerOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsconfigCompilerOptions {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub paths: AHashMap<String, Vec<String>>,
}

impl TsconfigJson {
    /// tsconfig files routinely carry `// comments` and trailing commas;
    /// both are stripped before parsing.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let cleaned = strip_jsonc(raw);
        serde_json::from_str(&cleaned).map_err(Into::into)
    }

    pub fn from_path(path: &std::path::Path) -> anyhow::Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn strip_jsonc(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut in_string = false;
    // a comma held back until we know a closing bracket does not follow it
    let mut held_comma = false;
    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    if c == '\n' {
                        out.push('\n');
                    }
                    prev = c;
                }
            }
            ',' => {
                if held_comma {
                    out.push(',');
                }
                held_comma = true;
            }
            c if c.is_whitespace() => out.push(c),
            ']' | '}' => {
                held_comma = false;
                out.push(c);
            }
            _ => {
                if held_comma {
                    out.push(',');
                    held_comma = false;
                }
                if c == '"' {
                    in_string = true;
                }
                out.push(c);
            }
        }
    }
    out
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_jsonc() {
        let tsconfig = TsconfigJson::parse(
            r#"{
                // project config
                "compilerOptions": {
                    "baseUrl": "./src",
                    "paths": {
                        "@app/*": ["app/*"],
                    },
                }
            }"#,
        )
        .unwrap();
        assert_eq!(tsconfig.compiler_options.base_url.as_deref(), Some("./src"));
        assert_eq!(
            tsconfig.compiler_options.paths.get("@app/*"),
            Some(&vec!["app/*".to_string()])
        );
    }
}
