use regex::Regex;

/// Anchored dependency check for Python requirement files and
/// `pyproject.toml`. A bare substring test would let `express` match
/// `consider-ternary-expression`, so the name must start a line
/// (`name==1.0`, `name[extra]>=2`) or sit quoted inside a TOML table
/// (`"name>=1.0"`).
pub fn declares_python_dependency(content: &str, name: &str) -> bool {
    let escaped = regex::escape(name);
    let line_anchored = Regex::new(&format!(
        r"(?mi)^\s*{escaped}\s*(?:[=<>!~\[;]|$)"
    ))
    .expect("escaped name produces a valid pattern");
    if line_anchored.is_match(content) {
        return true;
    }
    let quoted = Regex::new(&format!(r#"(?i)["']{escaped}\s*(?:[=<>!~\[]|["'])"#))
        .expect("escaped name produces a valid pattern");
    quoted.is_match(content)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn anchored_requirements() {
        let requirements = "django==5.0\nflask[async]>=3\n# express is mentioned in a comment\nconsider-ternary-expression==1.0\n";
        assert!(declares_python_dependency(requirements, "django"));
        assert!(declares_python_dependency(requirements, "flask"));
        assert!(!declares_python_dependency(requirements, "express"));
        assert!(!declares_python_dependency(requirements, "ternary"));
    }

    #[test]
    fn quoted_pyproject_dependencies() {
        let pyproject = "[project]\ndependencies = [\n  \"fastapi>=0.110\",\n  \"uvicorn\",\n]\n";
        assert!(declares_python_dependency(pyproject, "fastapi"));
        assert!(declares_python_dependency(pyproject, "uvicorn"));
        assert!(!declares_python_dependency(pyproject, "torn"));
    }
}
