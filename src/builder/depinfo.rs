//! Dep-info parsing for incremental rebuilds.
//!
//! Rustc emits a Make-rule dependency file next to the compiled artifact:
//! a target, a colon, and a whitespace-separated prerequisite list, with
//! spaces inside individual paths escaped as `\ `. Every prerequisite is a
//! source file inlined into the compiled unit, so a change to any of them
//! must invalidate the asset's cached build.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::diagnostic::DependencyParseError;

/// Parse dep-info contents into the prerequisite path list.
///
/// Only the first rule is consulted; the per-source dummy rules rustc
/// appends carry no extra information.
pub fn parse_depinfo(contents: &str, path: &Path) -> Result<Vec<PathBuf>, DependencyParseError> {
    let err = || DependencyParseError {
        path: path.to_path_buf(),
    };

    let rule = contents
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(err)?;
    let (_target, prerequisites) = rule.split_once(':').ok_or_else(err)?;

    Ok(split_prerequisites(prerequisites)
        .into_iter()
        .map(PathBuf::from)
        .collect())
}

/// Read the dep-info file and report every prerequisite except the asset's
/// own path.
///
/// A missing or malformed file fails the build; silently skipping it would
/// leave the bundler's dependency graph incomplete and corrupt rebuilds.
pub fn load_dependencies(depinfo_path: &Path, asset_path: &Path) -> Result<Vec<PathBuf>> {
    let contents = std::fs::read_to_string(depinfo_path)
        .with_context(|| format!("failed to read dep-info: {}", depinfo_path.display()))?;

    let deps = parse_depinfo(&contents, depinfo_path)?;
    Ok(deps.into_iter().filter(|p| p != asset_path).collect())
}

/// Split a prerequisite list on unescaped whitespace, unescaping each token.
fn split_prerequisites(list: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = list.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == ' ' || next == '\\' {
                    current.push(next);
                    chars.next();
                    continue;
                }
            }
            current.push(c);
        } else if c.is_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> Result<Vec<PathBuf>, DependencyParseError> {
        parse_depinfo(contents, Path::new("out.d"))
    }

    #[test]
    fn test_parse_simple_rule() {
        let deps = parse("out.wasm: a.rs b.rs c.rs\n").unwrap();
        assert_eq!(
            deps,
            vec![
                PathBuf::from("a.rs"),
                PathBuf::from("b.rs"),
                PathBuf::from("c.rs")
            ]
        );
    }

    #[test]
    fn test_excludes_asset_own_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let depinfo = tmp.path().join("out.d");
        std::fs::write(&depinfo, "out.wasm: a.rs b.rs c.rs\n").unwrap();

        let deps = load_dependencies(&depinfo, Path::new("a.rs")).unwrap();
        assert_eq!(deps, vec![PathBuf::from("b.rs"), PathBuf::from("c.rs")]);
    }

    #[test]
    fn test_unescapes_spaces_in_paths() {
        let deps = parse(r"out.wasm: my\ file.rs other.rs").unwrap();
        assert_eq!(
            deps,
            vec![PathBuf::from("my file.rs"), PathBuf::from("other.rs")]
        );
    }

    #[test]
    fn test_unescapes_backslashes() {
        let deps = parse(r"out.wasm: weird\\name.rs").unwrap();
        assert_eq!(deps, vec![PathBuf::from(r"weird\name.rs")]);
    }

    #[test]
    fn test_only_first_rule_is_used() {
        let contents = "\
target/app.wasm: src/lib.rs src/util.rs

src/lib.rs:
src/util.rs:
";
        let deps = parse(contents).unwrap();
        assert_eq!(
            deps,
            vec![PathBuf::from("src/lib.rs"), PathBuf::from("src/util.rs")]
        );
    }

    #[test]
    fn test_missing_colon_is_malformed() {
        assert!(parse("just some garbage\n").is_err());
    }

    #[test]
    fn test_empty_file_is_malformed() {
        assert!(parse("\n\n").is_err());
    }

    #[test]
    fn test_empty_prerequisite_list() {
        let deps = parse("out.wasm:\n").unwrap();
        assert!(deps.is_empty());
    }

    #[test]
    fn test_missing_file_fails() {
        let result = load_dependencies(Path::new("/nonexistent/out.d"), Path::new("a.rs"));
        assert!(result.is_err());
    }
}
