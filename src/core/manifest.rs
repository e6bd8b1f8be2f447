//! Cargo.toml manifest parsing and validation.
//!
//! The pipeline only consumes the small slice of the manifest it needs: the
//! package name and the `[lib] crate-type` declaration. Everything else in
//! the file belongs to Cargo.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::util::diagnostic::ConfigurationError;

/// Marker filename used by the upward probe.
pub const MANIFEST_FILENAME: &str = "Cargo.toml";

/// Package metadata from the [package] section.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageMetadata {
    /// Package name
    pub name: String,

    /// Package version
    #[serde(default)]
    pub version: Option<String>,
}

/// The [lib] section.
///
/// `crate-type` is kept as a raw TOML value so validation can distinguish a
/// missing key from a key that is not an array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibSection {
    #[serde(default, rename = "crate-type")]
    pub crate_type: Option<toml::Value>,
}

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    package: Option<PackageMetadata>,

    #[serde(default)]
    lib: Option<LibSection>,
}

/// The parsed crate manifest.
#[derive(Debug, Clone)]
pub struct CrateManifest {
    /// Package metadata
    pub package: PackageMetadata,

    /// The [lib] section, if present
    pub lib: Option<LibSection>,

    /// The directory containing this manifest
    pub manifest_dir: PathBuf,
}

impl CrateManifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest =
            toml::from_str(content).with_context(|| "failed to parse Cargo.toml")?;

        let manifest_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        let Some(package) = raw.package else {
            anyhow::bail!(
                "manifest at {} has no [package] section",
                path.display()
            );
        };

        Ok(CrateManifest {
            package,
            lib: raw.lib,
            manifest_dir,
        })
    }

    /// Get the package name.
    pub fn name(&self) -> &str {
        &self.package.name
    }

    /// Get the artifact base name.
    ///
    /// Rustc converts `-` to `_` when naming output files.
    pub fn artifact_name(&self) -> String {
        self.package.name.replace('-', "_")
    }

    /// Path of the manifest file itself.
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_dir.join(MANIFEST_FILENAME)
    }

    /// Require the manifest to declare a `cdylib` crate type.
    ///
    /// The binding generator can only consume a dynamic foreign library, so
    /// a missing declaration is a hard failure rather than a silent default.
    pub fn require_cdylib(&self) -> Result<(), ConfigurationError> {
        let err = || ConfigurationError {
            manifest_path: self.manifest_path(),
        };

        let crate_type = self
            .lib
            .as_ref()
            .and_then(|lib| lib.crate_type.as_ref())
            .ok_or_else(err)?;

        let kinds = crate_type.as_array().ok_or_else(err)?;
        if kinds.iter().any(|k| k.as_str() == Some("cdylib")) {
            Ok(())
        } else {
            Err(err())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<CrateManifest> {
        CrateManifest::parse(content, Path::new("/app/Cargo.toml"))
    }

    #[test]
    fn test_parse_cdylib_manifest() {
        let manifest = parse(
            r#"
[package]
name = "my-crate"
version = "0.1.0"

[lib]
crate-type = ["cdylib"]
"#,
        )
        .unwrap();

        assert_eq!(manifest.name(), "my-crate");
        assert_eq!(manifest.artifact_name(), "my_crate");
        assert_eq!(manifest.manifest_dir, PathBuf::from("/app"));
        assert!(manifest.require_cdylib().is_ok());
    }

    #[test]
    fn test_extra_crate_types_accepted() {
        let manifest = parse(
            r#"
[package]
name = "app"

[lib]
crate-type = ["rlib", "cdylib"]
"#,
        )
        .unwrap();

        assert!(manifest.require_cdylib().is_ok());
    }

    #[test]
    fn test_missing_lib_section_rejected() {
        let manifest = parse("[package]\nname = \"app\"\n").unwrap();

        let err = manifest.require_cdylib().unwrap_err();
        assert!(err.to_string().contains("cdylib"));
    }

    #[test]
    fn test_missing_crate_type_rejected() {
        let manifest = parse("[package]\nname = \"app\"\n\n[lib]\nname = \"app\"\n").unwrap();

        assert!(manifest.require_cdylib().is_err());
    }

    #[test]
    fn test_non_array_crate_type_rejected() {
        let manifest = parse(
            r#"
[package]
name = "app"

[lib]
crate-type = "cdylib"
"#,
        )
        .unwrap();

        assert!(manifest.require_cdylib().is_err());
    }

    #[test]
    fn test_crate_type_without_cdylib_rejected() {
        let manifest = parse(
            r#"
[package]
name = "app"

[lib]
crate-type = ["rlib"]
"#,
        )
        .unwrap();

        assert!(manifest.require_cdylib().is_err());
    }

    #[test]
    fn test_manifest_requires_package() {
        let result = parse("[lib]\ncrate-type = [\"cdylib\"]\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("[package]"));
    }
}
