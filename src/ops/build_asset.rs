//! The full asset build pipeline.
//!
//! Stages run in a fixed order: locate the manifest, validate it, probe the
//! toolchain, build, transform the generator output, collect dependency
//! edges. A failure at any stage aborts the build for this asset only.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::{build_crate, depinfo, BuildProfile, Toolchain};
use crate::core::manifest::{CrateManifest, MANIFEST_FILENAME};
use crate::transform::{self, Binding, HostEnv};
use crate::util::fs::{self, ProbeCache};

/// Per-asset pipeline options supplied by the embedding bundler.
#[derive(Debug, Clone, Copy)]
pub struct AssetOptions {
    /// Host environment the generated loader targets
    pub host: HostEnv,

    /// Build-profile override; falls back to the process environment, then
    /// to release
    pub profile: Option<BuildProfile>,
}

/// Aggregate result of one asset build.
#[derive(Debug, Clone)]
pub struct AssetOutput {
    /// Bundler-facing module text replacing the `.rs` asset
    pub module: String,

    /// Where the crate-qualified loader module was written
    pub loader_path: PathBuf,

    /// Bindings exported by the generated module
    pub bindings: Vec<Binding>,

    /// Source files to register as included-in-parent dependency edges
    pub dependencies: Vec<PathBuf>,
}

/// Run the pipeline for one `.rs` asset.
pub fn build_asset(
    asset_path: &Path,
    opts: &AssetOptions,
    cache: &ProbeCache,
) -> Result<AssetOutput> {
    let crate_dir = fs::find_ancestor_with(cache, asset_path, &[MANIFEST_FILENAME])
        .with_context(|| {
            format!(
                "no {MANIFEST_FILENAME} found above {}",
                asset_path.display()
            )
        })?;

    let manifest = CrateManifest::load(&crate_dir.join(MANIFEST_FILENAME))?;
    // Validation precedes every external invocation.
    manifest.require_cdylib()?;

    let toolchain = Toolchain::probe();
    let build = build_crate(&manifest, &toolchain, opts.profile)?;
    tracing::info!(
        "compiled `{}` ({} profile)",
        manifest.name(),
        build.profile.target_subdir()
    );

    let bindings_path = build.out_dir.join(format!("{}.js", build.artifact_name));
    let generator_output = fs::read_to_string(&bindings_path)?;

    let asset_dir = asset_path.parent().unwrap_or(Path::new("."));
    let wasm_rel = pathdiff::diff_paths(&build.wasm_path, asset_dir)
        .unwrap_or_else(|| build.wasm_path.clone());
    let specifier = fs::module_specifier(&wasm_rel);

    let transformed =
        transform::transform(&generator_output, &build.artifact_name, &specifier, opts.host)?;

    // The loader identity is crate-qualified, so concurrent builds of
    // different crates never race on a shared path.
    let loader_path = build
        .out_dir
        .join(format!("{}_loader.js", build.artifact_name));
    fs::write_string(&loader_path, &transformed.loader)?;
    tracing::debug!("wrote loader module to {}", loader_path.display());

    let dependencies = depinfo::load_dependencies(&build.depinfo_path, asset_path)?;

    Ok(AssetOutput {
        module: transformed.module,
        loader_path,
        bindings: transformed.bindings,
        dependencies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::diagnostic::ConfigurationError;
    use tempfile::TempDir;

    fn opts() -> AssetOptions {
        AssetOptions {
            host: HostEnv::Browser,
            profile: None,
        }
    }

    #[test]
    fn test_missing_manifest_fails() {
        let tmp = TempDir::new().unwrap();
        // A node_modules boundary guarantees the probe cannot escape the
        // fixture into the surrounding filesystem.
        let src = tmp.path().join("node_modules/dep/src");
        std::fs::create_dir_all(&src).unwrap();
        let asset = src.join("lib.rs");
        std::fs::write(&asset, "").unwrap();

        let err = build_asset(&asset, &opts(), &ProbeCache::new()).unwrap_err();
        assert!(err.to_string().contains("Cargo.toml"));
    }

    #[test]
    fn test_non_cdylib_crate_rejected_before_any_build() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("Cargo.toml"),
            "[package]\nname = \"app\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();
        let src = tmp.path().join("src");
        std::fs::create_dir_all(&src).unwrap();
        let asset = src.join("lib.rs");
        std::fs::write(&asset, "").unwrap();

        let err = build_asset(&asset, &opts(), &ProbeCache::new()).unwrap_err();
        assert!(err.downcast_ref::<ConfigurationError>().is_some());
        assert!(err.to_string().contains("cdylib"));
    }
}
