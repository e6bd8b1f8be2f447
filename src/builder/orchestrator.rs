//! Build strategy selection and execution.
//!
//! Exactly one of two strategies runs per asset: a managed build through
//! `wasm-pack`, or a raw build that drives `cargo` and `wasm-bindgen`
//! directly. Which one is chosen depends only on toolchain availability.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::builder::toolchain::Toolchain;
use crate::core::manifest::CrateManifest;
use crate::util::diagnostic::{BuildFailed, ToolchainMissing};
use crate::util::process::ProcessBuilder;

/// The wasm compilation target triple.
pub const WASM_TARGET: &str = "wasm32-unknown-unknown";

/// Environment variable overriding the managed-build profile.
pub const PROFILE_ENV_VAR: &str = "WASM_PACK_PROFILE";

/// Build profile forwarded to the managed build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildProfile {
    /// Unoptimized build with debug info
    Dev,
    /// Optimized build with debug info
    Profiling,
    /// Fully optimized build
    #[default]
    Release,
}

impl BuildProfile {
    /// The wasm-pack flag for this profile.
    pub fn flag(&self) -> &'static str {
        match self {
            BuildProfile::Dev => "--dev",
            BuildProfile::Profiling => "--profiling",
            BuildProfile::Release => "--release",
        }
    }

    /// The subdirectory Cargo writes output to under the target triple.
    pub fn target_subdir(&self) -> &'static str {
        match self {
            BuildProfile::Dev => "debug",
            BuildProfile::Profiling | BuildProfile::Release => "release",
        }
    }

    /// Parse a profile name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dev" | "debug" => Some(BuildProfile::Dev),
            "profiling" => Some(BuildProfile::Profiling),
            "release" => Some(BuildProfile::Release),
            _ => None,
        }
    }

    /// Read the profile override from the process environment.
    pub fn from_env() -> Option<Self> {
        let value = std::env::var(PROFILE_ENV_VAR).ok()?;
        let profile = Self::from_name(&value);
        if profile.is_none() {
            tracing::warn!("ignoring unknown {PROFILE_ENV_VAR} value `{value}`");
        }
        profile
    }
}

/// The build strategy selected for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStrategy {
    /// `wasm-pack` drives the whole build.
    Managed {
        /// Skip wasm-pack's dependency auto-installation; set when cargo and
        /// wasm-bindgen are independently available.
        no_install: bool,
    },
    /// `cargo` and `wasm-bindgen` are invoked directly.
    Raw,
}

/// Select the build strategy for the given toolchain.
pub fn select_strategy(toolchain: &Toolchain) -> Result<BuildStrategy, ToolchainMissing> {
    if toolchain.wasm_pack {
        Ok(BuildStrategy::Managed {
            no_install: toolchain.cargo && toolchain.wasm_bindgen,
        })
    } else if toolchain.cargo && toolchain.wasm_bindgen {
        Ok(BuildStrategy::Raw)
    } else if toolchain.cargo {
        Err(ToolchainMissing::wasm_bindgen())
    } else {
        Err(ToolchainMissing::cargo())
    }
}

/// Normalized descriptor of a completed build.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// The crate directory
    pub crate_dir: PathBuf,

    /// Directory holding the generator's emitted bindings. Owned by the
    /// external toolchain; read-only to this pipeline.
    pub out_dir: PathBuf,

    /// Package name with `-` normalized to `_`
    pub artifact_name: String,

    /// The wasm binary consumed by the generated loader
    pub wasm_path: PathBuf,

    /// The rustc dep-info file for incremental-rebuild registration
    pub depinfo_path: PathBuf,

    /// Profile the build actually used
    pub profile: BuildProfile,
}

/// Build the crate with whichever strategy the toolchain supports.
pub fn build_crate(
    manifest: &CrateManifest,
    toolchain: &Toolchain,
    profile_override: Option<BuildProfile>,
) -> Result<BuildOutput> {
    match select_strategy(toolchain)? {
        BuildStrategy::Managed { no_install } => {
            managed_build(manifest, no_install, profile_override)
        }
        BuildStrategy::Raw => raw_build(manifest),
    }
}

/// Strategy A: let wasm-pack orchestrate cargo and wasm-bindgen.
///
/// Failures here propagate as-is so wasm-pack's own diagnostics remain
/// visible, except the unknown-subcommand case which falls back to the
/// legacy `init` subcommand of pre-0.6 releases.
fn managed_build(
    manifest: &CrateManifest,
    no_install: bool,
    profile_override: Option<BuildProfile>,
) -> Result<BuildOutput> {
    let crate_dir = &manifest.manifest_dir;
    let profile = profile_override.or_else(BuildProfile::from_env);

    let mut pb = ProcessBuilder::new("wasm-pack").arg("build").cwd(crate_dir);
    if no_install {
        pb = pb.args(["--mode", "no-install"]);
    }
    if let Some(p) = profile {
        pb = pb.arg(p.flag());
    }

    tracing::debug!("running `{}`", pb.display_command());
    let output = pb.exec()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_unknown_subcommand(&stderr) {
            tracing::debug!("wasm-pack predates `build`, retrying with `init`");
            let mut legacy = ProcessBuilder::new("wasm-pack").arg("init").cwd(crate_dir);
            if no_install {
                legacy = legacy.args(["-m", "no-install"]);
            }
            legacy.exec_and_check()?;
        } else {
            bail!(
                "`{}` failed with exit code {:?}\n{}",
                pb.display_command(),
                output.status.code(),
                stderr
            );
        }
    }

    Ok(managed_output(manifest, profile.unwrap_or_default()))
}

/// Output layout of a managed build: bindings in `pkg/`, dep-info under the
/// default Cargo target directory.
fn managed_output(manifest: &CrateManifest, profile: BuildProfile) -> BuildOutput {
    let crate_dir = manifest.manifest_dir.clone();
    let artifact_name = manifest.artifact_name();
    let out_dir = crate_dir.join("pkg");
    let target_dir = crate_dir
        .join("target")
        .join(WASM_TARGET)
        .join(profile.target_subdir());

    BuildOutput {
        wasm_path: out_dir.join(format!("{artifact_name}_bg.wasm")),
        depinfo_path: target_dir.join(format!("{artifact_name}.d")),
        crate_dir,
        out_dir,
        artifact_name,
        profile,
    }
}

/// Strategy B: drive cargo and wasm-bindgen directly.
///
/// Every external failure here is normalized to a single [`BuildFailed`];
/// the underlying diagnostics are opaque to the pipeline.
fn raw_build(manifest: &CrateManifest) -> Result<BuildOutput> {
    let crate_dir = &manifest.manifest_dir;
    let artifact_name = manifest.artifact_name();

    let build = ProcessBuilder::new("cargo")
        .args(["build", "--target", WASM_TARGET, "--release"])
        .cwd(crate_dir);
    tracing::debug!("running `{}`", build.display_command());
    run_or_build_failed(&build)?;

    // The target directory is environment-dependent; ask cargo.
    let target_dir = cargo_target_directory(crate_dir)?;
    let out_dir = target_dir.join(WASM_TARGET).join("release");

    let bindgen = ProcessBuilder::new("wasm-bindgen")
        .arg(out_dir.join(format!("{artifact_name}.wasm")))
        .args(["--no-modules", "--out-dir"])
        .arg(&out_dir)
        .cwd(crate_dir);
    tracing::debug!("running `{}`", bindgen.display_command());
    run_or_build_failed(&bindgen)?;

    Ok(BuildOutput {
        crate_dir: crate_dir.clone(),
        wasm_path: out_dir.join(format!("{artifact_name}_bg.wasm")),
        depinfo_path: out_dir.join(format!("{artifact_name}.d")),
        out_dir,
        artifact_name,
        profile: BuildProfile::Release,
    })
}

/// Run a raw-build invocation, collapsing spawn errors and non-zero exits
/// into [`BuildFailed`].
fn run_or_build_failed(pb: &ProcessBuilder) -> Result<std::process::Output> {
    let failed = || BuildFailed {
        command: pb.display_command(),
    };

    let output = pb.exec().map_err(|e| {
        tracing::debug!("spawn failed: {e:#}");
        failed()
    })?;
    if !output.status.success() {
        tracing::debug!(
            "command exited {:?}: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        );
        return Err(failed().into());
    }
    Ok(output)
}

/// Query cargo for the workspace target directory.
fn cargo_target_directory(crate_dir: &Path) -> Result<PathBuf> {
    #[derive(Deserialize)]
    struct Metadata {
        target_directory: PathBuf,
    }

    let pb = ProcessBuilder::new("cargo")
        .args(["metadata", "--format-version", "1"])
        .cwd(crate_dir);
    let output = run_or_build_failed(&pb)?;

    let metadata: Metadata = serde_json::from_slice(&output.stdout)
        .with_context(|| "failed to parse `cargo metadata` output")?;
    Ok(metadata.target_directory)
}

fn is_unknown_subcommand(stderr: &str) -> bool {
    stderr.contains("Unrecognized subcommand") || stderr.contains("no such subcommand")
}
