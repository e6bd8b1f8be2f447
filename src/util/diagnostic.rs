//! Typed, user-facing build errors.
//!
//! Every error carries a root cause and a suggested fix. These are the
//! terminal failures of an asset build; the embedding bundler surfaces the
//! message and aborts the affected asset only.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

/// The crate manifest is not configured to produce a wasm binary.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("the `crate-type` in {} must include `cdylib`", .manifest_path.display())]
#[diagnostic(
    code(gangway::manifest::crate_type),
    help("add `crate-type = [\"cdylib\"]` to the [lib] section")
)]
pub struct ConfigurationError {
    pub manifest_path: PathBuf,
}

/// No usable combination of build tools was found.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("`{tool}` was not found on PATH")]
#[diagnostic(code(gangway::toolchain::missing), help("{install_hint}"))]
pub struct ToolchainMissing {
    pub tool: &'static str,
    pub install_hint: &'static str,
}

impl ToolchainMissing {
    /// Neither wasm-pack nor cargo is installed.
    pub fn cargo() -> Self {
        ToolchainMissing {
            tool: "cargo",
            install_hint: "install Rust and Cargo from https://rustup.rs",
        }
    }

    /// Cargo exists but the binding generator does not.
    pub fn wasm_bindgen() -> Self {
        ToolchainMissing {
            tool: "wasm-bindgen",
            install_hint: "install the binding generator with `cargo install wasm-bindgen-cli`",
        }
    }
}

/// An external build invocation exited non-zero or could not spawn.
///
/// The underlying tool's diagnostics are opaque to the pipeline; the command
/// line is surfaced so the user can re-run it for the full output.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("`{command}` failed")]
#[diagnostic(
    code(gangway::build::failed),
    help("run the command manually in the crate directory to see the full compiler output")
)]
pub struct BuildFailed {
    pub command: String,
}

/// wasm-bindgen output did not match the expected module shape.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("wasm-bindgen output has no recognizable wasm import statement")]
#[diagnostic(
    code(gangway::transform::mismatch),
    help("the installed wasm-bindgen emits an unsupported module shape; pin a version that \
          produces `import * as wasm from '...'` bindings")
)]
pub struct TransformMismatch;

/// The dep-info file is missing or malformed.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("malformed dep-info file: {}", .path.display())]
#[diagnostic(
    code(gangway::depinfo::parse),
    help("remove the build output directory and rebuild to regenerate dep-info")
)]
pub struct DependencyParseError {
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_names_required_value() {
        let err = ConfigurationError {
            manifest_path: PathBuf::from("/app/Cargo.toml"),
        };
        assert!(err.to_string().contains("cdylib"));
        assert!(err.to_string().contains("/app/Cargo.toml"));
    }

    #[test]
    fn test_toolchain_missing_names_tool() {
        assert!(ToolchainMissing::cargo().to_string().contains("cargo"));
        assert!(ToolchainMissing::wasm_bindgen()
            .to_string()
            .contains("wasm-bindgen"));
    }
}
