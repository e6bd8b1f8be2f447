//! Structural rewriting of wasm-bindgen output.

pub mod emit;
pub mod scanner;

pub use emit::HostEnv;
pub use scanner::{Binding, BindingKind, ScanOutput};

use crate::util::diagnostic::TransformMismatch;

/// Everything the pipeline needs from one transform pass.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// Bundler-facing ES module text
    pub module: String,

    /// Loader module text for the target host
    pub loader: String,

    /// Bindings discovered during the scan, in document order
    pub bindings: Vec<Binding>,
}

/// Rewrite generator output into the bundler module and the loader module.
pub fn transform(
    source: &str,
    artifact_name: &str,
    wasm_specifier: &str,
    host: HostEnv,
) -> Result<TransformOutput, TransformMismatch> {
    let scanned = scanner::scan(source)?;

    let module = emit::bundler_module(wasm_specifier, &scanned.bindings);
    let loader = emit::loader_module(&scanned, artifact_name, host);

    Ok(TransformOutput {
        module,
        loader,
        bindings: scanned.bindings,
    })
}
