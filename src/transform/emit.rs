//! Module generation from a completed scan.
//!
//! Two artifacts come out of a transform: a bundler-facing ES module that
//! re-exports every recorded binding from the instantiated wasm module, and
//! a loader module embedding the rewritten generator text together with an
//! instantiation factory for the target host.

use std::fmt::Write;

use super::scanner::{Binding, BindingKind, ScanOutput};

/// The host environment the generated loader targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEnv {
    /// Browser-like host with `fetch` and streaming instantiation
    Browser,
    /// Standalone process host reading the binary from disk
    Process,
}

/// Emit the bundler-facing module.
///
/// The module imports the wasm binary by its relative specifier, re-exports
/// it as the default, and adds one named export per recorded binding, each
/// reading from the instantiated export table. An empty binding set still
/// produces a valid module.
pub fn bundler_module(wasm_specifier: &str, bindings: &[Binding]) -> String {
    let mut out = String::new();
    writeln!(out, "import wasm from '{wasm_specifier}'").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "export default wasm").unwrap();
    for binding in bindings {
        writeln!(out, "export const {} = wasm.{}", binding.name, binding.name).unwrap();
    }
    out
}

/// Emit the loader module for the target host.
///
/// Layout: the rewritten generator text, the class aliases, the
/// byte-loading routine for this host, and one shared completion path. The
/// byte source is the only part that differs between hosts; the container
/// key set is identical either way.
pub fn loader_module(scan: &ScanOutput, artifact_name: &str, host: HostEnv) -> String {
    let mut out = String::new();
    out.push_str(&scan.rewritten);
    out.push('\n');

    for binding in &scan.bindings {
        if binding.kind == BindingKind::Class {
            writeln!(out, "__exports.{} = {};", binding.name, binding.name).unwrap();
        }
    }
    out.push('\n');

    writeln!(
        out,
        "function __imports() {{\n    return {{ './{artifact_name}': __exports }};\n}}"
    )
    .unwrap();
    out.push('\n');

    out.push_str(load_bytes_routine(host));
    out.push('\n');

    out.push_str(
        "function __finish(result) {\n\
         \x20   const instance = result.instance === undefined ? result : result.instance;\n\
         \x20   wasm = instance.exports;\n\
         \x20   return __exports;\n\
         }\n\
         \n\
         module.exports = function loadWasmBundle(bundle) {\n\
         \x20   return __load_bytes(bundle).then(__finish);\n\
         };\n",
    );

    out
}

/// The byte-loading routine for one host capability.
fn load_bytes_routine(host: HostEnv) -> &'static str {
    match host {
        HostEnv::Browser => {
            "function __load_bytes(path) {\n\
             \x20   return fetch(path).then((response) => {\n\
             \x20       if (typeof WebAssembly.instantiateStreaming === 'function') {\n\
             \x20           return WebAssembly.instantiateStreaming(response, __imports());\n\
             \x20       }\n\
             \x20       return response\n\
             \x20           .arrayBuffer()\n\
             \x20           .then((bytes) => WebAssembly.instantiate(bytes, __imports()));\n\
             \x20   });\n\
             }\n"
        }
        HostEnv::Process => {
            "function __load_bytes(path) {\n\
             \x20   const bytes = require('fs').readFileSync(require('path').resolve(__dirname, path));\n\
             \x20   return WebAssembly.instantiate(bytes, __imports());\n\
             }\n"
        }
    }
}
