//! Toolchain availability probing.

use crate::util::process::find_executable;

/// Which of the external build tools are installed.
///
/// Computed once per asset build and treated as read-only for its duration;
/// never cached across builds, since tools can be installed between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toolchain {
    /// `wasm-pack`, the managed build orchestrator
    pub wasm_pack: bool,

    /// `cargo`, the base compiler driver
    pub cargo: bool,

    /// `wasm-bindgen`, the binding generator
    pub wasm_bindgen: bool,
}

impl Toolchain {
    /// Probe PATH for each tool.
    ///
    /// The three checks are independent; any lookup failure reduces to
    /// "absent" and is never propagated.
    pub fn probe() -> Self {
        Toolchain {
            wasm_pack: find_executable("wasm-pack").is_some(),
            cargo: find_executable("cargo").is_some(),
            wasm_bindgen: find_executable("wasm-bindgen").is_some(),
        }
    }
}
