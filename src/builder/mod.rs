//! Toolchain probing and build execution.

pub mod depinfo;
pub mod orchestrator;
pub mod toolchain;

pub use orchestrator::{
    build_crate, select_strategy, BuildOutput, BuildProfile, BuildStrategy, WASM_TARGET,
};
pub use toolchain::Toolchain;
