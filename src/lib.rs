//! Gangway - builds Rust crates to WebAssembly for JavaScript bundlers
//!
//! This crate provides the build-and-binding pipeline: it locates a crate's
//! manifest from any source file inside it, compiles the crate to a wasm
//! binary with whichever toolchain is installed, rewrites the wasm-bindgen
//! output into a bundler-facing module plus a host-agnostic loader, and
//! reports the source files the artifact depends on for incremental
//! rebuilds.

pub mod builder;
pub mod core;
pub mod ops;
pub mod transform;
pub mod util;

pub use builder::{BuildOutput, BuildProfile, Toolchain};
pub use crate::core::manifest::CrateManifest;
pub use ops::{build_asset, AssetOptions, AssetOutput};
pub use transform::HostEnv;
pub use util::ProbeCache;
