//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Gangway - builds Rust crates to WebAssembly for JavaScript bundlers
#[derive(Parser)]
#[command(name = "gangway")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build one crate asset and emit its bundler module
    Build(BuildArgs),

    /// Check build-tool availability
    Doctor,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Path to a source file inside the crate to build
    pub asset: PathBuf,

    /// Host environment the generated loader targets
    #[arg(long, value_enum, default_value = "browser")]
    pub target_env: TargetEnv,

    /// Build profile override
    #[arg(long, value_enum, env = "WASM_PACK_PROFILE")]
    pub profile: Option<ProfileArg>,

    /// Write the generated module here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Host environment flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetEnv {
    /// Browser-like host; the loader fetches the wasm binary
    Browser,
    /// Standalone process host; the loader reads the binary from disk
    Process,
}

/// Build profile flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    Dev,
    Profiling,
    Release,
}
