//! Implementation of `gangway build`.

use anyhow::Result;

use gangway::util::fs::write_string;
use gangway::{build_asset, AssetOptions, BuildProfile, HostEnv, ProbeCache};

use crate::cli::{BuildArgs, ProfileArg, TargetEnv};

pub fn execute(args: BuildArgs) -> Result<()> {
    let opts = AssetOptions {
        host: match args.target_env {
            TargetEnv::Browser => HostEnv::Browser,
            TargetEnv::Process => HostEnv::Process,
        },
        profile: args.profile.map(|p| match p {
            ProfileArg::Dev => BuildProfile::Dev,
            ProfileArg::Profiling => BuildProfile::Profiling,
            ProfileArg::Release => BuildProfile::Release,
        }),
    };

    let cache = ProbeCache::new();
    let output = build_asset(&args.asset, &opts, &cache)?;

    tracing::info!(
        "{} binding(s), {} dependency edge(s)",
        output.bindings.len(),
        output.dependencies.len()
    );
    tracing::info!("loader module: {}", output.loader_path.display());

    match args.out {
        Some(path) => write_string(&path, &output.module)?,
        None => print!("{}", output.module),
    }

    Ok(())
}
