//! `cassandra-recipe build` command

use anyhow::{Context, Result};

use super::{print_info, resolve_fetch, resolve_roots, resolve_settings, resolve_staging_dir};
use crate::cli::BuildArgs;
use cassandra_recipe::ops::{build, BuildOptions};
use cassandra_recipe::util::Config;

pub fn execute(args: BuildArgs, config: &Config) -> Result<()> {
    let (settings, options) = resolve_settings(&args.settings, config)?;

    let opts = BuildOptions {
        settings,
        options,
        roots: resolve_roots(&args.deps, config),
        staging_dir: resolve_staging_dir(args.staging_dir.as_ref(), config)?,
        fetch: resolve_fetch(&args.fetch, config),
        cmake: args.cmake.or_else(|| config.build.cmake.clone()),
        jobs: args.jobs.or(config.build.jobs),
    };

    let result = build(&opts).with_context(|| {
        format!(
            "{} {} build for {} {} failed",
            cassandra_recipe::RECIPE.name,
            cassandra_recipe::RECIPE.version,
            settings.os,
            settings.arch
        )
    })?;

    eprintln!(
        "    Finished `{}` -> {}",
        result.plan.recipe.name,
        result.package_dir.display()
    );

    print_info(
        &result.info,
        args.format,
        Some(&result.package_dir),
    )
}
