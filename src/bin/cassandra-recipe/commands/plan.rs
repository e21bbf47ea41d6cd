//! `cassandra-recipe plan` command
//!
//! Prints the resolved options, requirements, applicable patches and CMake
//! definitions. Nothing is fetched or written.

use anyhow::Result;

use super::{resolve_roots, resolve_settings, resolve_staging_dir};
use crate::cli::PlanArgs;
use cassandra_recipe::builder::{BuildPlan, StagingLayout};
use cassandra_recipe::util::Config;

pub fn execute(args: PlanArgs, config: &Config) -> Result<()> {
    let (settings, request) = resolve_settings(&args.settings, config)?;
    let roots = resolve_roots(&args.deps, config);
    let staging_dir = resolve_staging_dir(args.staging_dir.as_ref(), config)?;

    let plan = BuildPlan::new(settings, request, &roots, &StagingLayout::new(staging_dir));

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
