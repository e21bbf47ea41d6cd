//! The full recipe pipeline.
//!
//! configure → fetch → [patch] → build → package → publish. Each stage
//! runs once, in order; the first failure aborts the run.

use std::path::PathBuf;
use std::time::Instant;

use crate::builder::{apply_patches, BuildPlan, CMakeBuilder, DependencyRoots, StagingLayout};
use crate::core::{OptionRequest, Settings};
use crate::errors::RecipeResult;
use crate::ops::fetch::{fetch_source, FetchOptions};
use crate::ops::package::package;
use crate::ops::package_info::{package_info, PackageInfo};

/// Inputs of one pipeline run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub settings: Settings,
    pub options: OptionRequest,
    pub roots: DependencyRoots,
    pub staging_dir: PathBuf,
    pub fetch: FetchOptions,
    /// CMake executable (default: found on PATH)
    pub cmake: Option<PathBuf>,
    pub jobs: Option<usize>,
}

/// Outputs of a successful run.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub plan: BuildPlan,
    pub package_dir: PathBuf,
    pub info: PackageInfo,
}

/// Run every stage of the recipe.
pub fn build(opts: &BuildOptions) -> RecipeResult<BuildResult> {
    let start = Instant::now();
    let layout = StagingLayout::new(&opts.staging_dir);
    let plan = BuildPlan::new(opts.settings, opts.options, &opts.roots, &layout);

    tracing::info!(
        "Building {} {} ({}, package id {})",
        plan.recipe.name,
        plan.recipe.version,
        plan.options.linkage(),
        plan.package_id
    );
    for req in plan.requirements.iter() {
        tracing::debug!(
            "requires {}{}",
            req,
            req.shared
                .map(|s| format!(" (shared={})", s))
                .unwrap_or_default()
        );
    }

    fetch_source(&plan.recipe, &layout, &opts.fetch)?;
    apply_patches(&plan.patches, &plan.source_dir)?;

    let cmake = CMakeBuilder::new(&plan, opts.cmake.clone())?.jobs(opts.jobs);
    cmake.build()?;

    let package_dir = package(&plan, &cmake)?;
    let info = package_info(&plan.recipe, &plan.settings, &plan.options);

    tracing::info!(
        "Finished {} in {:.2}s",
        plan.recipe.name,
        start.elapsed().as_secs_f64()
    );

    Ok(BuildResult {
        plan,
        package_dir,
        info,
    })
}
