//! `cassandra-recipe source` command

use anyhow::{Context, Result};

use super::{resolve_fetch, resolve_staging_dir};
use crate::cli::SourceArgs;
use cassandra_recipe::builder::StagingLayout;
use cassandra_recipe::core::RECIPE;
use cassandra_recipe::ops::fetch_source;
use cassandra_recipe::util::Config;

pub fn execute(args: SourceArgs, config: &Config) -> Result<()> {
    let staging_dir = resolve_staging_dir(args.staging_dir.as_ref(), config)?;
    let fetch = resolve_fetch(&args.fetch, config);

    let source_dir = fetch_source(&RECIPE, &StagingLayout::new(staging_dir), &fetch)
        .with_context(|| format!("could not get {} {} source", RECIPE.name, RECIPE.version))?;

    println!("{}", source_dir.display());
    Ok(())
}
