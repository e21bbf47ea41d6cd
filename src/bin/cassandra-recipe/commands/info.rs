//! `cassandra-recipe info` command

use anyhow::Result;

use super::{print_info, resolve_settings};
use crate::cli::InfoArgs;
use cassandra_recipe::core::{PackageOptions, RECIPE};
use cassandra_recipe::ops::package_info;
use cassandra_recipe::util::Config;

pub fn execute(args: InfoArgs, config: &Config) -> Result<()> {
    let (settings, request) = resolve_settings(&args.settings, config)?;
    let options = PackageOptions::resolve(request, settings.os);

    let info = package_info(&RECIPE, &settings, &options);
    print_info(&info, args.format, args.package_root.as_deref())
}
