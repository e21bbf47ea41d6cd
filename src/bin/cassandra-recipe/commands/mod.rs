//! Command implementations

pub mod build;
pub mod completions;
pub mod info;
pub mod plan;
pub mod source;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::cli::{DependencyArgs, FetchArgs, OutputFormat, SettingsArgs};
use cassandra_recipe::builder::DependencyRoots;
use cassandra_recipe::core::{Arch, BuildType, Compiler, OptionRequest, Os, Settings};
use cassandra_recipe::ops::{FetchOptions, PackageInfo, SourceOrigin};
use cassandra_recipe::util::config::default_staging_dir;
use cassandra_recipe::util::Config;

/// Load the explicit or default configuration file.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    Config::discover(explicit, &cwd)
}

/// Settings and options: CLI > config file > host defaults.
pub fn resolve_settings(
    args: &SettingsArgs,
    config: &Config,
) -> Result<(Settings, OptionRequest)> {
    let host = Settings::host();
    let cfg = &config.settings;

    let os = match args.os.as_ref().or(cfg.os.as_ref()) {
        Some(s) => s.parse::<Os>()?,
        None => host.os,
    };
    let arch = match args.arch.as_ref().or(cfg.arch.as_ref()) {
        Some(s) => s.parse::<Arch>()?,
        None => host.arch,
    };
    let compiler = match args.compiler.as_ref().or(cfg.compiler.as_ref()) {
        Some(s) => s.parse::<Compiler>()?,
        None => Compiler::default_for(os),
    };
    let build_type = match args.build_type.as_ref().or(cfg.build_type.as_ref()) {
        Some(s) => s.parse::<BuildType>()?,
        None => BuildType::default(),
    };

    let fpic = args.fpic.or(config.options.fpic);
    if os == Os::Windows && fpic.is_some() {
        tracing::warn!("option fPIC does not exist on Windows; ignoring it");
    }

    let defaults = OptionRequest::default();
    let options = OptionRequest {
        shared: args
            .shared
            .or(config.options.shared)
            .unwrap_or(defaults.shared),
        fpic: fpic.unwrap_or(defaults.fpic),
    };

    Ok((Settings::new(os, arch, compiler, build_type), options))
}

pub fn resolve_roots(args: &DependencyArgs, config: &Config) -> DependencyRoots {
    DependencyRoots {
        libuv: args
            .libuv_root
            .clone()
            .or_else(|| config.dependencies.libuv_root.clone()),
        openssl: args
            .openssl_root
            .clone()
            .or_else(|| config.dependencies.openssl_root.clone()),
    }
}

pub fn resolve_fetch(args: &FetchArgs, config: &Config) -> FetchOptions {
    let origin = match args.archive.clone().or_else(|| config.source.archive.clone()) {
        Some(path) => SourceOrigin::Archive(path),
        None => SourceOrigin::Upstream,
    };

    FetchOptions {
        origin,
        sha256: args.sha256.clone().or_else(|| config.source.sha256.clone()),
    }
}

pub fn resolve_staging_dir(arg: Option<&PathBuf>, config: &Config) -> Result<PathBuf> {
    arg.cloned()
        .or_else(|| config.build.staging_dir.clone())
        .or_else(default_staging_dir)
        .ok_or_else(|| anyhow!("could not determine a staging directory; pass --staging-dir"))
}

/// Write package metadata to stdout in the requested format.
pub fn print_info(
    info: &PackageInfo,
    format: OutputFormat,
    package_root: Option<&Path>,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(info)?);
        }
        OutputFormat::Cargo => {
            print!("{}", info.to_cargo_directives(package_root));
        }
    }
    Ok(())
}
