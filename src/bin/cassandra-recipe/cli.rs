//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Build recipe for the DataStax Cassandra C/C++ driver
#[derive(Parser)]
#[command(name = "cassandra-recipe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: ./cassandra-recipe.toml if present)
    #[arg(long, global = true, env = "CASSANDRA_RECIPE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the link metadata for a configuration
    Info(InfoArgs),

    /// Print the resolved build plan as JSON without building
    Plan(PlanArgs),

    /// Fetch and extract the driver source
    Source(SourceArgs),

    /// Fetch, patch, build and package the driver
    Build(BuildArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Build settings and package options.
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Target operating system (Windows, Linux, Macos, FreeBSD)
    #[arg(long)]
    pub os: Option<String>,

    /// Target architecture (x86, x86_64, armv7, armv8)
    #[arg(long)]
    pub arch: Option<String>,

    /// Compiler (gcc, clang, apple-clang, "Visual Studio")
    #[arg(long)]
    pub compiler: Option<String>,

    /// CMake build type (Debug, Release, RelWithDebInfo, MinSizeRel)
    #[arg(long)]
    pub build_type: Option<String>,

    /// Build a shared library
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub shared: Option<bool>,

    /// Build position-independent code (ignored on Windows)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub fpic: Option<bool>,
}

/// Install roots of libuv and OpenSSL.
#[derive(Args, Debug, Default)]
pub struct DependencyArgs {
    /// libuv install root
    #[arg(long)]
    pub libuv_root: Option<PathBuf>,

    /// OpenSSL install root
    #[arg(long)]
    pub openssl_root: Option<PathBuf>,
}

/// Source archive selection.
#[derive(Args, Debug, Default)]
pub struct FetchArgs {
    /// Use a local source archive instead of downloading
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Expected SHA-256 of the source archive
    #[arg(long)]
    pub sha256: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Cargo build-script directives
    Cargo,
}

#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Package root used for absolute search paths in cargo output
    #[arg(long)]
    pub package_root: Option<PathBuf>,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(flatten)]
    pub deps: DependencyArgs,

    /// Staging directory (default: user cache directory)
    #[arg(long)]
    pub staging_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct SourceArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Staging directory (default: user cache directory)
    #[arg(long)]
    pub staging_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(flatten)]
    pub deps: DependencyArgs,

    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Staging directory (default: user cache directory)
    #[arg(long)]
    pub staging_dir: Option<PathBuf>,

    /// Path to the cmake executable
    #[arg(long)]
    pub cmake: Option<PathBuf>,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Output format for the published metadata
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
