//! High-level operations.
//!
//! One module per pipeline stage, plus the pipeline itself.

pub mod fetch;
pub mod package;
pub mod package_info;
pub mod recipe_build;

pub use fetch::{fetch_source, FetchOptions, SourceOrigin};
pub use package::package;
pub use package_info::{package_info, PackageInfo};
pub use recipe_build::{build, BuildOptions, BuildResult};
