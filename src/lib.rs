//! cassandra-recipe - build recipe for the DataStax Cassandra C/C++ driver
//!
//! This crate fetches the pinned driver release, maps package options and
//! build settings onto CMake, builds and stages the library, and publishes
//! the link metadata consumers need.

pub mod builder;
pub mod core;
pub mod errors;
pub mod ops;
pub mod sources;
pub mod util;

pub use builder::BuildPlan;
pub use core::{OptionRequest, PackageOptions, Settings, RECIPE};
pub use errors::{RecipeError, RecipeResult};
pub use ops::{build, package_info, BuildOptions, PackageInfo};
