//! Core data types for the recipe.
//!
//! This module contains the inputs every pipeline stage reads:
//! - Build settings (os, arch, compiler, build type)
//! - Package options and their platform filtering
//! - Pinned requirements and linkage propagation
//! - Recipe identity and package ids

pub mod options;
pub mod recipe;
pub mod requirement;
pub mod settings;

pub use options::{OptionRequest, PackageOptions};
pub use recipe::{package_id, RecipeInfo, RECIPE, SOURCE_BASE_URL, SOURCE_SUBFOLDER};
pub use requirement::{Requirement, Requirements, LIBUV, OPENSSL};
pub use settings::{Arch, BuildType, Compiler, Os, ParseSettingError, Settings};
