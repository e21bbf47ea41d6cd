//! Build planning and execution.
//!
//! This module turns settings and options into a CMake invocation: the
//! build plan, the version-pinned source patches and the CMake driver.

pub mod cmake;
pub mod patch;
pub mod plan;

pub use cmake::CMakeBuilder;
pub use patch::{apply_patches, patches_for, SourcePatch};
pub use plan::{BuildPlan, Definitions, DependencyRoots, StagingLayout};
