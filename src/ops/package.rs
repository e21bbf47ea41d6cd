//! Assemble the package tree from the build.

use std::path::{Path, PathBuf};

use crate::builder::{BuildPlan, CMakeBuilder};
use crate::errors::{RecipeError, RecipeResult};
use crate::util::fs::{copy_matching, files_under, remove_dir_all_if_exists};

/// License file shipped by upstream, relative to the source root.
pub const LICENSE_PATTERN: &str = "LICENSE.txt";

/// Copy the license, run the install target and verify the result.
///
/// The package directory is emptied first; only files installed by this
/// run count toward verification.
pub fn package(plan: &BuildPlan, cmake: &CMakeBuilder<'_>) -> RecipeResult<PathBuf> {
    remove_dir_all_if_exists(&plan.package_dir)
        .map_err(|e| RecipeError::packaging(format!("{:#}", e)))?;
    copy_license(&plan.source_dir, &plan.package_dir)?;

    cmake.install().map_err(|e| {
        RecipeError::packaging(format!("install step failed: {}", e))
    })?;

    verify_installed_library(&plan.package_dir, &plan.recipe.library_name(plan.options.shared))?;

    tracing::info!("Packaged into {}", plan.package_dir.display());
    Ok(plan.package_dir.clone())
}

/// Copy the upstream license into `<package>/license/`.
pub fn copy_license(source_dir: &Path, package_dir: &Path) -> RecipeResult<Vec<PathBuf>> {
    let dst = package_dir.join("license");
    let copied = copy_matching(source_dir, LICENSE_PATTERN, &dst)
        .map_err(|e| RecipeError::packaging(format!("{:#}", e)))?;

    if copied.is_empty() {
        return Err(RecipeError::packaging(format!(
            "no `{}` found in {}",
            LICENSE_PATTERN,
            source_dir.display()
        )));
    }

    Ok(copied)
}

/// Find the installed driver library, in any of its platform spellings.
///
/// `cassandra_static` matches `libcassandra_static.a` and
/// `cassandra_static.lib`; `cassandra` matches `libcassandra.so.2`,
/// `libcassandra.dylib`, `cassandra.dll` and `libcassandra.dll.a`.
pub fn verify_installed_library(package_dir: &Path, library: &str) -> RecipeResult<PathBuf> {
    files_under(package_dir)
        .into_iter()
        .find(|path| is_library_file(path, library))
        .ok_or_else(|| {
            RecipeError::packaging(format!(
                "library `{}` not found in {}",
                library,
                package_dir.display()
            ))
        })
}

fn is_library_file(path: &Path, library: &str) -> bool {
    const EXTENSIONS: &[&str] = &["a", "lib", "so", "dylib", "dll"];

    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let stem = file_name.strip_prefix("lib").unwrap_or(file_name);
    let Some(rest) = stem.strip_prefix(library) else {
        return false;
    };

    // the remainder is the extension chain: ".a", ".so.2.13.0", ".dll.a"
    let mut parts = rest.split('.');
    parts.next() == Some("")
        && parts
            .next()
            .is_some_and(|ext| EXTENSIONS.contains(&ext))
}
