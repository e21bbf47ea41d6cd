//! Recipe identity and the derived package id.

use serde::Serialize;

use crate::core::options::PackageOptions;
use crate::core::settings::Settings;
use crate::util::hash::KeyedDigest;

/// Static description of the packaged library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecipeInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub homepage: &'static str,
    pub license: &'static str,
}

pub const RECIPE: RecipeInfo = RecipeInfo {
    name: "cassandra",
    version: "2.13.0",
    description: "Cassandra C++ Driver",
    url: "https://github.com/bincrafters/conan-cassandra",
    homepage: "https://github.com/datastax/cpp-driver",
    license: "Apache",
};

/// Base of the upstream tarball endpoint; the version is appended.
pub const SOURCE_BASE_URL: &str = "https://codeload.github.com/datastax/cpp-driver/tar.gz/";

/// Stable name of the extracted source tree inside the staging directory.
pub const SOURCE_SUBFOLDER: &str = "source_subfolder";

impl RecipeInfo {
    /// Directory name the upstream archive extracts to.
    pub fn extracted_dir_name(&self) -> String {
        format!("cpp-driver-{}", self.version)
    }

    /// File name the downloaded archive is saved under.
    pub fn archive_file_name(&self) -> String {
        format!("{}.tar.gz", self.extracted_dir_name())
    }

    /// Name of the driver library for the given linkage.
    pub fn library_name(&self, shared: bool) -> String {
        if shared {
            self.name.to_string()
        } else {
            format!("{}_static", self.name)
        }
    }
}

/// Identifier of one binary configuration of the package.
///
/// Two builds share a package id exactly when recipe, settings and resolved
/// options are all equal.
pub fn package_id(recipe: &RecipeInfo, settings: &Settings, options: &PackageOptions) -> String {
    let mut digest = KeyedDigest::new();
    digest
        .entry("name", recipe.name)
        .entry("version", recipe.version)
        .entry("os", settings.os)
        .entry("arch", settings.arch)
        .entry("compiler", settings.compiler)
        .entry("build_type", settings.build_type)
        .entry("shared", options.shared)
        .entry_opt("fPIC", options.fpic);
    digest.finish_short()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::OptionRequest;
    use crate::core::settings::{Arch, BuildType, Compiler, Os};

    fn linux() -> Settings {
        Settings::new(Os::Linux, Arch::X86_64, Compiler::Gcc, BuildType::Release)
    }

    #[test]
    fn test_source_names() {
        assert_eq!(RECIPE.extracted_dir_name(), "cpp-driver-2.13.0");
        assert_eq!(RECIPE.archive_file_name(), "cpp-driver-2.13.0.tar.gz");
    }

    #[test]
    fn test_library_name() {
        assert_eq!(RECIPE.library_name(true), "cassandra");
        assert_eq!(RECIPE.library_name(false), "cassandra_static");
    }

    #[test]
    fn test_package_id_is_deterministic() {
        let opts = PackageOptions::resolve(OptionRequest::default(), Os::Linux);
        assert_eq!(
            package_id(&RECIPE, &linux(), &opts),
            package_id(&RECIPE, &linux(), &opts)
        );
    }

    #[test]
    fn test_package_id_changes_with_inputs() {
        let settings = linux();
        let static_opts = PackageOptions::resolve(OptionRequest::default(), Os::Linux);
        let shared_opts = PackageOptions::resolve(
            OptionRequest {
                shared: true,
                fpic: true,
            },
            Os::Linux,
        );
        let base = package_id(&RECIPE, &settings, &static_opts);

        assert_ne!(base, package_id(&RECIPE, &settings, &shared_opts));

        let debug = Settings {
            build_type: BuildType::Debug,
            ..settings
        };
        assert_ne!(base, package_id(&RECIPE, &debug, &static_opts));

        let x86 = Settings {
            arch: Arch::X86,
            ..settings
        };
        assert_ne!(base, package_id(&RECIPE, &x86, &static_opts));
    }
}
