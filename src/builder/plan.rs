//! Build plan generation.
//!
//! A BuildPlan is the complete, inspectable description of one build: the
//! resolved options and requirements, the staging directories, the source
//! patches that apply and every CMake definition. It is a pure function of
//! settings, requested options, dependency roots and the staging root.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::patch::{patches_for, SourcePatch};
use crate::core::{
    package_id, Compiler, OptionRequest, Os, PackageOptions, RecipeInfo, Requirements, Settings,
    RECIPE, SOURCE_SUBFOLDER,
};

/// Install roots of the pinned requirements.
///
/// A missing root leaves the matching definitions unset, so the driver's
/// own CMake modules search the system instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyRoots {
    pub libuv: Option<PathBuf>,
    pub openssl: Option<PathBuf>,
}

/// Directory layout below the staging root.
///
/// ```text
/// <root>/cpp-driver-2.13.0.tar.gz
/// <root>/source_subfolder/
/// <root>/build/<package id>/
/// <root>/package/<package id>/
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagingLayout {
    pub root: PathBuf,
}

impl StagingLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        StagingLayout { root: root.into() }
    }

    pub fn archive_path(&self, recipe: &RecipeInfo) -> PathBuf {
        self.root.join(recipe.archive_file_name())
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.join(SOURCE_SUBFOLDER)
    }

    pub fn build_dir(&self, package_id: &str) -> PathBuf {
        self.root.join("build").join(package_id)
    }

    pub fn package_dir(&self, package_id: &str) -> PathBuf {
        self.root.join("package").join(package_id)
    }
}

/// CMake cache definitions, kept sorted for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Definitions(BTreeMap<&'static str, String>);

impl Definitions {
    pub fn set_bool(&mut self, key: &'static str, value: bool) {
        self.0
            .insert(key, if value { "ON" } else { "OFF" }.to_string());
    }

    pub fn set_path(&mut self, key: &'static str, value: &Path) {
        self.0.insert(key, value.display().to_string());
    }

    pub fn set_str(&mut self, key: &'static str, value: &str) {
        self.0.insert(key, value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// `-DKEY=VALUE` arguments.
    pub fn to_args(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|(key, value)| format!("-D{}={}", key, value))
            .collect()
    }
}

/// A complete build plan.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub recipe: RecipeInfo,
    pub settings: Settings,
    pub options: PackageOptions,
    pub requirements: Requirements,
    pub package_id: String,

    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub package_dir: PathBuf,

    /// Names of the source patches that apply to this configuration
    #[serde(serialize_with = "serialize_patch_names")]
    pub patches: Vec<&'static SourcePatch>,

    pub definitions: Definitions,
}

fn serialize_patch_names<S>(patches: &[&'static SourcePatch], s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.collect_seq(patches.iter().map(|p| p.name))
}

impl BuildPlan {
    /// Resolve options and requirements and derive every build input.
    pub fn new(
        settings: Settings,
        request: OptionRequest,
        roots: &DependencyRoots,
        layout: &StagingLayout,
    ) -> Self {
        let options = PackageOptions::resolve(request, settings.os);
        let requirements = Requirements::resolve(&options);
        let package_id = package_id(&RECIPE, &settings, &options);
        let package_dir = layout.package_dir(&package_id);

        let definitions = cmake_definitions(&settings, &options, roots, &package_dir);

        tracing::debug!(
            "planned {} {} build for {}/{} ({}), package id {}",
            options.linkage(),
            settings.build_type,
            settings.os,
            settings.arch,
            settings.compiler,
            package_id
        );

        BuildPlan {
            recipe: RECIPE,
            settings,
            options,
            requirements,
            source_dir: layout.source_dir(),
            build_dir: layout.build_dir(&package_id),
            package_dir,
            package_id,
            patches: patches_for(&settings, &options),
            definitions,
        }
    }

    /// Arguments for the CMake configure step.
    pub fn configure_args(&self) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            self.source_dir.display().to_string(),
            "-B".to_string(),
            self.build_dir.display().to_string(),
        ];
        args.extend(self.definitions.to_args());
        args
    }
}

/// Map options and settings onto the driver's CMake definitions.
fn cmake_definitions(
    settings: &Settings,
    options: &PackageOptions,
    roots: &DependencyRoots,
    package_dir: &Path,
) -> Definitions {
    let mut defs = Definitions::default();

    defs.set_bool("CASS_BUILD_STATIC", !options.shared);
    defs.set_bool("CASS_USE_STATIC_LIBS", !options.shared);
    defs.set_bool("CASS_BUILD_SHARED", options.shared);

    if let Some(ref libuv) = roots.libuv {
        defs.set_path("LIBUV_ROOT_DIR", libuv);

        // The driver's FindLibuv cannot locate a shared libuv on Windows.
        if settings.os == Os::Windows && options.shared {
            let library = if settings.compiler == Compiler::Gcc {
                libuv.join("bin").join("libuv.dll")
            } else {
                libuv.join("lib").join("libuv.dll.lib")
            };
            defs.set_path("LIBUV_LIBRARY", &library);
        }
    }

    if let Some(ref openssl) = roots.openssl {
        defs.set_path("OPENSSL_ROOT_DIR", openssl);
    }

    defs.set_str("CMAKE_BUILD_TYPE", settings.build_type.as_str());
    defs.set_path("CMAKE_INSTALL_PREFIX", package_dir);
    defs.set_bool("BUILD_SHARED_LIBS", options.shared);
    if let Some(fpic) = options.fpic {
        defs.set_bool("CMAKE_POSITION_INDEPENDENT_CODE", fpic);
    }

    defs
}
