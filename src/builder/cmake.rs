//! CMake driver for the upstream source tree.

use std::path::PathBuf;

use crate::builder::plan::BuildPlan;
use crate::errors::{RecipeError, RecipeResult};
use crate::util::fs::ensure_dir;
use crate::util::process::{find_cmake, ProcessBuilder};

/// Oldest CMake the driver's build scripts accept.
pub const MIN_CMAKE_VERSION: semver::Version = semver::Version::new(3, 1, 0);

/// Runs CMake configure, build and install for one plan.
pub struct CMakeBuilder<'a> {
    plan: &'a BuildPlan,
    cmake: PathBuf,
    jobs: Option<usize>,
}

impl<'a> CMakeBuilder<'a> {
    /// Create a builder, locating CMake on PATH unless a path is given.
    pub fn new(plan: &'a BuildPlan, cmake: Option<PathBuf>) -> RecipeResult<Self> {
        let cmake = cmake.or_else(find_cmake).ok_or_else(|| RecipeError::Build {
            step: "CMake lookup".to_string(),
            exit_code: None,
            stderr: "CMake not found\n\
                     \n\
                     CMake is required to build the Cassandra driver.\n\
                     Install CMake and ensure it's in your PATH, or set `build.cmake`."
                .to_string(),
        })?;

        Ok(CMakeBuilder {
            plan,
            cmake,
            jobs: None,
        })
    }

    /// Number of parallel build jobs.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Configure and build.
    pub fn build(&self) -> RecipeResult<()> {
        self.check_version()?;

        ensure_dir(&self.plan.build_dir).map_err(|e| RecipeError::Build {
            step: "CMake configuration".to_string(),
            exit_code: None,
            stderr: format!("{:#}", e),
        })?;

        self.configure()?;
        self.compile()
    }

    /// Reject a CMake that is known to be too old.
    ///
    /// A version that cannot be determined is only logged.
    fn check_version(&self) -> RecipeResult<()> {
        let version = ProcessBuilder::new(&self.cmake)
            .arg("--version")
            .exec()
            .ok()
            .filter(|out| out.status.success())
            .and_then(|out| parse_cmake_version(&String::from_utf8_lossy(&out.stdout)));

        match version {
            Some(v) if v < MIN_CMAKE_VERSION => Err(RecipeError::Build {
                step: "CMake version check".to_string(),
                exit_code: None,
                stderr: format!("CMake {} is too old, need >= {}", v, MIN_CMAKE_VERSION),
            }),
            Some(v) => {
                tracing::debug!("using CMake {}", v);
                Ok(())
            }
            None => {
                tracing::warn!(
                    "could not determine the version of {}",
                    self.cmake.display()
                );
                Ok(())
            }
        }
    }

    fn configure(&self) -> RecipeResult<()> {
        tracing::info!("Configuring CMake project");

        ProcessBuilder::new(&self.cmake)
            .args(self.plan.configure_args())
            .run_step("CMake configuration")?;
        Ok(())
    }

    fn compile(&self) -> RecipeResult<()> {
        tracing::info!("Building CMake project");

        let mut cmd = ProcessBuilder::new(&self.cmake)
            .arg("--build")
            .arg(&self.plan.build_dir)
            .arg("--config")
            .arg(self.plan.settings.build_type.as_str());

        if let Some(jobs) = self.jobs {
            cmd = cmd.arg("--parallel").arg(jobs.to_string());
        }

        cmd.run_step("CMake build")?;
        Ok(())
    }

    /// Run the `install` target into the plan's package directory.
    pub fn install(&self) -> RecipeResult<()> {
        tracing::info!("Installing into {}", self.plan.package_dir.display());

        ProcessBuilder::new(&self.cmake)
            .arg("--build")
            .arg(&self.plan.build_dir)
            .arg("--target")
            .arg("install")
            .arg("--config")
            .arg(self.plan.settings.build_type.as_str())
            .run_step("CMake install")?;
        Ok(())
    }
}

/// Parse the first line of `cmake --version`, e.g. `cmake version 3.20.5`.
pub fn parse_cmake_version(stdout: &str) -> Option<semver::Version> {
    stdout.lines().find_map(|line| {
        let version_str = line.strip_prefix("cmake version ")?.trim();
        // "3.20.5-dirty", "3.28.0-rc1"
        let clean = version_str.split('-').next().unwrap_or(version_str);
        clean.parse().ok()
    })
}
