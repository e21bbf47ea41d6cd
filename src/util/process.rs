//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};

use crate::errors::{RecipeError, RecipeResult};

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Execute the command and wait for completion, capturing output.
    pub fn exec(&self) -> Result<Output> {
        let output = self
            .build_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        Ok(output)
    }

    /// Execute as one named build step.
    ///
    /// A spawn failure or an unsuccessful exit becomes a build error
    /// carrying the exit code and the captured stderr.
    pub fn run_step(&self, step: &str) -> RecipeResult<Output> {
        tracing::debug!("running `{}`", self.display_command());

        let output = self.exec().map_err(|e| RecipeError::Build {
            step: step.to_string(),
            exit_code: None,
            stderr: format!("{:#}", e),
        })?;

        if !output.status.success() {
            return Err(RecipeError::Build {
                step: step.to_string(),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(output)
    }

    /// Display the command for logs and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Find CMake.
pub fn find_cmake() -> Option<PathBuf> {
    find_executable("cmake")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("cmake").args(["--build", "build", "--config", "Release"]);

        assert_eq!(pb.display_command(), "cmake --build build --config Release");
        assert_eq!(pb.get_args().len(), 4);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_step_success() {
        let output = ProcessBuilder::new("echo").arg("hello").run_step("echo").unwrap();
        assert!(String::from_utf8_lossy(&output.stdout).contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_step_reports_exit_code() {
        let err = ProcessBuilder::new("sh")
            .args(["-c", "echo oops >&2; exit 3"])
            .run_step("CMake build")
            .unwrap_err();

        match err {
            RecipeError::Build {
                step,
                exit_code,
                stderr,
            } => {
                assert_eq!(step, "CMake build");
                assert_eq!(exit_code, Some(3));
                assert!(stderr.contains("oops"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_step_spawn_failure() {
        let err = ProcessBuilder::new("definitely-not-a-real-program-xyz")
            .run_step("CMake configuration")
            .unwrap_err();

        assert!(matches!(err, RecipeError::Build { exit_code: None, .. }));
    }
}
