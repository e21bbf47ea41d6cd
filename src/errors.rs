//! Error taxonomy for the recipe pipeline.
//!
//! Every stage failure is fatal. The pipeline stops at the first error and
//! leaves retry policy to whoever invoked it.

use std::path::PathBuf;

use thiserror::Error;

/// A failed pipeline stage.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// Downloading, verifying or extracting the source archive failed.
    #[error("failed to fetch source from {url}: {message}")]
    Fetch { url: String, message: String },

    /// A source patch could not be applied.
    #[error("patch `{patch}` failed on {}: {message}", .file.display())]
    Patch {
        patch: &'static str,
        file: PathBuf,
        message: String,
    },

    /// CMake could not be run or exited unsuccessfully.
    #[error("{step} failed{}\n{stderr}", .exit_code.map(|c| format!(" with exit code {}", c)).unwrap_or_default())]
    Build {
        step: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Install outputs are missing from the package tree.
    #[error("packaging failed: {message}")]
    Packaging { message: String },
}

impl RecipeError {
    pub(crate) fn fetch(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        RecipeError::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn packaging(message: impl Into<String>) -> Self {
        RecipeError::Packaging {
            message: message.into(),
        }
    }

    /// Short name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            RecipeError::Fetch { .. } => "fetch",
            RecipeError::Patch { .. } => "patch",
            RecipeError::Build { .. } => "build",
            RecipeError::Packaging { .. } => "package",
        }
    }
}

pub type RecipeResult<T> = Result<T, RecipeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_message_includes_exit_code() {
        let err = RecipeError::Build {
            step: "CMake configuration".to_string(),
            exit_code: Some(2),
            stderr: "CMake Error: boom".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("CMake configuration failed with exit code 2"));
        assert!(msg.contains("CMake Error: boom"));
        assert_eq!(err.stage(), "build");
    }

    #[test]
    fn test_build_error_without_exit_code() {
        let err = RecipeError::Build {
            step: "CMake build".to_string(),
            exit_code: None,
            stderr: String::new(),
        };

        assert!(err.to_string().starts_with("CMake build failed\n"));
    }

    #[test]
    fn test_patch_error_names_patch_and_file() {
        let err = RecipeError::Patch {
            patch: "mingw-install-guard",
            file: PathBuf::from("cmake/modules/CppDriver.cmake"),
            message: "anchor not found".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("mingw-install-guard"));
        assert!(msg.contains("CppDriver.cmake"));
    }
}
