//! Source retrieval: download (or read) the release archive, extract it and
//! move the tree to its stable location.

use std::path::{Path, PathBuf};

use crate::builder::plan::StagingLayout;
use crate::core::{RecipeInfo, SOURCE_BASE_URL};
use crate::errors::{RecipeError, RecipeResult};
use crate::sources::{download, extract_tarball, verify_sha256, versioned_url};
use crate::util::fs::{ensure_dir, remove_dir_all_if_exists};

/// Where the source archive comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    /// Download the pinned release from upstream.
    Upstream,
    /// Use an archive already on disk.
    Archive(PathBuf),
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub origin: SourceOrigin,
    /// Expected SHA-256 of the archive
    pub sha256: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            origin: SourceOrigin::Upstream,
            sha256: None,
        }
    }
}

/// Fetch and extract the source tree, returning its path.
///
/// Any existing source tree is replaced, so patches always start from
/// pristine upstream files.
pub fn fetch_source(
    recipe: &RecipeInfo,
    layout: &StagingLayout,
    opts: &FetchOptions,
) -> RecipeResult<PathBuf> {
    let (location, data) = match opts.origin {
        SourceOrigin::Upstream => {
            let url = versioned_url(SOURCE_BASE_URL, recipe.version)
                .map_err(|e| RecipeError::fetch(SOURCE_BASE_URL, format!("{:#}", e)))?;
            let data =
                download(&url).map_err(|e| RecipeError::fetch(url.as_str(), format!("{:#}", e)))?;

            let archive_path = layout.archive_path(recipe);
            save_archive(&archive_path, &data)
                .map_err(|e| RecipeError::fetch(url.as_str(), format!("{:#}", e)))?;
            (url.to_string(), data)
        }
        SourceOrigin::Archive(ref path) => {
            tracing::info!("Using local archive {}", path.display());
            let location = path.display().to_string();
            let data =
                std::fs::read(path).map_err(|e| RecipeError::fetch(location.as_str(), e))?;
            (location, data)
        }
    };

    if let Some(ref expected) = opts.sha256 {
        verify_sha256(&data, expected).map_err(|e| RecipeError::fetch(location.as_str(), e))?;
    }

    unpack_source(recipe, layout, &data)
        .map_err(|e| RecipeError::fetch(location.as_str(), format!("{:#}", e)))
}

fn save_archive(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    use anyhow::Context;

    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    std::fs::write(path, data).with_context(|| format!("failed to write {}", path.display()))
}

/// Extract into scratch space inside the staging root, then rename the
/// versioned top-level directory to the stable source directory.
fn unpack_source(
    recipe: &RecipeInfo,
    layout: &StagingLayout,
    data: &[u8],
) -> anyhow::Result<PathBuf> {
    use anyhow::{bail, Context};

    ensure_dir(&layout.root)?;
    let scratch = tempfile::Builder::new()
        .prefix(".extract-")
        .tempdir_in(&layout.root)
        .context("failed to create extraction directory")?;

    extract_tarball(data, scratch.path())?;

    let extracted = scratch.path().join(recipe.extracted_dir_name());
    if !extracted.is_dir() {
        bail!(
            "archive does not contain the expected `{}` directory",
            recipe.extracted_dir_name()
        );
    }

    let source_dir = layout.source_dir();
    remove_dir_all_if_exists(&source_dir)?;
    std::fs::rename(&extracted, &source_dir).with_context(|| {
        format!(
            "failed to move {} to {}",
            extracted.display(),
            source_dir.display()
        )
    })?;

    tracing::info!("Extracted source to {}", source_dir.display());
    Ok(source_dir)
}
