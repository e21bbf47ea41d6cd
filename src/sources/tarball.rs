//! Gzip tarball download and extraction.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use url::Url;

use crate::util::hash::sha256_bytes;

/// Build the download URL for a version from a base endpoint.
///
/// The base must end with `/` so the version is appended as the last path
/// segment.
pub fn versioned_url(base: &str, version: &str) -> Result<Url> {
    let base = Url::parse(base.trim()).with_context(|| format!("invalid source URL: {}", base))?;
    if base.scheme() != "https" {
        bail!("source URL must use https: {}", base);
    }
    base.join(version)
        .with_context(|| format!("failed to append version `{}` to {}", version, base))
}

/// Download a file into memory, showing a progress bar on a terminal.
pub fn download(url: &Url) -> Result<Vec<u8>> {
    tracing::info!("Downloading {}", url);

    let response = reqwest::blocking::get(url.as_str())
        .with_context(|| format!("failed to download {}", url))?;

    if !response.status().is_success() {
        bail!("failed to download {}: HTTP {}", url, response.status());
    }

    let pb = match response.content_length() {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };

    let mut data = Vec::new();
    pb.wrap_read(response)
        .read_to_end(&mut data)
        .context("failed to read response body")?;
    pb.finish_and_clear();

    tracing::debug!("downloaded {} bytes", data.len());
    Ok(data)
}

/// Check archive bytes against an expected SHA-256.
pub fn verify_sha256(data: &[u8], expected: &str) -> Result<()> {
    let actual = sha256_bytes(data);
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        bail!(
            "checksum mismatch:\n  expected: {}\n  actual:   {}",
            expected.trim(),
            actual
        );
    }
    tracing::debug!("archive checksum verified: {}", &actual[..16]);
    Ok(())
}

/// Extract a gzip-compressed tarball into `dest`.
///
/// Entries keep their archive paths. Entries that would land outside
/// `dest`, directly or through a link, are rejected.
pub fn extract_tarball(data: &[u8], dest: &Path) -> Result<()> {
    use flate2::read::GzDecoder;
    use tar::Archive;

    std::fs::create_dir_all(dest)
        .with_context(|| format!("failed to create destination directory: {}", dest.display()))?;

    let mut archive = Archive::new(GzDecoder::new(data));

    for entry in archive.entries().context("failed to read tarball entries")? {
        let mut entry = entry.context("failed to read tarball entry")?;
        let entry_path = entry.path().context("failed to get entry path")?.into_owned();

        if resolve_inside(Path::new(""), &entry_path).is_none() {
            bail!(
                "tarball entry escapes destination directory: {}",
                entry_path.display()
            );
        }

        let entry_type = entry.header().entry_type();
        match entry_type {
            tar::EntryType::Directory | tar::EntryType::Regular | tar::EntryType::Continuous => {}
            tar::EntryType::Symlink | tar::EntryType::Link => {
                let target = entry
                    .link_name()
                    .context("failed to read link target")?
                    .with_context(|| format!("link without target: {}", entry_path.display()))?
                    .into_owned();

                // symlinks resolve from their own directory, hard links from the archive root
                let base = match entry_type {
                    tar::EntryType::Symlink => entry_path.parent().unwrap_or(Path::new("")),
                    _ => Path::new(""),
                };
                if resolve_inside(base, &target).is_none() {
                    bail!(
                        "tarball link escapes destination directory: {} -> {}",
                        entry_path.display(),
                        target.display()
                    );
                }
            }
            _ => {
                // pax headers, fifos, devices
                tracing::debug!(
                    "skipping entry type {:?}: {}",
                    entry_type,
                    entry_path.display()
                );
                continue;
            }
        }

        // unpack_in refuses to write through parent directories that resolve
        // outside `dest`
        entry
            .unpack_in(dest)
            .with_context(|| format!("failed to extract {}", entry_path.display()))?;
    }

    Ok(())
}

/// Lexically join `path` onto `base`, both relative to the extraction root.
///
/// Returns `None` when the result is absolute or climbs above the root.
fn resolve_inside(base: &Path, path: &Path) -> Option<PathBuf> {
    use std::path::Component;

    let mut resolved = PathBuf::from(base);
    for component in path.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}
