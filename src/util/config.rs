//! Configuration file support.
//!
//! The recipe reads an optional `cassandra-recipe.toml` from the current
//! directory (or the path given with `--config`). Every value can also be
//! given on the command line; command-line values take precedence.
//!
//! ```toml
//! [settings]
//! os = "Linux"
//! arch = "x86_64"
//! compiler = "gcc"
//! build_type = "Release"
//!
//! [options]
//! shared = false
//! fPIC = true
//!
//! [dependencies]
//! libuv_root = "/opt/libuv"
//! openssl_root = "/opt/openssl"
//!
//! [build]
//! cmake = "/usr/bin/cmake"
//! staging_dir = "build-area"
//! jobs = 8
//!
//! [source]
//! sha256 = "..."
//! archive = "cpp-driver-2.13.0.tar.gz"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "cassandra-recipe.toml";

/// Recipe configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub settings: SettingsConfig,
    pub options: OptionsConfig,
    pub dependencies: DependenciesConfig,
    pub build: BuildConfig,
    pub source: SourceConfig,
}

/// Settings overrides. Strings are parsed by the caller so that parse
/// errors name the offending setting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsConfig {
    pub os: Option<String>,
    pub arch: Option<String>,
    pub compiler: Option<String>,
    pub build_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsConfig {
    pub shared: Option<bool>,
    #[serde(rename = "fPIC")]
    pub fpic: Option<bool>,
}

/// Install roots of the pinned requirements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DependenciesConfig {
    pub libuv_root: Option<PathBuf>,
    pub openssl_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Path to the cmake executable (default: found on PATH)
    pub cmake: Option<PathBuf>,

    /// Root of the staging tree (default: user cache directory)
    pub staging_dir: Option<PathBuf>,

    /// Parallel build jobs passed to `cmake --build`
    pub jobs: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Expected SHA-256 of the source archive
    pub sha256: Option<String>,

    /// Local archive used instead of downloading
    pub archive: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.resolve_relative_paths(base);
        }

        Ok(config)
    }

    /// Load the explicit config file, or the default one if it exists.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = cwd.join(CONFIG_FILE_NAME);
        if default_path.exists() {
            tracing::debug!("loading config from {}", default_path.display());
            Self::load(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Paths in the file are relative to the file's directory.
    fn resolve_relative_paths(&mut self, base: &Path) {
        let fields = [
            &mut self.dependencies.libuv_root,
            &mut self.dependencies.openssl_root,
            &mut self.build.staging_dir,
            &mut self.source.archive,
        ];

        for field in fields {
            if let Some(path) = field.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }
}

/// Default staging root under the user cache directory.
pub fn default_staging_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "cassandra-recipe").map(|d| d.cache_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [settings]
            os = "Windows"
            compiler = "gcc"

            [options]
            shared = true
            fPIC = false

            [dependencies]
            libuv_root = "/opt/libuv"

            [build]
            jobs = 4

            [source]
            sha256 = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(config.settings.os.as_deref(), Some("Windows"));
        assert_eq!(config.settings.arch, None);
        assert_eq!(config.options.shared, Some(true));
        assert_eq!(config.options.fpic, Some(false));
        assert_eq!(config.dependencies.libuv_root, Some(PathBuf::from("/opt/libuv")));
        assert_eq!(config.build.jobs, Some(4));
        assert_eq!(config.source.sha256.as_deref(), Some("abc"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: Result<Config, _> = toml::from_str("[options]\nshraed = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_discover_without_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = Config::discover(None, tmp.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_discover_explicit_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(Config::discover(Some(&missing), tmp.path()).is_err());
    }

    #[test]
    fn test_relative_paths_resolved_against_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[build]\nstaging_dir = \"stage\"\n[dependencies]\nopenssl_root = \"/abs/ssl\"\n",
        )
        .unwrap();

        let config = Config::discover(None, tmp.path()).unwrap();
        assert_eq!(config.build.staging_dir, Some(tmp.path().join("stage")));
        assert_eq!(config.dependencies.openssl_root, Some(PathBuf::from("/abs/ssl")));
    }
}
