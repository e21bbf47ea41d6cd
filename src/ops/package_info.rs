//! Link metadata published to consumers.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use crate::core::{Arch, Compiler, Os, PackageOptions, RecipeInfo, Settings};

/// Windows libraries the driver needs on every link.
pub const WINDOWS_SYSTEM_LIBS: &[&str] =
    &["iphlpapi", "psapi", "wsock32", "crypt32", "ws2_32", "userenv"];

pub const LINUX_SYSTEM_LIBS: &[&str] = &["pthread", "rt"];

/// Define consumers need when linking the static driver on Windows.
pub const STATIC_DEFINE: &str = "CASS_STATIC";

/// What a consumer needs to link against the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    /// Whether the driver library is shared
    pub shared: bool,
    /// Libraries to link, driver first, then system libraries
    pub libs: Vec<String>,
    pub defines: Vec<String>,
    /// Package-relative directories
    pub include_dirs: Vec<String>,
    pub lib_dirs: Vec<String>,
    pub bin_dirs: Vec<String>,
}

/// Compute the metadata for a configuration.
pub fn package_info(
    recipe: &RecipeInfo,
    settings: &Settings,
    options: &PackageOptions,
) -> PackageInfo {
    let mut libs = vec![recipe.library_name(options.shared)];
    let mut defines = Vec::new();

    match settings.os {
        Os::Windows => {
            libs.extend(WINDOWS_SYSTEM_LIBS.iter().map(|s| s.to_string()));
            if !options.shared {
                defines.push(STATIC_DEFINE.to_string());
            }
        }
        Os::Linux => {
            libs.extend(LINUX_SYSTEM_LIBS.iter().map(|s| s.to_string()));
            // clang on 32-bit x86 emits libcalls for 64-bit atomics
            if settings.compiler == Compiler::Clang && settings.arch == Arch::X86 {
                libs.push("atomic".to_string());
            }
        }
        Os::Macos | Os::FreeBSD => {}
    }

    PackageInfo {
        shared: options.shared,
        libs,
        defines,
        include_dirs: vec!["include".to_string()],
        lib_dirs: vec!["lib".to_string()],
        bin_dirs: vec!["bin".to_string()],
    }
}

impl PackageInfo {
    /// Render as Cargo build-script directives.
    ///
    /// The first library is the driver itself and takes the package's
    /// linkage; the rest are system libraries. With a package root, search
    /// paths are emitted as absolute paths and the include directory is
    /// exported as `DEP_CASSANDRA_INCLUDE`. Preprocessor defines are exported
    /// as `DEP_CASSANDRA_DEFINES` for build scripts that compile C against
    /// the driver.
    pub fn to_cargo_directives(&self, package_root: Option<&Path>) -> String {
        let mut out = String::new();

        if let Some(root) = package_root {
            for dir in &self.lib_dirs {
                let _ = writeln!(
                    out,
                    "cargo:rustc-link-search=native={}",
                    root.join(dir).display()
                );
            }
        }

        for (i, lib) in self.libs.iter().enumerate() {
            let kind = if i == 0 && !self.shared { "static=" } else { "" };
            let _ = writeln!(out, "cargo:rustc-link-lib={}{}", kind, lib);
        }

        if let Some(root) = package_root {
            if let Some(dir) = self.include_dirs.first() {
                let _ = writeln!(out, "cargo:include={}", root.join(dir).display());
            }
        }

        if !self.defines.is_empty() {
            let _ = writeln!(out, "cargo:defines={}", self.defines.join(" "));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BuildType, OptionRequest, RECIPE};

    fn info(os: Os, arch: Arch, compiler: Compiler, shared: bool) -> PackageInfo {
        let settings = Settings::new(os, arch, compiler, BuildType::Release);
        let options = PackageOptions::resolve(OptionRequest { shared, fpic: true }, os);
        package_info(&RECIPE, &settings, &options)
    }

    #[test]
    fn test_linux_static_gcc() {
        let info = info(Os::Linux, Arch::X86_64, Compiler::Gcc, false);
        assert_eq!(info.libs, ["cassandra_static", "pthread", "rt"]);
        assert!(info.defines.is_empty());
    }

    #[test]
    fn test_linux_static_clang_x86_adds_atomic() {
        let info = info(Os::Linux, Arch::X86, Compiler::Clang, false);
        assert_eq!(info.libs, ["cassandra_static", "pthread", "rt", "atomic"]);
    }

    #[test]
    fn test_atomic_needs_both_clang_and_x86() {
        assert!(!info(Os::Linux, Arch::X86_64, Compiler::Clang, false)
            .libs
            .contains(&"atomic".to_string()));
        assert!(!info(Os::Linux, Arch::X86, Compiler::Gcc, false)
            .libs
            .contains(&"atomic".to_string()));
        assert!(!info(Os::FreeBSD, Arch::X86, Compiler::Clang, false)
            .libs
            .contains(&"atomic".to_string()));
    }

    #[test]
    fn test_windows_shared() {
        let info = info(Os::Windows, Arch::X86_64, Compiler::VisualStudio, true);
        assert_eq!(
            info.libs,
            ["cassandra", "iphlpapi", "psapi", "wsock32", "crypt32", "ws2_32", "userenv"]
        );
        assert!(info.defines.is_empty());
    }

    #[test]
    fn test_windows_static_has_define() {
        let info = info(Os::Windows, Arch::X86, Compiler::Gcc, false);
        assert_eq!(info.libs[0], "cassandra_static");
        assert_eq!(&info.libs[1..], WINDOWS_SYSTEM_LIBS);
        assert_eq!(info.defines, ["CASS_STATIC"]);
    }

    #[test]
    fn test_macos_has_only_driver() {
        let info = info(Os::Macos, Arch::Armv8, Compiler::AppleClang, true);
        assert_eq!(info.libs, ["cassandra"]);
    }

    #[test]
    fn test_cargo_directives() {
        let info = info(Os::Linux, Arch::X86_64, Compiler::Gcc, false);
        let out = info.to_cargo_directives(Some(Path::new("/pkg")));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            format!("cargo:rustc-link-search=native={}", Path::new("/pkg").join("lib").display())
        );
        assert_eq!(lines[1], "cargo:rustc-link-lib=static=cassandra_static");
        assert_eq!(lines[2], "cargo:rustc-link-lib=pthread");
        assert_eq!(lines[3], "cargo:rustc-link-lib=rt");
        assert_eq!(
            lines[4],
            format!("cargo:include={}", Path::new("/pkg").join("include").display())
        );
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_cargo_directives_follow_linkage() {
        let static_info = info(Os::Windows, Arch::X86_64, Compiler::VisualStudio, false);
        assert!(!static_info.shared);
        let out = static_info.to_cargo_directives(None);
        assert!(out.starts_with("cargo:rustc-link-lib=static=cassandra_static\n"));
        assert!(out.ends_with("cargo:defines=CASS_STATIC\n"));
        assert!(!out.contains("rustc-link-search"));
        assert!(!out.contains("cargo:include="));

        let shared_info = info(Os::Windows, Arch::X86_64, Compiler::VisualStudio, true);
        assert!(shared_info.shared);
        let out = shared_info.to_cargo_directives(None);
        assert!(out.starts_with("cargo:rustc-link-lib=cassandra\n"));
        assert!(!out.contains("static="));
        assert!(!out.contains("cargo:defines="));
    }
}
