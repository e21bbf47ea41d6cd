//! Version-pinned source patches.
//!
//! Each patch is a literal text substitution on one file of the upstream
//! tree, guarded by an exact platform predicate. The anchors are tied to the
//! pinned driver release: if an anchor is missing, or the substitution would
//! leave the file unchanged, the patch fails instead of silently doing
//! nothing.

use std::path::{Path, PathBuf};

use crate::core::{Compiler, Os, PackageOptions, Settings};
use crate::errors::{RecipeError, RecipeResult};
use crate::util::fs::{read_to_string, write_string};

/// When a patch applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchCondition {
    pub os: Os,
    pub compiler: Compiler,
    pub shared: bool,
}

impl PatchCondition {
    pub fn matches(&self, settings: &Settings, options: &PackageOptions) -> bool {
        settings.os == self.os && settings.compiler == self.compiler && options.shared == self.shared
    }
}

/// A literal substitution on one upstream file.
#[derive(Debug, PartialEq, Eq)]
pub struct SourcePatch {
    pub name: &'static str,
    /// Path components relative to the source root
    pub file: &'static [&'static str],
    pub anchor: &'static str,
    pub replacement: &'static str,
    pub condition: PatchCondition,
}

const CPP_DRIVER_CMAKE: &[&str] = &["cmake", "modules", "CppDriver.cmake"];

const MINGW_SHARED: PatchCondition = PatchCondition {
    os: Os::Windows,
    compiler: Compiler::Gcc,
    shared: true,
};

/// MinGW shared builds must not run the MSVC-only install rule.
pub static MINGW_INSTALL_GUARD: SourcePatch = SourcePatch {
    name: "mingw-install-guard",
    file: CPP_DRIVER_CMAKE,
    anchor: "if(WIN32)\n      install",
    replacement: "if(WIN32 AND NOT MINGW)\n      install",
    condition: MINGW_SHARED,
};

/// MinGW shared builds link the Windows system libraries explicitly.
pub static MINGW_SYSTEM_LIBS: SourcePatch = SourcePatch {
    name: "mingw-system-libs",
    file: CPP_DRIVER_CMAKE,
    anchor: "elseif(\"${CMAKE_CXX_COMPILER_ID}\" STREQUAL \"GNU\")",
    replacement: "elseif(\"${CMAKE_CXX_COMPILER_ID}\" STREQUAL \"GNU\")\n\
                  set(CASS_LIBS ${CASS_LIBS} iphlpapi psapi wsock32 crypt32 ws2_32 userenv)",
    condition: MINGW_SHARED,
};

/// Every patch the recipe knows, in application order.
pub static ALL_PATCHES: [&SourcePatch; 2] = [&MINGW_INSTALL_GUARD, &MINGW_SYSTEM_LIBS];

/// Patches whose condition matches this configuration.
pub fn patches_for(settings: &Settings, options: &PackageOptions) -> Vec<&'static SourcePatch> {
    ALL_PATCHES
        .iter()
        .copied()
        .filter(|p| p.condition.matches(settings, options))
        .collect()
}

impl SourcePatch {
    pub fn file_path(&self, source_dir: &Path) -> PathBuf {
        self.file.iter().fold(source_dir.to_path_buf(), |p, c| p.join(c))
    }

    /// Substitute every occurrence of the anchor.
    ///
    /// Returns an error message when the anchor is absent or the result is
    /// identical to the input.
    pub fn apply_to_str(&self, text: &str) -> Result<String, String> {
        let occurrences = text.matches(self.anchor).count();
        if occurrences == 0 {
            return Err(format!(
                "anchor not found (upstream source changed?): {:?}",
                self.anchor
            ));
        }

        let patched = text.replace(self.anchor, self.replacement);
        if patched == text {
            return Err("substitution left the file unchanged".to_string());
        }

        tracing::debug!("patch `{}` replaced {} occurrence(s)", self.name, occurrences);
        Ok(patched)
    }

    /// Patch the file in place.
    pub fn apply(&self, source_dir: &Path) -> RecipeResult<()> {
        let file = self.file_path(source_dir);
        let error = |message: String| RecipeError::Patch {
            patch: self.name,
            file: file.clone(),
            message,
        };

        let text = read_to_string(&file).map_err(|e| error(format!("{:#}", e)))?;
        let patched = self.apply_to_str(&text).map_err(error)?;
        write_string(&file, &patched).map_err(|e| error(format!("{:#}", e)))?;

        tracing::info!("Patched {} ({})", file.display(), self.name);
        Ok(())
    }
}

/// Apply patches in order, stopping at the first failure.
pub fn apply_patches(patches: &[&SourcePatch], source_dir: &Path) -> RecipeResult<()> {
    if patches.is_empty() {
        tracing::debug!("no source patches apply");
    }
    for patch in patches {
        patch.apply(source_dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Arch, BuildType, OptionRequest};
    use tempfile::TempDir;

    const UPSTREAM_SNIPPET: &str = "\
if(CASS_BUILD_SHARED)
  if(WIN32)
      install(FILES $<TARGET_PDB_FILE:cassandra>
        DESTINATION \"${INSTALL_DLL_EXE_DIR}\"
        OPTIONAL)
  endif()
endif()

if(\"${CMAKE_CXX_COMPILER_ID}\" STREQUAL \"MSVC\")
  set(CASS_LIBS ${CASS_LIBS} iphlpapi psapi wsock32 crypt32 ws2_32 userenv)
elseif(\"${CMAKE_CXX_COMPILER_ID}\" STREQUAL \"GNU\")
  set(CASS_LIBS ${CASS_LIBS} rt)
endif()
";

    fn resolve(os: Os, compiler: Compiler, shared: bool) -> (Settings, PackageOptions) {
        let settings = Settings::new(os, Arch::X86_64, compiler, BuildType::Release);
        let options = PackageOptions::resolve(OptionRequest { shared, fpic: true }, os);
        (settings, options)
    }

    #[test]
    fn test_patches_only_for_mingw_shared() {
        for os in [Os::Windows, Os::Linux, Os::Macos, Os::FreeBSD] {
            for compiler in [
                Compiler::Gcc,
                Compiler::Clang,
                Compiler::AppleClang,
                Compiler::VisualStudio,
            ] {
                for shared in [true, false] {
                    let (settings, options) = resolve(os, compiler, shared);
                    let expected = os == Os::Windows && compiler == Compiler::Gcc && shared;
                    assert_eq!(
                        !patches_for(&settings, &options).is_empty(),
                        expected,
                        "{} {} shared={}",
                        os,
                        compiler,
                        shared
                    );
                }
            }
        }
    }

    #[test]
    fn test_install_guard() {
        let patched = MINGW_INSTALL_GUARD.apply_to_str(UPSTREAM_SNIPPET).unwrap();
        assert!(patched.contains("if(WIN32 AND NOT MINGW)\n      install"));
        assert!(!patched.contains("if(WIN32)\n"));
    }

    #[test]
    fn test_system_libs() {
        let patched = MINGW_SYSTEM_LIBS.apply_to_str(UPSTREAM_SNIPPET).unwrap();
        assert!(patched.contains(
            "STREQUAL \"GNU\")\nset(CASS_LIBS ${CASS_LIBS} iphlpapi psapi wsock32 crypt32 ws2_32 userenv)\n"
        ));
    }

    #[test]
    fn test_missing_anchor_is_error() {
        let err = MINGW_INSTALL_GUARD
            .apply_to_str("project(cassandra)\n")
            .unwrap_err();
        assert!(err.contains("anchor not found"));
    }

    #[test]
    fn test_apply_patches_on_disk() {
        let tmp = TempDir::new().unwrap();
        let file = MINGW_INSTALL_GUARD.file_path(tmp.path());
        write_string(&file, UPSTREAM_SNIPPET).unwrap();

        let (settings, options) = resolve(Os::Windows, Compiler::Gcc, true);
        apply_patches(&patches_for(&settings, &options), tmp.path()).unwrap();

        let text = std::fs::read_to_string(&file).unwrap();
        assert!(text.contains("if(WIN32 AND NOT MINGW)"));
        assert!(text.contains("crypt32 ws2_32 userenv)\n  set(CASS_LIBS ${CASS_LIBS} rt)"));
    }

    #[test]
    fn test_reapplying_install_guard_fails() {
        let tmp = TempDir::new().unwrap();
        let file = MINGW_INSTALL_GUARD.file_path(tmp.path());
        write_string(&file, UPSTREAM_SNIPPET).unwrap();

        MINGW_INSTALL_GUARD.apply(tmp.path()).unwrap();
        let err = MINGW_INSTALL_GUARD.apply(tmp.path()).unwrap_err();
        assert!(matches!(err, RecipeError::Patch { patch: "mingw-install-guard", .. }));
    }

    #[test]
    fn test_missing_file_is_patch_error() {
        let tmp = TempDir::new().unwrap();
        let err = MINGW_SYSTEM_LIBS.apply(tmp.path()).unwrap_err();
        assert_eq!(err.stage(), "patch");
    }

    #[test]
    fn test_other_configurations_leave_tree_untouched() {
        let tmp = TempDir::new().unwrap();
        let file = MINGW_INSTALL_GUARD.file_path(tmp.path());
        write_string(&file, UPSTREAM_SNIPPET).unwrap();

        let (settings, options) = resolve(Os::Windows, Compiler::VisualStudio, true);
        apply_patches(&patches_for(&settings, &options), tmp.path()).unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), UPSTREAM_SNIPPET);
    }
}
