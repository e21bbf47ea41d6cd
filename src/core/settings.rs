//! Build settings supplied by the outer tooling.
//!
//! Settings describe the target platform and toolchain. Unlike package
//! options they are not declared by the recipe; the recipe only reads them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a setting value is not recognised.
#[derive(Debug, Clone, Error)]
#[error("invalid {setting} '{value}', valid values: {}", .expected.join(", "))]
pub struct ParseSettingError {
    pub setting: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}

/// Target operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Os {
    Windows,
    Linux,
    Macos,
    FreeBSD,
}

impl Os {
    const NAMES: &'static [&'static str] = &["Windows", "Linux", "Macos", "FreeBSD"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Windows => "Windows",
            Os::Linux => "Linux",
            Os::Macos => "Macos",
            Os::FreeBSD => "FreeBSD",
        }
    }

    /// The operating system this binary was compiled for.
    pub fn host() -> Self {
        match std::env::consts::OS {
            "windows" => Os::Windows,
            "macos" => Os::Macos,
            "freebsd" => Os::FreeBSD,
            _ => Os::Linux,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Os {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" => Ok(Os::Windows),
            "linux" => Ok(Os::Linux),
            "macos" | "darwin" => Ok(Os::Macos),
            "freebsd" => Ok(Os::FreeBSD),
            _ => Err(ParseSettingError {
                setting: "os",
                value: s.to_string(),
                expected: Os::NAMES,
            }),
        }
    }
}

/// Target architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
    X86,
    X86_64,
    Armv7,
    Armv8,
}

impl Arch {
    const NAMES: &'static [&'static str] = &["x86", "x86_64", "armv7", "armv8"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X86_64 => "x86_64",
            Arch::Armv7 => "armv7",
            Arch::Armv8 => "armv8",
        }
    }

    pub fn host() -> Self {
        match std::env::consts::ARCH {
            "x86" => Arch::X86,
            "arm" => Arch::Armv7,
            "aarch64" => Arch::Armv8,
            _ => Arch::X86_64,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Arch {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x86" | "i686" => Ok(Arch::X86),
            "x86_64" | "amd64" => Ok(Arch::X86_64),
            "armv7" | "arm" => Ok(Arch::Armv7),
            "armv8" | "aarch64" | "arm64" => Ok(Arch::Armv8),
            _ => Err(ParseSettingError {
                setting: "arch",
                value: s.to_string(),
                expected: Arch::NAMES,
            }),
        }
    }
}

/// Compiler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Compiler {
    Gcc,
    Clang,
    AppleClang,
    #[serde(rename = "Visual Studio")]
    VisualStudio,
}

impl Compiler {
    const NAMES: &'static [&'static str] = &["gcc", "clang", "apple-clang", "Visual Studio"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Compiler::Gcc => "gcc",
            Compiler::Clang => "clang",
            Compiler::AppleClang => "apple-clang",
            Compiler::VisualStudio => "Visual Studio",
        }
    }

    /// The usual compiler for an operating system.
    pub fn default_for(os: Os) -> Self {
        match os {
            Os::Windows => Compiler::VisualStudio,
            Os::Macos => Compiler::AppleClang,
            Os::FreeBSD => Compiler::Clang,
            Os::Linux => Compiler::Gcc,
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Compiler {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gcc" | "mingw" => Ok(Compiler::Gcc),
            "clang" => Ok(Compiler::Clang),
            "apple-clang" => Ok(Compiler::AppleClang),
            "visual studio" | "visual-studio" | "msvc" => Ok(Compiler::VisualStudio),
            _ => Err(ParseSettingError {
                setting: "compiler",
                value: s.to_string(),
                expected: Compiler::NAMES,
            }),
        }
    }
}

/// CMake build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    const NAMES: &'static [&'static str] = &["Debug", "Release", "RelWithDebInfo", "MinSizeRel"];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            "minsizerel" => Ok(BuildType::MinSizeRel),
            _ => Err(ParseSettingError {
                setting: "build_type",
                value: s.to_string(),
                expected: BuildType::NAMES,
            }),
        }
    }
}

/// The full set of settings for one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settings {
    pub os: Os,
    pub arch: Arch,
    pub compiler: Compiler,
    pub build_type: BuildType,
}

impl Settings {
    pub fn new(os: Os, arch: Arch, compiler: Compiler, build_type: BuildType) -> Self {
        Settings {
            os,
            arch,
            compiler,
            build_type,
        }
    }

    /// Settings describing the host machine.
    pub fn host() -> Self {
        let os = Os::host();
        Settings {
            os,
            arch: Arch::host(),
            compiler: Compiler::default_for(os),
            build_type: BuildType::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("windows".parse::<Os>().unwrap(), Os::Windows);
        assert_eq!("Linux".parse::<Os>().unwrap(), Os::Linux);
        assert_eq!("X86".parse::<Arch>().unwrap(), Arch::X86);
        assert_eq!("Visual Studio".parse::<Compiler>().unwrap(), Compiler::VisualStudio);
        assert_eq!("relwithdebinfo".parse::<BuildType>().unwrap(), BuildType::RelWithDebInfo);
    }

    #[test]
    fn test_parse_error_lists_valid_values() {
        let err = "solaris".parse::<Os>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("invalid os 'solaris'"));
        assert!(msg.contains("Windows, Linux, Macos, FreeBSD"));
    }

    #[test]
    fn test_display_matches_as_str() {
        for compiler in [
            Compiler::Gcc,
            Compiler::Clang,
            Compiler::AppleClang,
            Compiler::VisualStudio,
        ] {
            assert_eq!(compiler.to_string().parse::<Compiler>().unwrap(), compiler);
        }
    }

    #[test]
    fn test_serde_names() {
        let settings = Settings::new(Os::Linux, Arch::X86_64, Compiler::Clang, BuildType::Debug);
        let json = serde_json::to_value(settings).unwrap();
        assert_eq!(json["os"], "Linux");
        assert_eq!(json["arch"], "x86_64");
        assert_eq!(json["compiler"], "clang");
        assert_eq!(json["build_type"], "Debug");
    }

    #[test]
    fn test_default_compiler() {
        assert_eq!(Compiler::default_for(Os::Windows), Compiler::VisualStudio);
        assert_eq!(Compiler::default_for(Os::Linux), Compiler::Gcc);
    }
}
