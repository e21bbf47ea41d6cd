//! Package options declared by the recipe.

use serde::{Deserialize, Serialize};

use crate::core::settings::Os;

/// Options as requested by the user, before platform filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRequest {
    pub shared: bool,
    #[serde(rename = "fPIC")]
    pub fpic: bool,
}

impl Default for OptionRequest {
    fn default() -> Self {
        OptionRequest {
            shared: false,
            fpic: true,
        }
    }
}

/// Options resolved for a specific platform.
///
/// `fpic` is `None` where position-independent code has no meaning, so the
/// option does not exist at all for that build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageOptions {
    pub shared: bool,
    #[serde(rename = "fPIC", skip_serializing_if = "Option::is_none")]
    pub fpic: Option<bool>,
}

impl PackageOptions {
    /// Drop options that do not apply to `os`.
    pub fn resolve(request: OptionRequest, os: Os) -> Self {
        let fpic = if os == Os::Windows {
            None
        } else {
            Some(request.fpic)
        };

        PackageOptions {
            shared: request.shared,
            fpic,
        }
    }

    /// Whether the option named `name` exists in this option set.
    pub fn has_option(&self, name: &str) -> bool {
        match name {
            "shared" => true,
            "fPIC" => self.fpic.is_some(),
            _ => false,
        }
    }

    /// Library linkage as a word, for logs.
    pub fn linkage(&self) -> &'static str {
        if self.shared {
            "shared"
        } else {
            "static"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_OS: [Os; 4] = [Os::Windows, Os::Linux, Os::Macos, Os::FreeBSD];

    #[test]
    fn test_defaults() {
        let req = OptionRequest::default();
        assert!(!req.shared);
        assert!(req.fpic);
    }

    #[test]
    fn test_fpic_removed_only_on_windows() {
        for os in ALL_OS {
            for shared in [true, false] {
                let opts = PackageOptions::resolve(OptionRequest { shared, fpic: true }, os);
                assert_eq!(opts.has_option("fPIC"), os != Os::Windows, "os = {}", os);
                assert_eq!(opts.shared, shared);
            }
        }
    }

    #[test]
    fn test_fpic_value_is_kept() {
        let opts = PackageOptions::resolve(
            OptionRequest {
                shared: false,
                fpic: false,
            },
            Os::Linux,
        );
        assert_eq!(opts.fpic, Some(false));
    }

    #[test]
    fn test_fpic_not_serialized_on_windows() {
        let opts = PackageOptions::resolve(OptionRequest::default(), Os::Windows);
        let json = serde_json::to_string(&opts).unwrap();
        assert_eq!(json, r#"{"shared":false}"#);

        let opts = PackageOptions::resolve(OptionRequest::default(), Os::Linux);
        let json = serde_json::to_string(&opts).unwrap();
        assert_eq!(json, r#"{"shared":false,"fPIC":true}"#);
    }
}
