//! Pinned upstream requirements and their linkage.

use std::fmt;

use serde::Serialize;

use crate::core::options::PackageOptions;

/// A pinned reference to another package, `name/version@user/channel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub name: &'static str,
    pub version: &'static str,
    pub user: &'static str,
    pub channel: &'static str,

    /// Linkage forced onto the requirement, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared: Option<bool>,
}

impl Requirement {
    const fn pinned(
        name: &'static str,
        version: &'static str,
        user: &'static str,
        channel: &'static str,
    ) -> Self {
        Requirement {
            name,
            version,
            user,
            channel,
            shared: None,
        }
    }

    /// Full reference string.
    pub fn reference(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}@{}/{}",
            self.name, self.version, self.user, self.channel
        )
    }
}

pub const LIBUV: Requirement = Requirement::pinned("libuv", "1.27.0", "bincrafters", "stable");
pub const OPENSSL: Requirement = Requirement::pinned("OpenSSL", "1.0.2s", "conan", "stable");

/// The recipe's requirements after linkage propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirements {
    pub libuv: Requirement,
    pub openssl: Requirement,
}

impl Requirements {
    /// Resolve requirements for the given options.
    ///
    /// libuv always follows this package's linkage: mixing a static driver
    /// with a shared libuv (or the reverse) breaks the final link.
    pub fn resolve(options: &PackageOptions) -> Self {
        Requirements {
            libuv: Requirement {
                shared: Some(options.shared),
                ..LIBUV
            },
            openssl: OPENSSL,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
        [&self.libuv, &self.openssl].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::OptionRequest;
    use crate::core::settings::Os;

    #[test]
    fn test_reference_format() {
        assert_eq!(LIBUV.reference(), "libuv/1.27.0@bincrafters/stable");
        assert_eq!(OPENSSL.reference(), "OpenSSL/1.0.2s@conan/stable");
    }

    #[test]
    fn test_libuv_linkage_follows_package() {
        for os in [Os::Windows, Os::Linux, Os::Macos, Os::FreeBSD] {
            for shared in [true, false] {
                for fpic in [true, false] {
                    let opts = PackageOptions::resolve(OptionRequest { shared, fpic }, os);
                    let reqs = Requirements::resolve(&opts);
                    assert_eq!(reqs.libuv.shared, Some(shared));
                }
            }
        }
    }

    #[test]
    fn test_openssl_linkage_untouched() {
        let opts = PackageOptions::resolve(OptionRequest { shared: true, fpic: true }, Os::Linux);
        let reqs = Requirements::resolve(&opts);
        assert_eq!(reqs.openssl.shared, None);
        assert_eq!(reqs.iter().count(), 2);
    }
}
