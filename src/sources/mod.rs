//! Package sources.
//!
//! The recipe has exactly one source: the upstream release tarball, either
//! downloaded or supplied as a local file.

pub mod tarball;

pub use tarball::{download, extract_tarball, verify_sha256, versioned_url};
