//! SHA-256 helpers for archive checksums and package ids.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a byte slice.
pub fn sha256_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Incremental digest over labelled key/value pairs.
///
/// Each entry is written as `key=value\0` so that adjacent values can never
/// run together into the same byte stream.
#[derive(Default)]
pub struct KeyedDigest {
    hasher: Sha256,
}

impl KeyedDigest {
    pub fn new() -> Self {
        KeyedDigest {
            hasher: Sha256::new(),
        }
    }

    pub fn entry(&mut self, key: &str, value: impl std::fmt::Display) -> &mut Self {
        self.hasher.update(key.as_bytes());
        self.hasher.update(b"=");
        self.hasher.update(value.to_string().as_bytes());
        self.hasher.update(b"\0");
        self
    }

    /// Add an entry only when a value is present.
    ///
    /// An absent value contributes nothing, which is different from any
    /// present value.
    pub fn entry_opt(&mut self, key: &str, value: Option<impl std::fmt::Display>) -> &mut Self {
        if let Some(value) = value {
            self.entry(key, value);
        }
        self
    }

    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }

    /// First 16 hex characters of the digest.
    pub fn finish_short(self) -> String {
        self.finish()[..16].to_string()
    }
}
