//! # Digest Algorithm Tags
//!
//! Manifests may attach an `Algorithm:`/`Hash:` pair to a declared source.
//! Validation only checks that the pair is structurally well formed: the
//! digest must be hexadecimal and, for a recognized algorithm, have the
//! length that algorithm produces. Digests are never recomputed here.

use serde::{Deserialize, Serialize};

/// A digest algorithm whose output length is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256, 32-byte digest.
    Sha256,
    /// SHA-384, 48-byte digest.
    Sha384,
    /// SHA-512, 64-byte digest.
    Sha512,
}

impl DigestAlgorithm {
    /// Recognize an algorithm name as written in a manifest.
    ///
    /// Matching is case-insensitive and the hyphen is optional
    /// (`SHA-256`, `sha256`). Unknown names return `None`; they are
    /// legal in a manifest but only get the hex check.
    pub fn parse(name: &str) -> Option<Self> {
        let compact: String = name
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match compact.as_str() {
            "sha256" => Some(Self::Sha256),
            "sha384" => Some(Self::Sha384),
            "sha512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Expected length of the hex-encoded digest.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Sha384 => 96,
            Self::Sha512 => 128,
        }
    }

    /// Canonical algorithm name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `s` is a non-empty string of hex digits (either case).
pub fn is_hex_digest(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!(DigestAlgorithm::parse("SHA-256"), Some(DigestAlgorithm::Sha256));
        assert_eq!(DigestAlgorithm::parse("sha256"), Some(DigestAlgorithm::Sha256));
        assert_eq!(DigestAlgorithm::parse("Sha-384"), Some(DigestAlgorithm::Sha384));
        assert_eq!(DigestAlgorithm::parse("SHA_512"), Some(DigestAlgorithm::Sha512));
    }

    #[test]
    fn parse_unknown_is_none() {
        assert_eq!(DigestAlgorithm::parse("SHA-abc"), None);
        assert_eq!(DigestAlgorithm::parse("MD5"), None);
        assert_eq!(DigestAlgorithm::parse(""), None);
    }

    #[test]
    fn hex_lengths() {
        assert_eq!(DigestAlgorithm::Sha256.hex_len(), 64);
        assert_eq!(DigestAlgorithm::Sha384.hex_len(), 96);
        assert_eq!(DigestAlgorithm::Sha512.hex_len(), 128);
    }

    #[test]
    fn hex_digest_check() {
        assert!(is_hex_digest(
            "09e5a788acb180162c51679ae4c998039fa6644505db2415e35107d1ee213943"
        ));
        assert!(is_hex_digest("ABCDEF01"));
        assert!(!is_hex_digest(""));
        assert!(!is_hex_digest("xyz"));
    }

    #[test]
    fn display_is_canonical_name() {
        assert_eq!(DigestAlgorithm::Sha256.to_string(), "SHA-256");
    }
}
