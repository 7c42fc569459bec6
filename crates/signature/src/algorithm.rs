//! crates/signature/src/algorithm.rs
//!
//! Strong checksum algorithm selection.

use checksums::strong::{Blake3, Md4, StrongDigest};

/// Strong checksum strategies supported by the signature formats.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SignatureAlgorithm {
    /// MD4, used by the legacy signature format.
    Md4,
    /// BLAKE3, used by the current signature format.
    #[default]
    Blake3,
}

impl SignatureAlgorithm {
    /// Selects the algorithm for a signature session.
    ///
    /// `compat` requests the legacy MD4 format readable by older peers.
    #[must_use]
    pub const fn for_compat(compat: bool) -> Self {
        if compat { Self::Md4 } else { Self::Blake3 }
    }

    /// Returns the full digest width produced by the algorithm in bytes.
    #[inline]
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Md4 => Md4::DIGEST_LEN,
            Self::Blake3 => Blake3::DIGEST_LEN,
        }
    }

    /// Computes a strong digest truncated to `len` bytes.
    ///
    /// Requests longer than the digest width return the full digest.
    pub fn compute_truncated(self, data: &[u8], len: usize) -> Vec<u8> {
        let len = len.min(self.digest_len());
        match self {
            Self::Md4 => Md4::digest(data)[..len].to_vec(),
            Self::Blake3 => Blake3::digest(data)[..len].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_widths() {
        assert_eq!(SignatureAlgorithm::Md4.digest_len(), 16);
        assert_eq!(SignatureAlgorithm::Blake3.digest_len(), 32);
    }

    #[test]
    fn compat_selects_md4() {
        assert_eq!(SignatureAlgorithm::for_compat(true), SignatureAlgorithm::Md4);
        assert_eq!(SignatureAlgorithm::for_compat(false), SignatureAlgorithm::Blake3);
    }

    #[test]
    fn truncation_is_a_prefix_of_the_full_digest() {
        let data = b"test data";
        for algorithm in [SignatureAlgorithm::Md4, SignatureAlgorithm::Blake3] {
            let full = algorithm.compute_truncated(data, algorithm.digest_len());
            let short = algorithm.compute_truncated(data, 8);
            assert_eq!(short.len(), 8);
            assert_eq!(&full[..8], &short[..]);
        }
    }

    #[test]
    fn oversized_request_returns_full_digest() {
        let digest = SignatureAlgorithm::Md4.compute_truncated(b"x", 64);
        assert_eq!(digest.len(), 16);
    }
}
