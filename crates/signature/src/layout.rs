//! crates/signature/src/layout.rs
//!
//! Requested signature parameters and their resolved form.

use core::num::NonZeroU32;

use crate::algorithm::SignatureAlgorithm;
use crate::generation::SignatureError;

/// Block length used when the caller leaves it unset.
pub const DEFAULT_BLOCK_LEN: u32 = 2048;
/// Strong digest length used when the caller leaves it unset.
pub const DEFAULT_STRONG_LEN: u32 = 8;

const DEFAULT_BLOCK_LENGTH: NonZeroU32 = NonZeroU32::new(DEFAULT_BLOCK_LEN).unwrap();

/// Signature parameters as requested by a caller.
///
/// Zero lengths stand for the defaults. They are replaced exactly once, by
/// [`resolve`](Self::resolve).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SignatureParams {
    block_len: u32,
    strong_len: u32,
    algorithm: SignatureAlgorithm,
}

impl SignatureParams {
    /// Creates a parameter set.
    #[must_use]
    pub const fn new(block_len: u32, strong_len: u32, algorithm: SignatureAlgorithm) -> Self {
        Self {
            block_len,
            strong_len,
            algorithm,
        }
    }

    /// Returns the requested block length (zero means default).
    #[must_use]
    pub const fn block_len(self) -> u32 {
        self.block_len
    }

    /// Returns the requested strong digest length (zero means default).
    #[must_use]
    pub const fn strong_len(self) -> u32 {
        self.strong_len
    }

    /// Returns the strong digest algorithm.
    #[must_use]
    pub const fn algorithm(self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Replaces unset fields with defaults and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidStrongLength`] when the strong
    /// length exceeds the algorithm's digest width.
    pub fn resolve(self) -> Result<SignatureLayout, SignatureError> {
        let block_length = NonZeroU32::new(self.block_len).unwrap_or(DEFAULT_BLOCK_LENGTH);

        let strong_len = if self.strong_len == 0 {
            DEFAULT_STRONG_LEN
        } else {
            self.strong_len
        };
        let digest_len = self.algorithm.digest_len();
        if strong_len as usize > digest_len {
            return Err(SignatureError::InvalidStrongLength {
                algorithm: self.algorithm,
                requested: strong_len,
            });
        }

        Ok(SignatureLayout {
            block_length,
            strong_len: strong_len as usize,
            algorithm: self.algorithm,
        })
    }
}

/// Fully resolved signature layout.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SignatureLayout {
    block_length: NonZeroU32,
    strong_len: usize,
    algorithm: SignatureAlgorithm,
}

impl SignatureLayout {
    /// Creates a layout from values read back from a serialized signature.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::ZeroBlockLength`] or
    /// [`SignatureError::InvalidStrongLength`] when the header is not usable.
    pub fn from_raw_parts(
        block_length: u32,
        strong_len: u32,
        algorithm: SignatureAlgorithm,
    ) -> Result<Self, SignatureError> {
        let block_length = NonZeroU32::new(block_length).ok_or(SignatureError::ZeroBlockLength)?;
        if strong_len == 0 || strong_len as usize > algorithm.digest_len() {
            return Err(SignatureError::InvalidStrongLength {
                algorithm,
                requested: strong_len,
            });
        }
        Ok(Self {
            block_length,
            strong_len: strong_len as usize,
            algorithm,
        })
    }

    /// Returns the block length in bytes.
    #[inline]
    #[must_use]
    pub const fn block_length(self) -> NonZeroU32 {
        self.block_length
    }

    /// Returns the truncated strong digest length in bytes.
    #[inline]
    #[must_use]
    pub const fn strong_len(self) -> usize {
        self.strong_len
    }

    /// Returns the strong digest algorithm.
    #[inline]
    #[must_use]
    pub const fn algorithm(self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Returns the serialized size of one block entry: weak sum plus strong digest.
    #[must_use]
    pub const fn block_entry_len(self) -> usize {
        4 + self.strong_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fields_resolve_to_defaults() {
        let layout = SignatureParams::default().resolve().expect("defaults resolve");
        assert_eq!(layout.block_length().get(), DEFAULT_BLOCK_LEN);
        assert_eq!(layout.strong_len(), DEFAULT_STRONG_LEN as usize);
        assert_eq!(layout.algorithm(), SignatureAlgorithm::Blake3);
    }

    #[test]
    fn resolving_defaults_matches_explicit_values() {
        let implicit = SignatureParams::new(0, 0, SignatureAlgorithm::Md4).resolve().unwrap();
        let explicit = SignatureParams::new(DEFAULT_BLOCK_LEN, DEFAULT_STRONG_LEN, SignatureAlgorithm::Md4)
            .resolve()
            .unwrap();
        assert_eq!(implicit, explicit);
    }

    #[test]
    fn explicit_values_are_kept() {
        let layout = SignatureParams::new(512, 16, SignatureAlgorithm::Md4).resolve().unwrap();
        assert_eq!(layout.block_length().get(), 512);
        assert_eq!(layout.strong_len(), 16);
        assert_eq!(layout.block_entry_len(), 20);
    }

    #[test]
    fn strong_length_beyond_digest_is_rejected() {
        let error = SignatureParams::new(512, 17, SignatureAlgorithm::Md4)
            .resolve()
            .expect_err("md4 is 16 bytes wide");
        assert!(matches!(error, SignatureError::InvalidStrongLength { requested: 17, .. }));
    }

    #[test]
    fn raw_parts_reject_zero_block_length() {
        let error = SignatureLayout::from_raw_parts(0, 8, SignatureAlgorithm::Blake3).unwrap_err();
        assert!(matches!(error, SignatureError::ZeroBlockLength));
    }

    #[test]
    fn raw_parts_reject_zero_strong_length() {
        let error = SignatureLayout::from_raw_parts(2048, 0, SignatureAlgorithm::Blake3).unwrap_err();
        assert!(matches!(error, SignatureError::InvalidStrongLength { requested: 0, .. }));
    }
}
