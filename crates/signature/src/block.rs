//! crates/signature/src/block.rs
//!
//! Individual signature block representation.

/// Describes a single block within a file signature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignatureBlock {
    index: u64,
    weak: u32,
    strong: Vec<u8>,
}

impl SignatureBlock {
    /// Creates a block descriptor from its components.
    #[must_use]
    pub const fn from_raw_parts(index: u64, weak: u32, strong: Vec<u8>) -> Self {
        Self {
            index,
            weak,
            strong,
        }
    }

    /// Returns the zero-based index of the block within the signature.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> u64 {
        self.index
    }

    /// Returns the packed rolling checksum of the block.
    #[inline]
    #[must_use]
    pub const fn weak(&self) -> u32 {
        self.weak
    }

    /// Returns the truncated strong digest of the block.
    #[inline]
    #[must_use]
    pub fn strong(&self) -> &[u8] {
        &self.strong
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_parts() {
        let block = SignatureBlock::from_raw_parts(42, 0xdead_beef, vec![1, 2, 3, 4]);
        assert_eq!(block.index(), 42);
        assert_eq!(block.weak(), 0xdead_beef);
        assert_eq!(block.strong(), &[1, 2, 3, 4]);
    }
}
