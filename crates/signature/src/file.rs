//! crates/signature/src/file.rs
//!
//! Aggregated file signature container.

use crate::block::SignatureBlock;
use crate::layout::SignatureLayout;

/// Ordered block list for one basis file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileSignature {
    layout: SignatureLayout,
    blocks: Vec<SignatureBlock>,
}

impl FileSignature {
    /// Creates an empty signature that blocks can be appended to.
    #[must_use]
    pub const fn new(layout: SignatureLayout) -> Self {
        Self {
            layout,
            blocks: Vec::new(),
        }
    }

    /// Appends the next block, assigning it the following index.
    pub fn push(&mut self, weak: u32, strong: Vec<u8>) {
        let index = self.blocks.len() as u64;
        self.blocks.push(SignatureBlock::from_raw_parts(index, weak, strong));
    }

    /// Returns the layout the blocks were computed with.
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> SignatureLayout {
        self.layout
    }

    /// Returns the list of block entries in basis order.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> &[SignatureBlock] {
        &self.blocks
    }

    pub(crate) fn into_blocks(self) -> Vec<SignatureBlock> {
        self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SignatureAlgorithm, SignatureParams};

    #[test]
    fn push_assigns_sequential_indices() {
        let layout = SignatureParams::new(16, 4, SignatureAlgorithm::Md4).resolve().unwrap();
        let mut signature = FileSignature::new(layout);
        signature.push(1, vec![0; 4]);
        signature.push(2, vec![1; 4]);

        let indices: Vec<u64> = signature.blocks().iter().map(SignatureBlock::index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(signature.layout(), layout);
    }
}
