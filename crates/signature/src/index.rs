//! crates/signature/src/index.rs
//!
//! Lookup table over a finished signature.

use rustc_hash::FxHashMap;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::block::SignatureBlock;
use crate::file::FileSignature;
use crate::layout::SignatureLayout;

/// Weak-sum index over the blocks of a [`FileSignature`].
///
/// Built once and never modified, so `&SignatureIndex` can be handed to any
/// number of concurrent searches.
#[derive(Clone, Debug)]
pub struct SignatureIndex {
    layout: SignatureLayout,
    blocks: Vec<SignatureBlock>,
    lookup: FxHashMap<u32, Vec<usize>>,
}

impl SignatureIndex {
    /// Builds the index, consuming the signature.
    #[cfg_attr(feature = "tracing", instrument(skip(signature), fields(blocks = signature.blocks().len())))]
    #[must_use]
    pub fn build(signature: FileSignature) -> Self {
        let layout = signature.layout();
        let blocks = signature.into_blocks();
        let mut lookup: FxHashMap<u32, Vec<usize>> = FxHashMap::default();
        lookup.reserve(blocks.len());
        for (position, block) in blocks.iter().enumerate() {
            lookup.entry(block.weak()).or_default().push(position);
        }

        Self {
            layout,
            blocks,
            lookup,
        }
    }

    /// Returns the layout shared by all indexed blocks.
    #[must_use]
    pub const fn layout(&self) -> SignatureLayout {
        self.layout
    }

    /// Returns the block length in bytes.
    #[must_use]
    pub const fn block_length(&self) -> usize {
        self.layout.block_length().get() as usize
    }

    /// Returns the number of indexed blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Reports whether the signature described an empty basis.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the block at `position`.
    #[must_use]
    pub fn block(&self, position: usize) -> Option<&SignatureBlock> {
        self.blocks.get(position)
    }

    /// Looks up the block whose sums match `window`.
    ///
    /// `weak` must be the packed rolling checksum of `window`. The strong
    /// digest is only computed when the weak sum hits. When several blocks
    /// match, `preferred` wins if it is among them, so a caller extending a
    /// run of copies can keep it contiguous.
    #[must_use]
    pub fn find_match(
        &self,
        weak: u32,
        window: &[u8],
        preferred: Option<u64>,
    ) -> Option<&SignatureBlock> {
        let candidates = self.lookup.get(&weak)?;
        let strong = self
            .layout
            .algorithm()
            .compute_truncated(window, self.layout.strong_len());

        let mut found = None;
        for &position in candidates {
            let block = &self.blocks[position];
            if block.strong() != strong.as_slice() {
                continue;
            }
            if preferred == Some(block.index()) {
                return Some(block);
            }
            found.get_or_insert(block);
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SignatureAlgorithm, SignatureParams, generate_file_signature};
    use checksums::RollingDigest;

    fn index_for(data: &[u8], block_len: u32) -> SignatureIndex {
        let layout = SignatureParams::new(block_len, 8, SignatureAlgorithm::Blake3)
            .resolve()
            .unwrap();
        SignatureIndex::build(generate_file_signature(data, layout).unwrap())
    }

    #[test]
    fn finds_each_block_of_distinct_data() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i * 7 % 251) as u8).collect();
        let index = index_for(&data, 1024);
        assert_eq!(index.len(), 4);

        for (position, window) in data.chunks(1024).enumerate() {
            let weak = RollingDigest::from_bytes(window).value();
            let block = index.find_match(weak, window, None).expect("block present");
            assert_eq!(block.index(), position as u64);
        }
    }

    #[test]
    fn weak_hit_with_different_content_is_rejected() {
        let index = index_for(b"abcd", 4);
        // weak sum forced to hit, strong digest of the window differs
        let weak = RollingDigest::from_bytes(b"abcd").value();
        assert!(index.find_match(weak, b"bbbb", None).is_none());
    }

    #[test]
    fn preferred_block_wins_among_duplicates() {
        let data = vec![9u8; 64];
        let index = index_for(&data, 16);
        let weak = RollingDigest::from_bytes(&data[..16]).value();

        assert_eq!(index.find_match(weak, &data[..16], None).unwrap().index(), 0);
        assert_eq!(index.find_match(weak, &data[..16], Some(2)).unwrap().index(), 2);
    }

    #[test]
    fn empty_signature_matches_nothing() {
        let index = index_for(&[], 16);
        assert!(index.is_empty());
        assert!(index.find_match(0, &[], None).is_none());
    }
}
