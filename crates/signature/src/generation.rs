//! crates/signature/src/generation.rs
//!
//! File signature generation from input data.

use std::io::{self, Read};

use checksums::RollingDigest;
use thiserror::Error;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::algorithm::SignatureAlgorithm;
use crate::file::FileSignature;
use crate::layout::SignatureLayout;

/// Errors returned while building or parsing signatures.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// Underlying I/O failure raised while reading file contents.
    #[error("failed to read input while generating signature: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),
    /// Requested strong digest length is zero or exceeds what the algorithm provides.
    #[error("strong checksum length {requested} is not valid for {algorithm:?}")]
    InvalidStrongLength {
        /// Strong checksum algorithm in use.
        algorithm: SignatureAlgorithm,
        /// Number of bytes requested.
        requested: u32,
    },
    /// A serialized signature declared a block length of zero.
    #[error("signature block length must be non-zero")]
    ZeroBlockLength,
}

/// Computes the weak and strong sums of one block.
pub fn block_sums(layout: SignatureLayout, block: &[u8]) -> (u32, Vec<u8>) {
    let weak = RollingDigest::from_bytes(block).value();
    let strong = layout.algorithm().compute_truncated(block, layout.strong_len());
    (weak, strong)
}

/// Generates the signature of everything `reader` yields.
///
/// The final block may be shorter than the layout's block length.
///
/// # Errors
///
/// Propagates any I/O error surfaced by the reader.
#[cfg_attr(feature = "tracing", instrument(skip(reader), name = "generate_signature"))]
pub fn generate_file_signature<R: Read>(
    mut reader: R,
    layout: SignatureLayout,
) -> Result<FileSignature, SignatureError> {
    let block_len = layout.block_length().get() as usize;
    let mut signature = FileSignature::new(layout);
    let mut buffer = vec![0u8; block_len];

    loop {
        let mut filled = 0;
        while filled < block_len {
            match reader.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
        if filled == 0 {
            break;
        }

        let (weak, strong) = block_sums(layout, &buffer[..filled]);
        signature.push(weak, strong);

        if filled < block_len {
            break;
        }
    }

    Ok(signature)
}
