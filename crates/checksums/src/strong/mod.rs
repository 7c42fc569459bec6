//! Strong digests that confirm weak-checksum matches.
//!
//! Signatures carry a truncated strong digest per block. The legacy format
//! uses MD4; the current format uses BLAKE3. Both are exposed through
//! [`StrongDigest`] so the signature layer can stay generic over the choice.

mod blake3;
mod md4;

pub use self::blake3::Blake3;
pub use self::md4::Md4;

/// Streaming strong digest.
pub trait StrongDigest: Sized {
    /// Fixed digest output.
    type Digest: AsRef<[u8]>;
    /// Full digest width in bytes.
    const DIGEST_LEN: usize;

    /// Creates an empty hasher.
    fn new() -> Self;

    /// Feeds additional bytes into the digest state.
    fn update(&mut self, data: &[u8]);

    /// Finalises the digest.
    fn finalize(self) -> Self::Digest;

    /// Computes the digest of `data` in one shot.
    fn digest(data: &[u8]) -> Self::Digest {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }
}
