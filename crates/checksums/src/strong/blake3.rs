use super::StrongDigest;

/// Streaming BLAKE3 hasher used by the current signature format.
#[derive(Clone, Debug, Default)]
pub struct Blake3 {
    inner: blake3::Hasher,
}

impl StrongDigest for Blake3 {
    type Digest = [u8; 32];
    const DIGEST_LEN: usize = 32;

    fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn finalize(self) -> Self::Digest {
        *self.inner.finalize().as_bytes()
    }
}
