use super::checksum::RollingChecksum;

/// Snapshot of a [`RollingChecksum`] state.
///
/// Signatures store the packed 32-bit value on the wire; the window length is
/// kept alongside so a digest read back from a signature can be compared with
/// one computed over a live window.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct RollingDigest {
    s1: u16,
    s2: u16,
    len: usize,
}

impl RollingDigest {
    /// Digest of the empty window.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Creates a digest from its components.
    #[must_use]
    pub const fn new(s1: u16, s2: u16, len: usize) -> Self {
        Self { s1, s2, len }
    }

    /// Computes the digest of `data` in one pass.
    #[must_use]
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut checksum = RollingChecksum::new();
        checksum.update(data);
        checksum.digest()
    }

    /// Unpacks a `(s2 << 16) | s1` value, as stored in a signature block.
    #[must_use]
    pub const fn from_value(value: u32, len: usize) -> Self {
        Self::new(value as u16, (value >> 16) as u16, len)
    }

    /// Returns the byte-sum component.
    #[inline]
    #[must_use]
    pub const fn sum1(self) -> u16 {
        self.s1
    }

    /// Returns the prefix-sum component.
    #[inline]
    #[must_use]
    pub const fn sum2(self) -> u16 {
        self.s2
    }

    /// Returns the number of bytes that contributed to the digest.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.len
    }

    /// Reports whether the digest covers no bytes.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Returns the packed `(s2 << 16) | s1` representation.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        ((self.s2 as u32) << 16) | self.s1 as u32
    }
}
