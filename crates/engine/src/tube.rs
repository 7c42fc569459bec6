//! crates/engine/src/tube.rs
//!
//! Output queued by a session but not yet copied to the caller.

use crate::buffers::Buffers;

/// Growable queue of produced bytes with a read cursor.
#[derive(Debug, Default)]
pub(crate) struct Tube {
    bytes: Vec<u8>,
    pos: usize,
}

impl Tube {
    pub(crate) fn is_empty(&self) -> bool {
        self.pos == self.bytes.len()
    }

    pub(crate) fn pending(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub(crate) fn push(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub(crate) fn push_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Exposes the backing vector so a callback can append to it directly.
    pub(crate) fn tail(&mut self) -> &mut Vec<u8> {
        &mut self.bytes
    }

    /// Moves queued bytes into the output window; returns `true` once empty.
    pub(crate) fn flush(&mut self, buffers: &mut Buffers<'_>) -> bool {
        if !self.is_empty() {
            self.pos += buffers.write(&self.bytes[self.pos..]);
        }
        if self.is_empty() {
            self.bytes.clear();
            self.pos = 0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_drains_across_calls() {
        let mut tube = Tube::default();
        tube.push(b"hello");
        tube.push_byte(b'!');

        let mut first = [0u8; 4];
        let mut buffers = Buffers::new(&[], false, &mut first);
        assert!(!tube.flush(&mut buffers));
        assert_eq!(tube.pending(), 2);

        let mut second = [0u8; 4];
        let mut buffers = Buffers::new(&[], false, &mut second);
        assert!(tube.flush(&mut buffers));
        assert_eq!(buffers.produced(), 2);
        assert_eq!(&second[..2], b"o!");
        assert!(tube.is_empty());
    }
}
