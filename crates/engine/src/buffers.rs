//! crates/engine/src/buffers.rs
//!
//! Per-iteration buffer exchange between a caller and a session.

/// Input and output windows handed to one [`iterate`](crate::Engine::iterate) call.
///
/// The session consumes from the front of `input` and writes to the front
/// of `output`; afterwards the caller reads [`consumed`](Self::consumed) and
/// [`produced`](Self::produced) to advance its own staging buffers.
#[derive(Debug)]
pub struct Buffers<'a> {
    input: &'a [u8],
    eof_in: bool,
    output: &'a mut [u8],
    consumed: usize,
    produced: usize,
}

impl<'a> Buffers<'a> {
    /// Wraps the caller's staging windows.
    ///
    /// `eof_in` declares that `input` holds the last bytes the caller will
    /// ever supply.
    #[must_use]
    pub fn new(input: &'a [u8], eof_in: bool, output: &'a mut [u8]) -> Self {
        Self {
            input,
            eof_in,
            output,
            consumed: 0,
            produced: 0,
        }
    }

    /// Returns the input bytes not consumed yet.
    #[must_use]
    pub fn available(&self) -> &'a [u8] {
        &self.input[self.consumed..]
    }

    /// Marks `len` input bytes as consumed.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds the available input.
    pub fn consume(&mut self, len: usize) {
        assert!(len <= self.input.len() - self.consumed, "consumed past the end of input");
        self.consumed += len;
    }

    /// Reports whether the caller has no further input after this window.
    #[must_use]
    pub const fn eof_in(&self) -> bool {
        self.eof_in
    }

    /// Reports whether all input, including future input, has been consumed.
    #[must_use]
    pub const fn input_exhausted(&self) -> bool {
        self.eof_in && self.consumed == self.input.len()
    }

    /// Returns how many more bytes fit in the output window.
    #[must_use]
    pub const fn output_room(&self) -> usize {
        self.output.len() - self.produced
    }

    /// Copies as much of `bytes` as fits and returns the count written.
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        let len = bytes.len().min(self.output_room());
        self.output[self.produced..self.produced + len].copy_from_slice(&bytes[..len]);
        self.produced += len;
        len
    }

    /// Returns the number of input bytes consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    /// Returns the number of output bytes produced so far.
    #[must_use]
    pub const fn produced(&self) -> usize {
        self.produced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_stops_at_output_capacity() {
        let mut out = [0u8; 4];
        let mut buffers = Buffers::new(&[], false, &mut out);
        assert_eq!(buffers.write(b"abc"), 3);
        assert_eq!(buffers.write(b"def"), 1);
        assert_eq!(buffers.output_room(), 0);
        assert_eq!(buffers.produced(), 4);
        assert_eq!(&out, b"abcd");
    }

    #[test]
    fn consume_advances_available_input() {
        let mut out = [0u8; 0];
        let mut buffers = Buffers::new(b"hello", true, &mut out);
        buffers.consume(2);
        assert_eq!(buffers.available(), b"llo");
        assert!(!buffers.input_exhausted());
        buffers.consume(3);
        assert!(buffers.input_exhausted());
        assert_eq!(buffers.consumed(), 5);
    }

    #[test]
    #[should_panic(expected = "consumed past the end of input")]
    fn over_consumption_panics() {
        let mut out = [0u8; 0];
        let mut buffers = Buffers::new(b"ab", false, &mut out);
        buffers.consume(3);
    }
}
