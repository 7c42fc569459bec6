#![deny(unsafe_code)]

//! Test fixtures shared by the workspace crates.
//!
//! - deterministic basis and mutation buffers, so signatures and deltas are
//!   reproducible across runs;
//! - reader doubles that trickle, get interrupted or fail;
//! - [`assert_same_bytes`], which dumps mismatching output to a temporary
//!   file for inspection.

use std::io::{self, Read};
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Size of the standard basis buffer.
pub const BASIS_LEN: usize = 64 * 1024;
/// Seed of the standard basis buffer.
pub const BASIS_SEED: u64 = 0x7264_656c_7461;
/// Offset at which [`mutation`] inserts [`INSERTION`].
pub const MUTATION_OFFSET: usize = 30_000;
/// Bytes inserted by [`mutation`].
pub const INSERTION: &[u8; 10] = b"<mutation>";

/// Returns `len` pseudo-random bytes determined by `seed`.
#[must_use]
pub fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill_bytes(&mut data);
    data
}

/// Returns the standard 64 KiB basis buffer.
#[must_use]
pub fn random_data() -> Vec<u8> {
    random_bytes(BASIS_LEN, BASIS_SEED)
}

/// Returns `basis` with [`INSERTION`] spliced in at [`MUTATION_OFFSET`].
///
/// Bases shorter than the offset get the insertion appended.
#[must_use]
pub fn mutation(basis: &[u8]) -> Vec<u8> {
    let at = MUTATION_OFFSET.min(basis.len());
    let mut data = Vec::with_capacity(basis.len() + INSERTION.len());
    data.extend_from_slice(&basis[..at]);
    data.extend_from_slice(INSERTION);
    data.extend_from_slice(&basis[at..]);
    data
}

/// Reader that yields `data` and then fails every call with `kind`.
#[derive(Debug)]
pub struct FailingReader {
    data: Vec<u8>,
    pos: usize,
    kind: io::ErrorKind,
}

impl FailingReader {
    /// Creates a reader that fails once `data` is exhausted.
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>, kind: io::ErrorKind) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            kind,
        }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.data.len() {
            return Err(io::Error::new(self.kind, "injected read failure"));
        }
        let len = buf.len().min(self.data.len() - self.pos);
        buf[..len].copy_from_slice(&self.data[self.pos..self.pos + len]);
        self.pos += len;
        Ok(len)
    }
}

/// Reader that hands out at most `max` bytes per call.
///
/// With interruptions enabled every other call fails with
/// [`io::ErrorKind::Interrupted`] before any data moves.
#[derive(Debug)]
pub struct TrickleReader<R> {
    inner: R,
    max: usize,
    interrupt: bool,
    interrupted_last: bool,
}

impl<R: Read> TrickleReader<R> {
    /// Wraps `inner`, limiting each read to `max` bytes (at least one).
    pub fn new(inner: R, max: usize) -> Self {
        Self {
            inner,
            max: max.max(1),
            interrupt: false,
            interrupted_last: false,
        }
    }

    /// Interleaves `Interrupted` errors between successful reads.
    #[must_use]
    pub fn with_interruptions(mut self) -> Self {
        self.interrupt = true;
        self
    }
}

impl<R: Read> Read for TrickleReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.interrupt && !self.interrupted_last {
            self.interrupted_last = true;
            return Err(io::ErrorKind::Interrupted.into());
        }
        self.interrupted_last = false;
        let len = buf.len().min(self.max);
        self.inner.read(&mut buf[..len])
    }
}

/// Writes `bytes` to a persisted temporary file and returns its path.
pub fn dump(label: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    use std::io::Write;

    let mut file = tempfile::Builder::new()
        .prefix(&format!("rdelta-{label}-"))
        .suffix(".bin")
        .tempfile()?;
    file.write_all(bytes)?;
    let (_, path) = file.keep().map_err(|err| err.error)?;
    Ok(path)
}

/// Asserts that `actual` equals `expected`.
///
/// On mismatch the actual bytes are dumped with [`dump`] and the panic
/// message names the file.
#[track_caller]
pub fn assert_same_bytes(label: &str, actual: &[u8], expected: &[u8]) {
    if actual == expected {
        return;
    }
    match dump(label, actual) {
        Ok(path) => panic!(
            "{label}: got {} bytes, expected {}; output dumped to {}",
            actual.len(),
            expected.len(),
            path.display()
        ),
        Err(err) => panic!("{label}: output differs and could not be dumped: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_data_is_deterministic() {
        assert_eq!(random_data(), random_data());
        assert_eq!(random_data().len(), BASIS_LEN);
        assert_ne!(random_bytes(32, 1), random_bytes(32, 2));
    }

    #[test]
    fn mutation_inserts_at_offset() {
        let basis = random_data();
        let mutated = mutation(&basis);
        assert_eq!(mutated.len(), basis.len() + INSERTION.len());
        assert_eq!(&mutated[..MUTATION_OFFSET], &basis[..MUTATION_OFFSET]);
        assert_eq!(&mutated[MUTATION_OFFSET..MUTATION_OFFSET + 10], INSERTION);
        assert_eq!(&mutated[MUTATION_OFFSET + 10..], &basis[MUTATION_OFFSET..]);
    }

    #[test]
    fn failing_reader_serves_data_first() {
        let mut reader = FailingReader::new(b"abc".to_vec(), io::ErrorKind::BrokenPipe);
        let mut buf = [0u8; 8];
        assert_eq!(reader.read(&mut buf).unwrap(), 3);
        assert_eq!(reader.read(&mut buf).unwrap_err().kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn trickle_reader_limits_and_interrupts() {
        let mut reader = TrickleReader::new(&b"abcdef"[..], 2).with_interruptions();
        let mut buf = [0u8; 8];
        assert_eq!(reader.read(&mut buf).unwrap_err().kind(), io::ErrorKind::Interrupted);
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(reader.read(&mut buf).unwrap_err().kind(), io::ErrorKind::Interrupted);
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
    }

    #[test]
    fn dump_persists_bytes() {
        let path = dump("selftest", b"payload").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
        std::fs::remove_file(path).unwrap();
    }
}
