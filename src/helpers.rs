//! src/helpers.rs
//!
//! One-call compositions of the streaming readers.

use std::io::{self, Read, Write};

use crate::delta::DeltaGen;
use crate::error::Error;
use crate::patch::Patcher;
use crate::read_at::ReadAt;
use crate::signature::{Signature, SignatureGen};

fn drain<R: Read, W: Write>(mut reader: R, mut out: W) -> Result<u64, Error> {
    io::copy(&mut reader, &mut out).map_err(Error::from_io)
}

/// Writes the signature of `basis` to `out` using default parameters.
///
/// Returns the number of signature bytes written.
///
/// # Errors
///
/// Propagates job errors; a failing `out` surfaces as [`Error::Io`].
pub fn create_signature<B: Read, W: Write>(basis: B, out: W) -> Result<u64, Error> {
    let generator = SignatureGen::with_defaults(basis)?;
    drain(generator, out)
}

/// Loads the signature stream `signature` and writes the delta of `new` to `out`.
pub fn create_delta<S: Read, N: Read, W: Write>(signature: S, new: N, out: W) -> Result<u64, Error> {
    let signature = Signature::load(signature)?;
    let generator = DeltaGen::new(&signature, new)?;
    drain(generator, out)
}

/// Writes the delta from `basis` to `new` without materialising a signature.
///
/// The signature generator is read directly by the signature loader.
pub fn instant_delta<B: Read, N: Read, W: Write>(basis: B, new: N, out: W) -> Result<u64, Error> {
    let signature = Signature::load(SignatureGen::with_defaults(basis)?)?;
    let generator = DeltaGen::new(&signature, new)?;
    drain(generator, out)
}

/// Applies `delta` to `basis`, writing the result to `out`.
pub fn patch<B, D, W>(basis: B, delta: D, out: W) -> Result<u64, Error>
where
    B: ReadAt + Send + Sync + 'static,
    D: Read,
    W: Write,
{
    let patcher = Patcher::new(delta, basis)?;
    drain(patcher, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::{FailingReader, random_bytes};

    #[test]
    fn two_step_and_instant_deltas_agree() {
        let basis = random_bytes(30_000, 41);
        let mut new = basis.clone();
        new.truncate(25_000);
        new.extend_from_slice(b"tail");

        let mut signature = Vec::new();
        create_signature(&basis[..], &mut signature).unwrap();
        let mut two_step = Vec::new();
        create_delta(&signature[..], &new[..], &mut two_step).unwrap();
        let mut instant = Vec::new();
        instant_delta(&basis[..], &new[..], &mut instant).unwrap();
        assert_eq!(two_step, instant);

        let mut patched = Vec::new();
        let written = patch(basis, &instant[..], &mut patched).unwrap();
        assert_eq!(written, new.len() as u64);
        assert_eq!(patched, new);
    }

    #[test]
    fn failing_sink_is_an_io_error() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = create_signature(&b"data"[..], Full).unwrap_err();
        assert!(err.is_io());
        assert_eq!(err.kind(), io::ErrorKind::StorageFull);
    }

    #[test]
    fn failing_basis_stream_aborts_instant_delta() {
        let basis = FailingReader::new(vec![0u8; 10], io::ErrorKind::TimedOut);
        let err = instant_delta(basis, &b"new"[..], io::sink()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }
}
