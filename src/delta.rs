//! src/delta.rs
//!
//! Delta generation against a loaded signature.

use std::io::{self, Read};
use std::marker::PhantomData;

use engine::{Engine, NativeEngine};
use logging::trace_delta;

use crate::config::BufferConfig;
use crate::error::Error;
use crate::job::{Job, JobStats, JobStatus};
use crate::signature::Signature;

/// Reader producing the delta that turns the signed basis into `R`'s content.
///
/// The generator borrows its [`Signature`], so the signature stays alive
/// and unmodified for as long as any generator uses it. Several generators
/// may share one signature across threads.
///
/// # Examples
///
/// ```
/// use std::io::Read;
/// use rdelta::{DeltaGen, SignatureGen, load_signature};
///
/// let basis = vec![1u8; 8192];
/// let signature = load_signature(SignatureGen::with_defaults(&basis[..]).unwrap()).unwrap();
///
/// let mut changed = basis.clone();
/// changed[5000] = 2;
/// let mut delta = Vec::new();
/// DeltaGen::new(&signature, &changed[..]).unwrap().read_to_end(&mut delta).unwrap();
/// assert!(delta.len() < changed.len());
/// ```
#[derive(Debug)]
pub struct DeltaGen<'sig, R, E: Engine = NativeEngine> {
    job: Job<R, E>,
    _signature: PhantomData<&'sig Signature<E>>,
}

impl<'sig, R: Read> DeltaGen<'sig, R> {
    /// Starts computing the delta of `source` against `signature`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] when the session cannot start.
    pub fn new(signature: &'sig Signature, source: R) -> Result<Self, Error> {
        Self::with_buffers(signature, source, BufferConfig::default())
    }
}

impl<'sig, R: Read, E: Engine + Clone> DeltaGen<'sig, R, E> {
    /// Like [`new`](DeltaGen::new) with explicit staging buffer capacities.
    pub fn with_buffers(
        signature: &'sig Signature<E>,
        source: R,
        buffers: BufferConfig,
    ) -> Result<Self, Error> {
        buffers.validate()?;
        let engine = signature.engine().clone();
        let session = engine.begin_delta(signature.index()?).map_err(|result| {
            trace_delta!(?result, "delta session refused");
            Error::AllocationFailure
        })?;
        trace_delta!("delta generator created");
        Ok(Self {
            job: Job::new(engine, session, source, buffers, "delta")?,
            _signature: PhantomData,
        })
    }
}

impl<R: Read, E: Engine> DeltaGen<'_, R, E> {
    /// Reads delta bytes into `buf`; see [`Job::pull`].
    pub fn pull(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        self.job.pull(buf)
    }

    /// Returns the job's lifecycle state.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.job.status()
    }

    /// Returns the job's counters.
    #[must_use]
    pub const fn stats(&self) -> JobStats {
        self.job.stats()
    }

    /// Releases the session.
    pub fn close(self) {
        self.job.close();
    }
}

impl<R: Read, E: Engine> Read for DeltaGen<'_, R, E> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.job.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::SignatureGen;
    use test_support::random_bytes;

    #[test]
    fn identical_input_yields_a_tiny_delta() {
        let basis = random_bytes(40_000, 31);
        let signature = Signature::load(SignatureGen::with_defaults(&basis[..]).unwrap()).unwrap();

        let mut delta = Vec::new();
        let mut generator = DeltaGen::new(&signature, &basis[..]).unwrap();
        generator.read_to_end(&mut delta).unwrap();

        // magic, one copy command, end
        assert!(delta.len() <= 4 + 9 + 1, "delta is {} bytes", delta.len());
        assert_eq!(generator.stats().input_bytes(), 40_000);
        generator.close();
    }
}
