//! src/signature.rs
//!
//! Signature generation and loading.

use std::fmt;
use std::io::{self, Read};

use engine::{Engine, EngineResult, NativeEngine};
use logging::trace_signature;

use crate::config::{BufferConfig, SignatureConfig};
use crate::error::Error;
use crate::job::{Job, JobStats, JobStatus};

/// Reader producing the signature of a basis stream.
///
/// # Examples
///
/// ```
/// use std::io::Read;
/// use rdelta::SignatureGen;
///
/// let mut generator = SignatureGen::with_defaults(&[0u8; 5000][..]).unwrap();
/// let mut signature = Vec::new();
/// generator.read_to_end(&mut signature).unwrap();
///
/// // 12 byte header, then 3 blocks of weak sum plus 8 byte strong sum
/// assert_eq!(signature.len(), 12 + 3 * 12);
/// ```
#[derive(Debug)]
pub struct SignatureGen<R, E: Engine = NativeEngine> {
    job: Job<R, E>,
}

impl<R: Read> SignatureGen<R> {
    /// Starts generating the signature of `basis` with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] when the engine rejects the
    /// configuration.
    pub fn new(basis: R, config: SignatureConfig) -> Result<Self, Error> {
        Self::with_engine(NativeEngine, basis, config, BufferConfig::default())
    }

    /// Starts generating a signature with the engine's default parameters.
    pub fn with_defaults(basis: R) -> Result<Self, Error> {
        Self::new(basis, SignatureConfig::default())
    }
}

impl<R: Read, E: Engine> SignatureGen<R, E> {
    /// Starts a signature session on `engine`.
    pub fn with_engine(
        engine: E,
        basis: R,
        config: SignatureConfig,
        buffers: BufferConfig,
    ) -> Result<Self, Error> {
        buffers.validate()?;
        let session = engine
            .begin_signature(config.block_len(), config.strong_len(), config.compat())
            .map_err(|result| {
                trace_signature!(?config, ?result, "signature session refused");
                Error::AllocationFailure
            })?;
        trace_signature!(?config, "signature generator created");
        Ok(Self {
            job: Job::new(engine, session, basis, buffers, "signature")?,
        })
    }

    /// Reads signature bytes into `buf`; see [`Job::pull`].
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

impl<R: Read, E: Engine> Read for SignatureGen<R, E> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.job.read(buf)
    }
}

/// A loaded and indexed signature.
///
/// Immutable once loaded; share it by reference between any number of
/// concurrently running [`DeltaGen`](crate::DeltaGen)s, which borrow it and
/// therefore cannot outlive it.
pub struct Signature<E: Engine = NativeEngine> {
    engine: E,
    index: Option<E::Index>,
}

/// Loads a signature stream with the native engine.
///
/// # Errors
///
/// Fails with the error of the loading job ([`Error::BadMagic`],
/// [`Error::InputEnded`], [`Error::Io`], ...) or of the index build.
pub fn load_signature<R: Read>(source: R) -> Result<Signature, Error> {
    Signature::load(source)
}

impl Signature {
    /// Loads and indexes a signature stream.
    pub fn load<R: Read>(source: R) -> Result<Self, Error> {
        Self::load_with_engine(NativeEngine, source, BufferConfig::default())
    }

    /// Returns the block length the signature was computed with.
    #[must_use]
    pub fn block_len(&self) -> Option<usize> {
        self.built().map(|index| index.block_length())
    }

    /// Returns the number of blocks in the signature.
    #[must_use]
    pub fn block_count(&self) -> Option<usize> {
        self.built().map(|index| index.len())
    }

    fn built(&self) -> Option<&::signature::SignatureIndex> {
        self.index.as_ref()?.index().map(|index| &**index)
    }
}

impl<E: Engine + Clone> Signature<E> {
    /// Loads a signature on `engine`.
    ///
    /// The stream is driven to completion through a job whose output is
    /// discarded; loading fills the engine's index as a side effect. The
    /// index is then built, after which it is read-only.
    pub fn load_with_engine<R: Read>(
        engine: E,
        source: R,
        buffers: BufferConfig,
    ) -> Result<Self, Error> {
        buffers.validate()?;
        let (session, index) = engine.begin_loadsig().map_err(|result| {
            trace_signature!(?result, "loadsig session refused");
            Error::AllocationFailure
        })?;
        let signature = Self {
            engine: engine.clone(),
            index: Some(index),
        };

        let mut job = Job::new(engine, session, source, buffers, "loadsig")?;
        io::copy(&mut job, &mut io::sink()).map_err(Error::from_io)?;
        let stats = job.stats();
        job.close();

        let index = signature.index.as_ref().ok_or(Error::Internal)?;
        match signature.engine.build_index(index) {
            EngineResult::DONE => {
                trace_signature!(bytes = stats.input_bytes(), "signature loaded and indexed");
                Ok(signature)
            }
            other => Err(Error::from_result(other)),
        }
    }
}

impl<E: Engine> Signature<E> {
    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    pub(crate) fn index(&self) -> Result<&E::Index, Error> {
        self.index.as_ref().ok_or(Error::Internal)
    }

    /// Releases the index.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(index) = self.index.take() {
            self.engine.free_index(index);
            trace_signature!("signature released");
        }
    }
}

impl<E: Engine> Drop for Signature<E> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<E: Engine> fmt::Debug for Signature<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("released", &self.index.is_none())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::signature::{DEFAULT_BLOCK_LEN, DEFAULT_STRONG_LEN};
    use test_support::random_bytes;

    fn generate(data: &[u8], config: SignatureConfig) -> Vec<u8> {
        let mut out = Vec::new();
        SignatureGen::new(data, config).unwrap().read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn zero_config_matches_explicit_defaults() {
        let data = random_bytes(20_000, 21);
        let explicit = SignatureConfig::new()
            .with_block_len(DEFAULT_BLOCK_LEN)
            .with_strong_len(DEFAULT_STRONG_LEN);
        assert_eq!(generate(&data, SignatureConfig::default()), generate(&data, explicit));
    }

    #[test]
    fn invalid_strong_length_fails_construction() {
        let config = SignatureConfig::new().with_strong_len(64);
        let err = SignatureGen::new(&b""[..], config).unwrap_err();
        assert!(matches!(err, Error::AllocationFailure));
    }

    #[test]
    fn loaded_signature_reports_its_shape() {
        let data = random_bytes(10_000, 22);
        let bytes = generate(&data, SignatureConfig::new().with_block_len(1000));
        let signature = load_signature(&bytes[..]).unwrap();
        assert_eq!(signature.block_len(), Some(1000));
        assert_eq!(signature.block_count(), Some(10));
        signature.close();
    }

    #[test]
    fn loading_garbage_is_bad_magic() {
        let err = load_signature(&b"definitely not a signature"[..]).unwrap_err();
        assert!(matches!(err, Error::BadMagic));
    }

    #[test]
    fn loading_empty_stream_is_input_ended() {
        let err = load_signature(io::empty()).unwrap_err();
        assert!(matches!(err, Error::InputEnded));
    }
}
