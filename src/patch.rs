//! src/patch.rs
//!
//! Patch application and the basis-read bridge behind it.

use std::any::Any;
use std::fmt;
use std::io::{self, Read};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use engine::{Engine, EngineResult, NativeEngine};
use logging::{bridge_fault, trace_bridge, trace_patch};
use parking_lot::Mutex;

use crate::config::BufferConfig;
use crate::error::Error;
use crate::job::{FaultSlot, Job, JobStats, JobStatus};
use crate::read_at::ReadAt;
use crate::registry::{ProcessRegistry, Registration, RegistryScope};

/// State a patch session's callback needs to serve basis reads.
///
/// Holds the basis, a scratch buffer reused across reads, and the slot
/// where read failures wait for the job to pick them up.
pub struct PatchContext {
    basis: Box<dyn ReadAt + Send + Sync>,
    scratch: Mutex<Vec<u8>>,
    fault: Arc<FaultSlot>,
}

impl PatchContext {
    /// Creates a context reading from `basis`.
    pub fn new<B: ReadAt + Send + Sync + 'static>(basis: B) -> Self {
        Self::with_fault_slot(basis, Arc::default())
    }

    fn with_fault_slot<B: ReadAt + Send + Sync + 'static>(basis: B, fault: Arc<FaultSlot>) -> Self {
        Self {
            basis: Box::new(basis),
            scratch: Mutex::new(Vec::new()),
            fault,
        }
    }

    /// Serves one copy request: `*len` bytes at `pos`, appended to `out`.
    fn serve(&self, pos: u64, len: &mut usize, out: &mut Vec<u8>) -> EngineResult {
        let requested = *len;
        let mut scratch = self.scratch.lock();
        scratch.resize(requested, 0);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            read_full(&*self.basis, pos, &mut scratch[..])
        }));
        match outcome {
            Ok(Ok(filled)) if filled == requested => {
                out.extend_from_slice(&scratch[..filled]);
                trace_bridge!(pos, len = filled, "basis read");
                EngineResult::DONE
            }
            Ok(Ok(filled)) => {
                trace_bridge!(pos, requested, filled, "basis ended early");
                *len = 0;
                EngineResult::INPUT_ENDED
            }
            Ok(Err(err)) => {
                bridge_fault!(pos, requested, error = %err, "basis read failed");
                self.fault.store(err);
                EngineResult::IO_ERROR
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                bridge_fault!(pos, requested, panic = %message, "basis reader panicked");
                self.fault
                    .store(io::Error::other(format!("basis reader panicked: {message}")));
                EngineResult::IO_ERROR
            }
        }
    }
}

impl fmt::Debug for PatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchContext")
            .field("scratch_capacity", &self.scratch.lock().capacity())
            .finish_non_exhaustive()
    }
}

/// Fills `buf` from `basis` starting at `pos`; a short count means end of data.
fn read_full(basis: &dyn ReadAt, mut pos: u64, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match basis.read_at(&mut buf[filled..], pos) {
            Ok(0) => break,
            Ok(n) => {
                filled += n;
                pos += n as u64;
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

/// Engine copy callback resolving `opaque` through the scope's registry.
fn copy_callback<S: RegistryScope>(
    opaque: usize,
    pos: u64,
    len: &mut usize,
    out: &mut Vec<u8>,
) -> EngineResult {
    match S::registry().lookup(opaque) {
        Some(context) => context.serve(pos, len, out),
        None => {
            bridge_fault!(opaque, "copy callback for an unregistered context");
            EngineResult::INTERNAL_ERROR
        }
    }
}

/// Reader producing the result of applying a delta to a basis.
///
/// The delta is read sequentially; the basis is read at whatever offsets the
/// delta's copy commands name. A basis that ends before a copy is satisfied
/// yields [`Error::InputEnded`]; a basis read that fails, or panics, yields
/// [`Error::Io`].
///
/// # Examples
///
/// ```
/// use std::io::Read;
///
/// let basis = b"the quick brown fox".to_vec();
/// let mut delta = Vec::new();
/// rdelta::instant_delta(&basis[..], &b"the quick red fox"[..], &mut delta).unwrap();
///
/// let mut patcher = rdelta::Patcher::new(&delta[..], basis).unwrap();
/// let mut out = Vec::new();
/// patcher.read_to_end(&mut out).unwrap();
/// assert_eq!(out, b"the quick red fox");
/// ```
pub struct Patcher<R, S: RegistryScope = ProcessRegistry, E: Engine = NativeEngine> {
    job: Job<R, E>,
    registration: Registration<S>,
}

impl<R: Read> Patcher<R> {
    /// Starts applying `delta` to `basis`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] when the session cannot start.
    pub fn new<B: ReadAt + Send + Sync + 'static>(delta: R, basis: B) -> Result<Self, Error> {
        Self::with_buffers(delta, basis, BufferConfig::default())
    }

    /// Like [`new`](Self::new) with explicit staging buffer capacities.
    pub fn with_buffers<B: ReadAt + Send + Sync + 'static>(
        delta: R,
        basis: B,
        buffers: BufferConfig,
    ) -> Result<Self, Error> {
        Self::with_engine(NativeEngine, delta, basis, buffers)
    }
}

impl<R: Read, S: RegistryScope, E: Engine> Patcher<R, S, E> {
    /// Starts a patch session on `engine`, registered in the registry of `S`.
    pub fn with_engine<B: ReadAt + Send + Sync + 'static>(
        engine: E,
        delta: R,
        basis: B,
        buffers: BufferConfig,
    ) -> Result<Self, Error> {
        buffers.validate()?;
        let fault = Arc::new(FaultSlot::default());
        let context = Arc::new(PatchContext::with_fault_slot(basis, Arc::clone(&fault)));
        let registration = Registration::<S>::new(context);

        let session = engine
            .begin_patch(copy_callback::<S>, registration.id())
            .map_err(|result| {
                trace_patch!(?result, "patch session refused");
                Error::AllocationFailure
            })?;
        let job = Job::new(engine, session, delta, buffers, "patch")?.with_fault_slot(fault);
        trace_patch!(id = registration.id(), "patcher created");
        Ok(Self { job, registration })
    }

    /// Reads patched output into `buf`; see [`Job::pull`].
    pub fn pull(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        self.job.pull(buf)
    }

    /// Returns the registry id of this patcher's context.
    #[must_use]
    pub const fn id(&self) -> usize {
        self.registration.id()
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

    /// Releases the session, then removes the context from the registry.
    pub fn close(self) {
        let Self { job, registration } = self;
        job.close();
        drop(registration);
    }
}

impl<R: Read, S: RegistryScope, E: Engine> Read for Patcher<R, S, E> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.job.read(buf)
    }
}

impl<R, S: RegistryScope, E: Engine> fmt::Debug for Patcher<R, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Patcher")
            .field("id", &self.registration.id())
            .field("job", &self.job)
            .finish()
    }
}
