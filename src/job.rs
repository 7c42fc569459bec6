//! src/job.rs
//!
//! Pull-style driver turning an incremental engine session into a reader.

use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;

use engine::{Buffers, Engine, EngineResult, NativeEngine};
use logging::{job_event, trace_job};
use parking_lot::Mutex;

use crate::config::BufferConfig;
use crate::error::Error;

/// Out-of-band slot for an I/O fault raised inside an engine callback.
///
/// The callback can only hand the engine a status code, so the error itself
/// is parked here and picked up by the job right after the engine call.
#[derive(Debug, Default)]
pub(crate) struct FaultSlot(Mutex<Option<io::Error>>);

impl FaultSlot {
    /// Stores `err` unless an earlier fault is still pending.
    pub(crate) fn store(&self, err: io::Error) {
        let mut slot = self.0.lock();
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    pub(crate) fn take(&self) -> Option<io::Error> {
        self.0.lock().take()
    }
}

/// Counters describing the work a job has done.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct JobStats {
    input_bytes: u64,
    output_bytes: u64,
    iterations: u64,
}

impl JobStats {
    /// Bytes read from the upstream source.
    #[must_use]
    pub const fn input_bytes(&self) -> u64 {
        self.input_bytes
    }

    /// Bytes handed to the caller.
    #[must_use]
    pub const fn output_bytes(&self) -> u64 {
        self.output_bytes
    }

    /// Engine iterations run so far.
    #[must_use]
    pub const fn iterations(&self) -> u64 {
        self.iterations
    }
}

/// Lifecycle of a job.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobStatus {
    /// No iteration has run yet, or the last one made progress.
    Running,
    /// The last iteration stopped for more input or output room.
    Blocked,
    /// The engine finished; reads return end of stream.
    Done,
    /// The job failed; reads return the stored error.
    Errored,
}

#[derive(Debug)]
enum JobState {
    Running,
    Blocked,
    Done,
    Errored(Error),
}

/// One engine session exposed as a byte stream.
///
/// Each [`pull`](Self::pull) first serves output left over from the previous
/// engine iteration. Only when none is left does it top up the input staging
/// buffer from the source (once it has been drained) and run one more
/// iteration. A read of `Ok(0)` from the source marks end of input; the
/// engine may still need several iterations afterwards to flush its output.
///
/// Once the engine reports completion every further pull returns `Ok(0)`.
/// Once anything fails every further pull returns the same error, after the
/// output produced before the failure has been served.
///
/// The session is released exactly once, by [`close`](Self::close) or on drop.
pub struct Job<R, E: Engine = NativeEngine> {
    engine: E,
    session: Option<E::Session>,
    source: R,
    input: Box<[u8]>,
    in_pos: usize,
    in_len: usize,
    eof_in: bool,
    output: Box<[u8]>,
    out_pos: usize,
    out_len: usize,
    stalled: bool,
    state: JobState,
    stats: JobStats,
    fault: Option<Arc<FaultSlot>>,
    kind: &'static str,
}

impl<R: Read, E: Engine> Job<R, E> {
    /// Wraps a freshly started session.
    ///
    /// `kind` only labels log events.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] when `buffers` has a zero
    /// capacity; the session is released before returning.
    pub fn new(
        engine: E,
        session: E::Session,
        source: R,
        buffers: BufferConfig,
        kind: &'static str,
    ) -> Result<Self, Error> {
        if let Err(err) = buffers.validate() {
            engine.free_session(session);
            return Err(err);
        }
        job_event!(
            kind,
            input_capacity = buffers.input_capacity(),
            output_capacity = buffers.output_capacity(),
            "job created"
        );
        Ok(Self {
            engine,
            session: Some(session),
            source,
            input: vec![0u8; buffers.input_capacity()].into_boxed_slice(),
            in_pos: 0,
            in_len: 0,
            eof_in: false,
            output: vec![0u8; buffers.output_capacity()].into_boxed_slice(),
            out_pos: 0,
            out_len: 0,
            stalled: false,
            state: JobState::Running,
            stats: JobStats::default(),
            fault: None,
            kind,
        })
    }

    pub(crate) fn with_fault_slot(mut self, fault: Arc<FaultSlot>) -> Self {
        self.fault = Some(fault);
        self
    }

    /// Reads produced bytes into `buf`.
    ///
    /// Returns `Ok(0)` only at end of stream (or for an empty `buf`).
    ///
    /// # Errors
    ///
    /// Returns the job's terminal error once it has failed.
    pub fn pull(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            if self.out_pos < self.out_len {
                let len = buf.len().min(self.out_len - self.out_pos);
                buf[..len].copy_from_slice(&self.output[self.out_pos..self.out_pos + len]);
                self.out_pos += len;
                self.stats.output_bytes += len as u64;
                return Ok(len);
            }
            match &self.state {
                JobState::Done => return Ok(0),
                JobState::Errored(err) => return Err(err.clone()),
                JobState::Running | JobState::Blocked => {}
            }

            self.fill_input();
            if matches!(self.state, JobState::Running | JobState::Blocked) {
                self.iterate();
            }
        }
    }

    fn fill_input(&mut self) {
        if self.eof_in || (self.in_pos < self.in_len && !self.stalled) {
            return;
        }
        if self.in_pos > 0 {
            self.input.copy_within(self.in_pos..self.in_len, 0);
            self.in_len -= self.in_pos;
            self.in_pos = 0;
        }
        if self.in_len == self.input.len() {
            // the engine refuses a full staging buffer and there is no room to add more
            self.fail(Error::Internal);
            return;
        }

        loop {
            match self.source.read(&mut self.input[self.in_len..]) {
                Ok(0) => {
                    self.eof_in = true;
                    trace_job!(kind = self.kind, "end of input");
                    return;
                }
                Ok(len) => {
                    self.in_len += len;
                    self.stats.input_bytes += len as u64;
                    trace_job!(kind = self.kind, bytes = len, "pulled input chunk");
                    return;
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    self.fail(Error::from_io(err));
                    return;
                }
            }
        }
    }

    fn iterate(&mut self) {
        let Some(session) = self.session.as_mut() else {
            self.fail(Error::Internal);
            return;
        };
        let mut buffers = Buffers::new(&self.input[self.in_pos..self.in_len], self.eof_in, &mut self.output);
        let result = self.engine.iterate(session, &mut buffers);
        let consumed = buffers.consumed();
        let produced = buffers.produced();

        self.in_pos += consumed;
        self.out_pos = 0;
        self.out_len = produced;
        self.stats.iterations += 1;
        trace_job!(kind = self.kind, consumed, produced, ?result, "iteration");

        if let Some(fault) = self.fault.as_ref().and_then(|slot| slot.take()) {
            self.fail(Error::Io(Arc::new(fault)));
            return;
        }

        match result {
            EngineResult::DONE => {
                self.state = JobState::Done;
                job_event!(
                    kind = self.kind,
                    input_bytes = self.stats.input_bytes,
                    iterations = self.stats.iterations,
                    "job done"
                );
            }
            EngineResult::BLOCKED => {
                self.stalled = consumed == 0 && produced == 0;
                if self.stalled && self.eof_in {
                    // no progress and nothing left to offer
                    self.fail(Error::Internal);
                } else {
                    self.state = JobState::Blocked;
                }
            }
            other => self.fail(Error::from_result(other)),
        }
    }

    fn fail(&mut self, err: Error) {
        job_event!(kind = self.kind, error = %err, "job errored");
        self.state = JobState::Errored(err);
    }
}

impl<R, E: Engine> Job<R, E> {
    /// Returns the job's lifecycle state.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        match self.state {
            JobState::Running => JobStatus::Running,
            JobState::Blocked => JobStatus::Blocked,
            JobState::Done => JobStatus::Done,
            JobState::Errored(_) => JobStatus::Errored,
        }
    }

    /// Returns the terminal error, if the job failed.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        match &self.state {
            JobState::Errored(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the job's counters.
    #[must_use]
    pub const fn stats(&self) -> JobStats {
        self.stats
    }

    /// Releases the session and the staging buffers.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(session) = self.session.take() {
            self.engine.free_session(session);
            job_event!(
                kind = self.kind,
                output_bytes = self.stats.output_bytes,
                "job released"
            );
        }
    }
}

impl<R, E: Engine> Drop for Job<R, E> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<R: Read, E: Engine> Read for Job<R, E> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.pull(buf).map_err(io::Error::from)
    }
}

impl<R, E: Engine> fmt::Debug for Job<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .field("pending_output", &(self.out_len - self.out_pos))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use test_support::{FailingReader, TrickleReader, random_bytes};

    fn signature_job<R: Read>(source: R, buffers: BufferConfig) -> Job<R> {
        let session = NativeEngine.begin_signature(512, 0, false).unwrap();
        Job::new(NativeEngine, session, source, buffers, "signature").unwrap()
    }

    #[test]
    fn zero_capacity_fails_construction() {
        let session = NativeEngine.begin_signature(0, 0, false).unwrap();
        let buffers = BufferConfig::default().with_input_capacity(0);
        let err = Job::new(NativeEngine, session, io::empty(), buffers, "signature").unwrap_err();
        assert!(matches!(err, Error::AllocationFailure));
    }

    #[test]
    fn small_buffers_produce_the_same_stream() {
        let data = random_bytes(9_000, 11);
        let mut large = Vec::new();
        signature_job(Cursor::new(&data), BufferConfig::default())
            .read_to_end(&mut large)
            .unwrap();

        let tiny = BufferConfig::default().with_input_capacity(3).with_output_capacity(5);
        let mut small = Vec::new();
        signature_job(TrickleReader::new(Cursor::new(&data), 7).with_interruptions(), tiny)
            .read_to_end(&mut small)
            .unwrap();

        assert_eq!(large, small);
    }

    #[test]
    fn done_job_keeps_returning_end_of_stream() {
        let mut job = signature_job(Cursor::new(b"abc".to_vec()), BufferConfig::default());
        let mut out = Vec::new();
        job.read_to_end(&mut out).unwrap();
        assert_eq!(job.status(), JobStatus::Done);

        let mut buf = [0u8; 16];
        assert_eq!(job.pull(&mut buf).unwrap(), 0);
        assert_eq!(job.pull(&mut buf).unwrap(), 0);
    }

    #[test]
    fn stats_count_bytes_and_iterations() {
        let data = random_bytes(2_000, 12);
        let mut job = signature_job(Cursor::new(&data), BufferConfig::default());
        let mut out = Vec::new();
        job.read_to_end(&mut out).unwrap();

        let stats = job.stats();
        assert_eq!(stats.input_bytes(), 2_000);
        assert_eq!(stats.output_bytes(), out.len() as u64);
        assert!(stats.iterations() >= 1);
    }

    #[test]
    fn upstream_failure_is_sticky() {
        let source = FailingReader::new(random_bytes(100, 13), io::ErrorKind::ConnectionReset);
        let mut job = signature_job(source, BufferConfig::default());
        let mut buf = [0u8; 64];

        let first = loop {
            match job.pull(&mut buf) {
                Ok(0) => panic!("stream ended without the injected error"),
                Ok(_) => {}
                Err(err) => break err,
            }
        };
        assert_eq!(first.kind(), io::ErrorKind::ConnectionReset);
        assert_eq!(job.status(), JobStatus::Errored);

        let second = job.pull(&mut buf).unwrap_err();
        match (first, second) {
            (Error::Io(a), Error::Io(b)) => assert!(Arc::ptr_eq(&a, &b)),
            other => panic!("unexpected errors {other:?}"),
        }
    }

    #[test]
    fn read_wraps_typed_errors() {
        let source = FailingReader::new(Vec::new(), io::ErrorKind::PermissionDenied);
        let mut job = signature_job(source, BufferConfig::default());
        let mut out = Vec::new();
        let err = job.read_to_end(&mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(Error::from_io(err).is_io());
    }

    #[test]
    fn fault_slot_keeps_first_error() {
        let slot = FaultSlot::default();
        slot.store(io::Error::other("first"));
        slot.store(io::Error::other("second"));
        assert_eq!(slot.take().unwrap().to_string(), "first");
        assert!(slot.take().is_none());
    }
}
