#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! The delta-encoding engine behind rdelta. It computes signatures, loads
//! them back, generates deltas and applies patches, and does all of it
//! incrementally: a caller opens a session, then repeatedly hands it an input
//! window and an output window through [`Engine::iterate`] until the session
//! reports [`EngineResult::DONE`] or an error.
//!
//! # Design
//!
//! - [`Engine`] is the narrow contract the binding layer programs against:
//!   begin a session, iterate it, free it. [`NativeEngine`] is the in-process
//!   implementation.
//! - [`Buffers`] describes one iteration's exchange. Sessions never block;
//!   when they run out of input or output room they return
//!   [`EngineResult::BLOCKED`] and keep their state for the next call.
//! - Signatures are loaded into a [`SignatureHandle`]. The handle has to be
//!   indexed with [`Engine::build_index`] before delta sessions accept it.
//! - Patch sessions fetch basis ranges through a [`CopyCallback`], a plain
//!   function pointer with an opaque integer context.
//! - The byte layout of signature and delta streams lives in [`format`].
//!
//! # Examples
//!
//! ```
//! use engine::{Buffers, Engine, EngineResult, NativeEngine};
//!
//! let engine = NativeEngine;
//! let mut session = engine.begin_signature(0, 0, false).unwrap();
//! let mut out = vec![0u8; 4096];
//! let mut buffers = Buffers::new(b"some basis data", true, &mut out);
//!
//! assert_eq!(engine.iterate(&mut session, &mut buffers), EngineResult::DONE);
//! // header plus one block entry of 4 + 8 bytes
//! assert_eq!(buffers.produced(), 12 + 12);
//! engine.free_session(session);
//! ```

mod buffers;
mod callback;
pub mod format;
mod handle;
mod result;
mod session;
mod tube;

use logging::trace_engine;
use signature::{SignatureAlgorithm, SignatureParams};
#[cfg(feature = "tracing")]
use tracing::instrument;

pub use buffers::Buffers;
pub use callback::CopyCallback;
pub use handle::SignatureHandle;
pub use result::EngineResult;
pub use session::Session;

/// Session-oriented delta engine contract.
///
/// Every `begin_*` call returns a session owned by the caller, who drives it
/// with [`iterate`](Self::iterate) and hands it back to
/// [`free_session`](Self::free_session) exactly once. Ownership makes double
/// release impossible.
pub trait Engine {
    /// One engine run.
    type Session: Send;
    /// Loaded signature, shareable between concurrent delta sessions once built.
    type Index: Send + Sync;

    /// Starts a signature session. Zero lengths select the engine defaults;
    /// `compat` selects the legacy signature format.
    fn begin_signature(
        &self,
        block_len: u32,
        strong_len: u32,
        compat: bool,
    ) -> Result<Self::Session, EngineResult>;

    /// Starts a session that parses a signature stream into a new index handle.
    fn begin_loadsig(&self) -> Result<(Self::Session, Self::Index), EngineResult>;

    /// Builds the lookup structures of a fully loaded index.
    fn build_index(&self, index: &Self::Index) -> EngineResult;

    /// Starts a delta session against a built index.
    fn begin_delta(&self, index: &Self::Index) -> Result<Self::Session, EngineResult>;

    /// Starts a patch session that reads the basis through `callback`.
    fn begin_patch(&self, callback: CopyCallback, opaque: usize) -> Result<Self::Session, EngineResult>;

    /// Runs the session against one buffer exchange.
    fn iterate(&self, session: &mut Self::Session, buffers: &mut Buffers<'_>) -> EngineResult;

    /// Releases a session.
    fn free_session(&self, session: Self::Session);

    /// Releases an index.
    fn free_index(&self, index: Self::Index);
}

/// The in-process engine.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NativeEngine;

impl Engine for NativeEngine {
    type Session = Session;
    type Index = SignatureHandle;

    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    fn begin_signature(
        &self,
        block_len: u32,
        strong_len: u32,
        compat: bool,
    ) -> Result<Session, EngineResult> {
        let params = SignatureParams::new(block_len, strong_len, SignatureAlgorithm::for_compat(compat));
        let layout = params.resolve().map_err(|_| EngineResult::PARAM_ERROR)?;
        trace_engine!(
            block_len = layout.block_length().get(),
            strong_len = layout.strong_len(),
            algorithm = ?layout.algorithm(),
            "signature session started"
        );
        Ok(Session::signature(layout))
    }

    fn begin_loadsig(&self) -> Result<(Session, SignatureHandle), EngineResult> {
        let handle = SignatureHandle::new();
        trace_engine!("loadsig session started");
        Ok((Session::loadsig(handle.clone()), handle))
    }

    #[cfg_attr(feature = "tracing", instrument(skip_all))]
    fn build_index(&self, index: &SignatureHandle) -> EngineResult {
        let result = index.build();
        trace_engine!(?result, "index build");
        result
    }

    fn begin_delta(&self, index: &SignatureHandle) -> Result<Session, EngineResult> {
        let index = index.index().ok_or(EngineResult::PARAM_ERROR)?;
        trace_engine!(blocks = index.len(), "delta session started");
        Ok(Session::delta(index.clone()))
    }

    fn begin_patch(&self, callback: CopyCallback, opaque: usize) -> Result<Session, EngineResult> {
        trace_engine!(opaque, "patch session started");
        Ok(Session::patch(callback, opaque))
    }

    fn iterate(&self, session: &mut Session, buffers: &mut Buffers<'_>) -> EngineResult {
        let result = session.iterate(buffers);
        trace_engine!(
            kind = session.kind_name(),
            consumed = buffers.consumed(),
            produced = buffers.produced(),
            ?result,
            "iterate"
        );
        result
    }

    fn free_session(&self, session: Session) {
        trace_engine!(kind = session.kind_name(), "session freed");
        drop(session);
    }

    fn free_index(&self, index: SignatureHandle) {
        drop(index);
    }
}
