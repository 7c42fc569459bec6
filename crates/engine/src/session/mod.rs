//! crates/engine/src/session/mod.rs
//!
//! Incremental sessions driven through [`Engine::iterate`](crate::Engine::iterate).
//!
//! Every session kind implements `advance`, which performs one bounded unit
//! of work: it may consume input and queue output in the session's tube, and
//! reports whether it wants to continue, needs more input, has finished or
//! failed. [`Session::iterate`] alternates between draining the tube into the
//! caller's output window and calling `advance`, and never advances while
//! queued output is waiting. The amount buffered inside a session therefore
//! stays bounded by what a single step can produce.

mod delta;
mod loadsig;
mod patch;
mod sign;

use std::sync::Arc;

use signature::{SignatureIndex, SignatureLayout};

use crate::buffers::Buffers;
use crate::callback::CopyCallback;
use crate::handle::SignatureHandle;
use crate::result::EngineResult;
use crate::tube::Tube;

use self::delta::DeltaSession;
use self::loadsig::LoadSigSession;
use self::patch::PatchSession;
use self::sign::SignatureSession;

/// Outcome of one `advance` call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Step {
    Continue,
    NeedInput,
    Finished,
    Fail(EngineResult),
}

#[derive(Debug)]
enum Kind {
    Signature(SignatureSession),
    LoadSig(LoadSigSession),
    Delta(DeltaSession),
    Patch(PatchSession),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Running,
    Done,
    Failed(EngineResult),
}

/// One run of the native engine.
#[derive(Debug)]
pub struct Session {
    kind: Kind,
    tube: Tube,
    state: State,
}

impl Session {
    fn with_kind(kind: Kind) -> Self {
        Self {
            kind,
            tube: Tube::default(),
            state: State::Running,
        }
    }

    pub(crate) fn signature(layout: SignatureLayout) -> Self {
        Self::with_kind(Kind::Signature(SignatureSession::new(layout)))
    }

    pub(crate) fn loadsig(handle: SignatureHandle) -> Self {
        Self::with_kind(Kind::LoadSig(LoadSigSession::new(handle)))
    }

    pub(crate) fn delta(index: Arc<SignatureIndex>) -> Self {
        Self::with_kind(Kind::Delta(DeltaSession::new(index)))
    }

    pub(crate) fn patch(callback: CopyCallback, opaque: usize) -> Self {
        Self::with_kind(Kind::Patch(PatchSession::new(callback, opaque)))
    }

    /// Returns a short name for the session kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self.kind {
            Kind::Signature(_) => "signature",
            Kind::LoadSig(_) => "loadsig",
            Kind::Delta(_) => "delta",
            Kind::Patch(_) => "patch",
        }
    }

    /// Returns the number of produced bytes still queued inside the session.
    #[must_use]
    pub fn pending_output(&self) -> usize {
        self.tube.pending()
    }

    pub(crate) fn iterate(&mut self, buffers: &mut Buffers<'_>) -> EngineResult {
        loop {
            if !self.tube.flush(buffers) {
                return EngineResult::BLOCKED;
            }
            match self.state {
                State::Done => return EngineResult::DONE,
                State::Failed(result) => return result,
                State::Running => {}
            }

            let step = match &mut self.kind {
                Kind::Signature(session) => session.advance(buffers, &mut self.tube),
                Kind::LoadSig(session) => session.advance(buffers),
                Kind::Delta(session) => session.advance(buffers, &mut self.tube),
                Kind::Patch(session) => session.advance(buffers, &mut self.tube),
            };

            match step {
                Step::Continue => {}
                Step::NeedInput => {
                    self.tube.flush(buffers);
                    return EngineResult::BLOCKED;
                }
                Step::Finished => self.state = State::Done,
                Step::Fail(result) => {
                    self.tube.flush(buffers);
                    self.state = State::Failed(result);
                    return result;
                }
            }
        }
    }
}
