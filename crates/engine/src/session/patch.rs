//! crates/engine/src/session/patch.rs
//!
//! Applies a delta stream, fetching copied ranges through a callback.

use super::Step;
use crate::buffers::Buffers;
use crate::callback::CopyCallback;
use crate::format::{self, Command, DELTA_MAGIC};
use crate::result::EngineResult;
use crate::tube::Tube;

/// Largest range requested from the callback or passed through per step.
const MAX_CHUNK: usize = 64 * 1024;

#[derive(Clone, Copy, Debug)]
enum PatchState {
    Header,
    Command,
    Literal(u64),
    Copy { pos: u64, remaining: u64 },
}

#[derive(Debug)]
pub(crate) struct PatchSession {
    callback: CopyCallback,
    opaque: usize,
    state: PatchState,
    scratch: Vec<u8>,
}

fn chunk_len(remaining: u64) -> usize {
    usize::try_from(remaining).map_or(MAX_CHUNK, |remaining| remaining.min(MAX_CHUNK))
}

impl PatchSession {
    pub(crate) fn new(callback: CopyCallback, opaque: usize) -> Self {
        Self {
            callback,
            opaque,
            state: PatchState::Header,
            scratch: Vec::with_capacity(17),
        }
    }

    pub(crate) fn advance(&mut self, buffers: &mut Buffers<'_>, tube: &mut Tube) -> Step {
        match self.state {
            PatchState::Header => {
                if !self.fill(buffers, 4) {
                    return starved(buffers);
                }
                let magic = u32::from_be_bytes([
                    self.scratch[0],
                    self.scratch[1],
                    self.scratch[2],
                    self.scratch[3],
                ]);
                if magic != DELTA_MAGIC {
                    return Step::Fail(EngineResult::BAD_MAGIC);
                }
                self.scratch.clear();
                self.state = PatchState::Command;
                Step::Continue
            }
            PatchState::Command => self.read_command(buffers),
            PatchState::Literal(0) | PatchState::Copy { remaining: 0, .. } => {
                self.state = PatchState::Command;
                Step::Continue
            }
            PatchState::Literal(remaining) => {
                let input = buffers.available();
                if input.is_empty() {
                    return starved(buffers);
                }
                let take = input.len().min(chunk_len(remaining));
                tube.push(&input[..take]);
                buffers.consume(take);
                self.state = PatchState::Literal(remaining - take as u64);
                Step::Continue
            }
            PatchState::Copy { pos, remaining } => self.copy(pos, remaining, tube),
        }
    }

    fn read_command(&mut self, buffers: &mut Buffers<'_>) -> Step {
        if !self.fill(buffers, 1) {
            return starved(buffers);
        }
        let op = self.scratch[0];
        let Some(params) = format::param_len(op) else {
            return Step::Fail(EngineResult::CORRUPT);
        };
        if !self.fill(buffers, 1 + params) {
            return starved(buffers);
        }
        let Some(command) = format::decode_command(op, &self.scratch[1..]) else {
            return Step::Fail(EngineResult::CORRUPT);
        };
        self.scratch.clear();

        match command {
            Command::End => return Step::Finished,
            Command::Literal(len) => self.state = PatchState::Literal(len),
            Command::Copy { offset, len } => {
                if offset.checked_add(len).is_none() {
                    return Step::Fail(EngineResult::CORRUPT);
                }
                self.state = PatchState::Copy { pos: offset, remaining: len };
            }
        }
        Step::Continue
    }

    fn copy(&mut self, pos: u64, remaining: u64, tube: &mut Tube) -> Step {
        let requested = chunk_len(remaining);
        let mut len = requested;
        let out = tube.tail();
        let before = out.len();

        let result = (self.callback)(self.opaque, pos, &mut len, out);
        if result != EngineResult::DONE {
            out.truncate(before);
            return Step::Fail(result);
        }
        if len == 0 || len > requested || out.len() != before + len {
            out.truncate(before);
            return Step::Fail(EngineResult::INTERNAL_ERROR);
        }

        self.state = PatchState::Copy {
            pos: pos + len as u64,
            remaining: remaining - len as u64,
        };
        Step::Continue
    }

    /// Tops the scratch buffer up to `need` bytes; `false` means input ran dry.
    fn fill(&mut self, buffers: &mut Buffers<'_>, need: usize) -> bool {
        let input = buffers.available();
        let take = need.saturating_sub(self.scratch.len()).min(input.len());
        self.scratch.extend_from_slice(&input[..take]);
        buffers.consume(take);
        self.scratch.len() >= need
    }
}

fn starved(buffers: &Buffers<'_>) -> Step {
    if buffers.eof_in() {
        Step::Fail(EngineResult::INPUT_ENDED)
    } else {
        Step::NeedInput
    }
}
