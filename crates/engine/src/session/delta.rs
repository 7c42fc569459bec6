//! crates/engine/src/session/delta.rs
//!
//! Rolling search of the input against a signature index.

use std::sync::Arc;

use checksums::RollingChecksum;
use signature::{SignatureBlock, SignatureIndex};

use super::Step;
use crate::buffers::Buffers;
use crate::format::{self, DELTA_MAGIC, OP_END};
use crate::result::EngineResult;
use crate::tube::Tube;

/// Longest literal emitted as a single command.
const MAX_LITERAL: usize = 32 * 1024;

#[derive(Clone, Copy, Debug)]
struct PendingCopy {
    offset: u64,
    len: u64,
}

/// Delta search state.
///
/// `scoop[pos..]` holds input not yet described by a command. The rolling
/// checksum covers the window starting at `pos` whenever its length equals
/// the current window length; otherwise it is recomputed from scratch.
#[derive(Debug)]
pub(crate) struct DeltaSession {
    index: Arc<SignatureIndex>,
    started: bool,
    scoop: Vec<u8>,
    pos: usize,
    rolling: RollingChecksum,
    literal: Vec<u8>,
    copy: Option<PendingCopy>,
}

impl DeltaSession {
    pub(crate) fn new(index: Arc<SignatureIndex>) -> Self {
        Self {
            index,
            started: false,
            scoop: Vec::new(),
            pos: 0,
            rolling: RollingChecksum::new(),
            literal: Vec::new(),
            copy: None,
        }
    }

    pub(crate) fn advance(&mut self, buffers: &mut Buffers<'_>, tube: &mut Tube) -> Step {
        if !self.started {
            self.started = true;
            tube.push(&DELTA_MAGIC.to_be_bytes());
            return Step::Continue;
        }

        let input = buffers.available();
        if !input.is_empty() {
            self.scoop.drain(..self.pos);
            self.pos = 0;
            self.scoop.extend_from_slice(input);
            buffers.consume(input.len());
        }

        let eof = buffers.eof_in();
        let avail = self.scoop.len() - self.pos;
        if avail == 0 {
            if !eof {
                return Step::NeedInput;
            }
            self.flush_literal(tube);
            self.flush_copy(tube);
            tube.push_byte(OP_END);
            return Step::Finished;
        }

        if self.index.is_empty() {
            let take = avail.min(MAX_LITERAL - self.literal.len());
            self.literal.extend_from_slice(&self.scoop[self.pos..self.pos + take]);
            self.pos += take;
            if self.literal.len() >= MAX_LITERAL {
                self.flush_literal(tube);
            }
            return Step::Continue;
        }

        let block_len = self.index.block_length();
        if avail < block_len && !eof {
            return Step::NeedInput;
        }
        self.search(avail.min(block_len), eof, tube)
    }

    fn search(&mut self, window_len: usize, eof: bool, tube: &mut Tube) -> Step {
        let start = self.pos;
        if self.rolling.len() != window_len {
            self.rolling.reset();
            self.rolling.update(&self.scoop[start..start + window_len]);
        }

        let block_len = self.index.block_length() as u64;
        let preferred = self.copy.and_then(|copy| {
            let end = copy.offset + copy.len;
            (end % block_len == 0).then_some(end / block_len)
        });
        let matched = self
            .index
            .find_match(self.rolling.value(), &self.scoop[start..start + window_len], preferred)
            .map(SignatureBlock::index);

        if let Some(block) = matched {
            self.flush_literal(tube);
            self.push_copy(block * block_len, window_len as u64, tube);
            self.pos += window_len;
            self.rolling.reset();
            return Step::Continue;
        }

        self.flush_copy(tube);
        let outgoing = self.scoop[start];
        self.literal.push(outgoing);
        if self.literal.len() >= MAX_LITERAL {
            self.flush_literal(tube);
        }

        let next = start + window_len;
        let rolled = if next < self.scoop.len() {
            self.rolling.roll(outgoing, self.scoop[next])
        } else if eof {
            self.rolling.rotate_out(outgoing)
        } else {
            self.rolling.reset();
            Ok(())
        };
        self.pos += 1;

        match rolled {
            Ok(()) => Step::Continue,
            Err(_) => Step::Fail(EngineResult::INTERNAL_ERROR),
        }
    }

    fn push_copy(&mut self, offset: u64, len: u64, tube: &mut Tube) {
        if let Some(copy) = self.copy.as_mut() {
            if copy.offset + copy.len == offset {
                copy.len += len;
                return;
            }
        }
        self.flush_copy(tube);
        self.copy = Some(PendingCopy { offset, len });
    }

    fn flush_copy(&mut self, tube: &mut Tube) {
        if let Some(copy) = self.copy.take() {
            format::encode_copy(copy.offset, copy.len, tube.tail());
        }
    }

    fn flush_literal(&mut self, tube: &mut Tube) {
        if self.literal.is_empty() {
            return;
        }
        format::encode_literal(self.literal.len() as u64, tube.tail());
        tube.push(&self.literal);
        self.literal.clear();
    }
}
