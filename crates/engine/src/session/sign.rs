//! crates/engine/src/session/sign.rs
//!
//! Emits the signature of the input stream.

use signature::{SignatureLayout, block_sums};

use super::Step;
use crate::buffers::Buffers;
use crate::format;
use crate::tube::Tube;

#[derive(Debug)]
pub(crate) struct SignatureSession {
    layout: SignatureLayout,
    started: bool,
    block: Vec<u8>,
}

impl SignatureSession {
    pub(crate) fn new(layout: SignatureLayout) -> Self {
        Self {
            layout,
            started: false,
            block: Vec::with_capacity(layout.block_length().get() as usize),
        }
    }

    pub(crate) fn advance(&mut self, buffers: &mut Buffers<'_>, tube: &mut Tube) -> Step {
        if !self.started {
            self.started = true;
            tube.push(&format::signature_magic(self.layout.algorithm()).to_be_bytes());
            tube.push(&self.layout.block_length().get().to_be_bytes());
            tube.push(&(self.layout.strong_len() as u32).to_be_bytes());
            return Step::Continue;
        }

        let block_len = self.layout.block_length().get() as usize;
        let input = buffers.available();
        let take = (block_len - self.block.len()).min(input.len());
        self.block.extend_from_slice(&input[..take]);
        buffers.consume(take);

        if self.block.len() == block_len {
            self.emit_block(tube);
            return Step::Continue;
        }
        if buffers.eof_in() {
            if !self.block.is_empty() {
                self.emit_block(tube);
            }
            return Step::Finished;
        }
        Step::NeedInput
    }

    fn emit_block(&mut self, tube: &mut Tube) {
        let (weak, strong) = block_sums(self.layout, &self.block);
        tube.push(&weak.to_be_bytes());
        tube.push(&strong);
        self.block.clear();
    }
}
