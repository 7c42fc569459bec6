//! crates/engine/src/session/loadsig.rs
//!
//! Parses a signature stream into a [`SignatureHandle`].

use logging::trace_engine;
use signature::{FileSignature, SignatureLayout};

use super::Step;
use crate::buffers::Buffers;
use crate::format::{self, SIGNATURE_HEADER_LEN};
use crate::handle::SignatureHandle;
use crate::result::EngineResult;

#[derive(Debug)]
pub(crate) struct LoadSigSession {
    handle: SignatureHandle,
    signature: Option<FileSignature>,
    record: Vec<u8>,
}

impl LoadSigSession {
    pub(crate) fn new(handle: SignatureHandle) -> Self {
        Self {
            handle,
            signature: None,
            record: Vec::with_capacity(SIGNATURE_HEADER_LEN),
        }
    }

    pub(crate) fn advance(&mut self, buffers: &mut Buffers<'_>) -> Step {
        let need = self
            .signature
            .as_ref()
            .map_or(SIGNATURE_HEADER_LEN, |signature| signature.layout().block_entry_len());

        let input = buffers.available();
        let take = (need - self.record.len()).min(input.len());
        self.record.extend_from_slice(&input[..take]);
        buffers.consume(take);

        if self.record.len() < need {
            if !buffers.eof_in() {
                return Step::NeedInput;
            }
            // only a clean record boundary after the header ends the stream
            return match self.signature.take() {
                Some(signature) if self.record.is_empty() => {
                    trace_engine!(blocks = signature.blocks().len(), "signature loaded");
                    self.handle.store(signature);
                    Step::Finished
                }
                _ => Step::Fail(EngineResult::INPUT_ENDED),
            };
        }

        match self.signature.as_mut() {
            None => match parse_header(&self.record) {
                Ok(signature) => self.signature = Some(signature),
                Err(result) => return Step::Fail(result),
            },
            Some(signature) => {
                let weak = be_u32(&self.record, 0);
                signature.push(weak, self.record[4..].to_vec());
            }
        }
        self.record.clear();
        Step::Continue
    }
}

fn be_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn parse_header(header: &[u8]) -> Result<FileSignature, EngineResult> {
    let algorithm = format::algorithm_for_magic(be_u32(header, 0)).ok_or(EngineResult::BAD_MAGIC)?;
    let layout = SignatureLayout::from_raw_parts(be_u32(header, 4), be_u32(header, 8), algorithm)
        .map_err(|_| EngineResult::CORRUPT)?;
    Ok(FileSignature::new(layout))
}
