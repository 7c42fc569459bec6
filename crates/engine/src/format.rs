//! crates/engine/src/format.rs
//!
//! Byte layout of signature and delta streams.
//!
//! All integers are big-endian. A signature stream is a 12 byte header
//! (magic, block length, strong length) followed by one weak sum and one
//! truncated strong digest per block. A delta stream is a magic number
//! followed by commands:
//!
//! | Opcode | Meaning | Parameters |
//! |---|---|---|
//! | `0x00` | end of stream | none |
//! | `0x01..=0x40` | literal of `opcode` bytes | none |
//! | `0x41..=0x44` | literal | length in 1, 2, 4 or 8 bytes |
//! | `0x45..=0x54` | copy from basis | offset then length, each 1, 2, 4 or 8 bytes |
//!
//! Copy opcodes enumerate offset widths in the outer position and length
//! widths in the inner position, so `0x45` is a 1 byte offset with a 1 byte
//! length and `0x54` is an 8 byte offset with an 8 byte length.

use signature::SignatureAlgorithm;

/// Magic number opening a delta stream.
pub const DELTA_MAGIC: u32 = 0x7273_0236;
/// Magic number of signatures using MD4 strong sums.
pub const MD4_SIG_MAGIC: u32 = 0x7273_0136;
/// Magic number of signatures using BLAKE3 strong sums.
pub const BLAKE3_SIG_MAGIC: u32 = 0x7273_0137;
/// Length of the signature header.
pub const SIGNATURE_HEADER_LEN: usize = 12;

/// End-of-stream opcode.
pub const OP_END: u8 = 0x00;
const OP_LITERAL_N1: u8 = 0x41;
const OP_COPY_N1_N1: u8 = 0x45;
const OP_LAST: u8 = 0x54;
const MAX_IMMEDIATE_LITERAL: u64 = 0x40;

/// Returns the magic number for signatures built with `algorithm`.
#[must_use]
pub const fn signature_magic(algorithm: SignatureAlgorithm) -> u32 {
    match algorithm {
        SignatureAlgorithm::Md4 => MD4_SIG_MAGIC,
        SignatureAlgorithm::Blake3 => BLAKE3_SIG_MAGIC,
    }
}

/// Maps a signature magic number back to its algorithm.
#[must_use]
pub const fn algorithm_for_magic(magic: u32) -> Option<SignatureAlgorithm> {
    match magic {
        MD4_SIG_MAGIC => Some(SignatureAlgorithm::Md4),
        BLAKE3_SIG_MAGIC => Some(SignatureAlgorithm::Blake3),
        _ => None,
    }
}

/// One decoded delta command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    /// End of the delta stream.
    End,
    /// The next `len` bytes of the stream are output verbatim.
    Literal(u64),
    /// `len` bytes are read from the basis starting at `offset`.
    Copy {
        /// Basis offset.
        offset: u64,
        /// Number of bytes.
        len: u64,
    },
}

const fn width(index: u8) -> usize {
    1 << index
}

const fn width_index(value: u64) -> u8 {
    if value <= 0xff {
        0
    } else if value <= 0xffff {
        1
    } else if value <= 0xffff_ffff {
        2
    } else {
        3
    }
}

fn put_be(value: u64, width: usize, out: &mut Vec<u8>) {
    out.extend_from_slice(&value.to_be_bytes()[8 - width..]);
}

fn read_be(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Returns how many parameter bytes follow `op`, or `None` for an unknown opcode.
#[must_use]
pub const fn param_len(op: u8) -> Option<usize> {
    match op {
        OP_END..=0x40 => Some(0),
        OP_LITERAL_N1..=0x44 => Some(width(op - OP_LITERAL_N1)),
        OP_COPY_N1_N1..=OP_LAST => {
            let rel = op - OP_COPY_N1_N1;
            Some(width(rel / 4) + width(rel % 4))
        }
        _ => None,
    }
}

/// Decodes a command from its opcode and exactly [`param_len`] parameter bytes.
///
/// Returns `None` for an unknown opcode or a parameter slice of the wrong size.
#[must_use]
pub fn decode_command(op: u8, params: &[u8]) -> Option<Command> {
    if param_len(op)? != params.len() {
        return None;
    }
    Some(match op {
        OP_END => Command::End,
        0x01..=0x40 => Command::Literal(u64::from(op)),
        OP_LITERAL_N1..=0x44 => Command::Literal(read_be(params)),
        _ => {
            let offset_width = width((op - OP_COPY_N1_N1) / 4);
            let (offset, len) = params.split_at(offset_width);
            Command::Copy {
                offset: read_be(offset),
                len: read_be(len),
            }
        }
    })
}

/// Appends the command header for a literal of `len` bytes.
///
/// The literal data itself is written by the caller.
pub fn encode_literal(len: u64, out: &mut Vec<u8>) {
    if (1..=MAX_IMMEDIATE_LITERAL).contains(&len) {
        out.push(len as u8);
        return;
    }
    let index = width_index(len);
    out.push(OP_LITERAL_N1 + index);
    put_be(len, width(index), out);
}

/// Appends a copy command.
pub fn encode_copy(offset: u64, len: u64, out: &mut Vec<u8>) {
    let offset_index = width_index(offset);
    let len_index = width_index(len);
    out.push(OP_COPY_N1_N1 + offset_index * 4 + len_index);
    put_be(offset, width(offset_index), out);
    put_be(len, width(len_index), out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_literals_use_immediate_opcodes() {
        let mut out = Vec::new();
        encode_literal(64, &mut out);
        assert_eq!(out, [0x40]);

        out.clear();
        encode_literal(65, &mut out);
        assert_eq!(out, [0x41, 65]);

        out.clear();
        encode_literal(70_000, &mut out);
        assert_eq!(out, [0x43, 0x00, 0x01, 0x11, 0x70]);
    }

    #[test]
    fn copy_opcode_encodes_both_widths() {
        let mut out = Vec::new();
        encode_copy(0, 2048, &mut out);
        assert_eq!(out, [0x46, 0x00, 0x08, 0x00]);

        out.clear();
        encode_copy(1 << 40, 1, &mut out);
        assert_eq!(out[0], 0x45 + 12);
        assert_eq!(out.len(), 1 + 8 + 1);
    }

    #[test]
    fn param_lengths_follow_the_opcode_table() {
        assert_eq!(param_len(OP_END), Some(0));
        assert_eq!(param_len(0x20), Some(0));
        assert_eq!(param_len(0x44), Some(8));
        assert_eq!(param_len(0x45), Some(2));
        assert_eq!(param_len(0x54), Some(16));
        assert_eq!(param_len(0x55), None);
        assert_eq!(param_len(0xff), None);
    }

    #[test]
    fn encoded_copy_decodes_to_the_same_command() {
        let mut out = Vec::new();
        encode_copy(300_000, 4096, &mut out);
        let command = decode_command(out[0], &out[1..]).unwrap();
        assert_eq!(command, Command::Copy { offset: 300_000, len: 4096 });
    }

    #[test]
    fn decode_rejects_wrong_parameter_size() {
        assert_eq!(decode_command(0x41, &[]), None);
        assert_eq!(decode_command(0x10, &[]), Some(Command::Literal(16)));
    }

    #[test]
    fn magic_maps_to_algorithm() {
        assert_eq!(algorithm_for_magic(MD4_SIG_MAGIC), Some(SignatureAlgorithm::Md4));
        assert_eq!(algorithm_for_magic(BLAKE3_SIG_MAGIC), Some(SignatureAlgorithm::Blake3));
        assert_eq!(algorithm_for_magic(DELTA_MAGIC), None);
        assert_eq!(signature_magic(SignatureAlgorithm::Blake3), BLAKE3_SIG_MAGIC);
    }
}
