#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! In-memory signature model for the rdelta engine. A signature describes a
//! basis file as a sequence of fixed-length blocks, each summarised by a weak
//! rolling checksum and a truncated strong digest.
//!
//! # Design
//!
//! - [`SignatureParams`] holds what a caller asked for; zero fields mean
//!   "use the default". [`SignatureParams::resolve`] turns it into a
//!   [`SignatureLayout`] once, and everything downstream only sees resolved
//!   values.
//! - [`FileSignature`] collects [`SignatureBlock`]s, either computed from data
//!   with [`generate_file_signature`] or appended one by one while a
//!   serialized signature is parsed.
//! - [`SignatureIndex`] is built once from a finished [`FileSignature`] and is
//!   read-only afterwards, so it can be shared between threads.
//!
//! # Examples
//!
//! ```
//! use signature::{SignatureIndex, SignatureParams, generate_file_signature};
//!
//! let basis = vec![7u8; 10_000];
//! let layout = SignatureParams::default().resolve().unwrap();
//! let signature = generate_file_signature(&basis[..], layout).unwrap();
//! let index = SignatureIndex::build(signature);
//!
//! assert_eq!(index.block_length(), 2048);
//! assert_eq!(index.len(), 5);
//! ```

mod algorithm;
mod block;
mod file;
mod generation;
mod index;
mod layout;

pub use algorithm::SignatureAlgorithm;
pub use block::SignatureBlock;
pub use file::FileSignature;
pub use generation::{SignatureError, block_sums, generate_file_signature};
pub use index::SignatureIndex;
pub use layout::{DEFAULT_BLOCK_LEN, DEFAULT_STRONG_LEN, SignatureLayout, SignatureParams};
