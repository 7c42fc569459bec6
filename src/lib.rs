#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! rdelta exposes signature generation, delta generation and patching as
//! pull-style [`std::io::Read`] producers. Each producer wraps one engine
//! session in a [`Job`] that stages bytes between an upstream reader and the
//! caller, so arbitrarily large inputs stream through fixed-size buffers.
//!
//! # Design
//!
//! - [`SignatureGen`] reads a basis and yields its signature.
//!   [`load_signature`] turns a signature stream into an indexed
//!   [`Signature`].
//! - [`DeltaGen`] borrows a [`Signature`] and yields the delta of a new
//!   stream against it.
//! - [`Patcher`] applies a delta to a [`ReadAt`] basis. The engine asks for
//!   basis ranges through a plain function callback; the callback finds its
//!   [`PatchContext`] through a [`HandleRegistry`] selected by a
//!   [`RegistryScope`].
//! - Every failure is an [`Error`]. A job that failed keeps returning the
//!   same error after serving the bytes it produced before failing.
//!
//! # Examples
//!
//! ```
//! let basis = b"the quick brown fox jumps over the lazy dog".repeat(200);
//! let mut new = basis.clone();
//! new.splice(4000..4000, b"a sleepy cat ".iter().copied());
//!
//! let mut delta = Vec::new();
//! rdelta::instant_delta(&basis[..], &new[..], &mut delta).unwrap();
//! assert!(delta.len() < new.len());
//!
//! let mut patched = Vec::new();
//! rdelta::patch(basis, &delta[..], &mut patched).unwrap();
//! assert_eq!(patched, new);
//! ```
//!
//! # See also
//!
//! - [`engine`] for the session engine and the stream formats.
//! - `logging::init_tracing` (feature `subscriber`) to print job events.

mod config;
mod delta;
mod error;
mod helpers;
mod job;
mod patch;
mod read_at;
mod registry;
mod signature;

pub use config::{BufferConfig, DEFAULT_BUFFER_CAPACITY, SignatureConfig};
pub use delta::DeltaGen;
pub use error::Error;
pub use helpers::{create_delta, create_signature, instant_delta, patch};
pub use job::{Job, JobStats, JobStatus};
pub use patch::{PatchContext, Patcher};
pub use read_at::ReadAt;
pub use registry::{HandleRegistry, ProcessRegistry, RegistryScope};
pub use signature::{Signature, SignatureGen, load_signature};

pub use ::signature::{DEFAULT_BLOCK_LEN, DEFAULT_STRONG_LEN};
pub use engine::{CopyCallback, Engine, EngineResult, NativeEngine};
