#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! Logging glue shared by the rdelta crates. Every event is emitted through
//! [`tracing`] under a target in the `rdelta::` namespace so callers can
//! filter per subsystem:
//!
//! | Target | Emitted by |
//! |---|---|
//! | `rdelta::job` | streaming job lifecycle and iterations |
//! | `rdelta::signature` | signature generation and loading |
//! | `rdelta::delta` | delta generation |
//! | `rdelta::patch` | patch application |
//! | `rdelta::bridge` | basis-read callbacks and the handle registry |
//! | `rdelta::engine` | engine sessions |
//!
//! The crate installs nothing by default. Binaries and tests that want output
//! enable the `subscriber` feature and call `init_tracing`.
//!
//! # Examples
//!
//! ```
//! use logging::{Verbosity, trace_job};
//!
//! trace_job!(bytes = 16, "pulled input chunk");
//! assert_eq!(Verbosity::from_level(2).directive(), "warn,rdelta=debug");
//! ```

mod tracing_macros;
mod verbosity;

#[cfg(feature = "subscriber")]
mod init;

#[cfg(feature = "subscriber")]
pub use init::{init_tracing, init_tracing_with_filter};
pub use verbosity::Verbosity;

#[doc(hidden)]
pub use tracing;
