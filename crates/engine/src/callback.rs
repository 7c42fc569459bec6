//! crates/engine/src/callback.rs
//!
//! Basis read callback used by patch sessions.

use crate::result::EngineResult;

/// Callback a patch session invokes to fetch basis bytes.
///
/// The engine passes the opaque context given to
/// [`begin_patch`](crate::Engine::begin_patch), the basis offset, and in
/// `len` the number of bytes it wants. The callback appends at most that many
/// bytes to `out`, stores the number actually appended in `len`, and returns
/// [`EngineResult::DONE`]. Appending fewer bytes than requested is allowed as
/// long as at least one byte is appended.
///
/// Any other return value aborts the session with that status. The callback
/// carries no lifetime, so whatever `opaque` refers to has to be resolved by
/// the callee on every call.
pub type CopyCallback = fn(opaque: usize, pos: u64, len: &mut usize, out: &mut Vec<u8>) -> EngineResult;
