//! src/error.rs
//!
//! Error vocabulary shared by every reader in the crate.

use std::io;
use std::sync::Arc;

use engine::EngineResult;
use thiserror::Error;

/// Errors reported by signature, delta and patch readers.
///
/// Errors are `Clone` so a failed job can report the same error on every
/// later read.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The engine needed more bytes and its source is exhausted.
    #[error("input ended before the stream was complete")]
    InputEnded,
    /// The stream header is not a recognised magic number.
    #[error("stream does not start with a recognised magic number")]
    BadMagic,
    /// The stream violates its own structure.
    #[error("stream is corrupt")]
    Corrupt,
    /// The engine detected a violation of its own invariants.
    #[error("engine internal error")]
    Internal,
    /// The engine returned a status this crate does not map.
    #[error("unexpected engine result {0}")]
    UnexpectedEngineResult(i32),
    /// An upstream source, basis or sink failed.
    #[error("I/O error: {0}")]
    Io(#[source] Arc<io::Error>),
    /// Resources could not be set up before a session started.
    #[error("could not set up an engine session")]
    AllocationFailure,
}

impl Error {
    /// Maps an engine status to an error.
    ///
    /// Only meaningful for failure statuses; non-failure codes end up in
    /// [`Error::UnexpectedEngineResult`].
    #[must_use]
    pub fn from_result(result: EngineResult) -> Self {
        match result {
            EngineResult::INPUT_ENDED => Self::InputEnded,
            EngineResult::BAD_MAGIC => Self::BadMagic,
            EngineResult::CORRUPT => Self::Corrupt,
            EngineResult::INTERNAL_ERROR => Self::Internal,
            other => Self::UnexpectedEngineResult(other.code()),
        }
    }

    /// Converts an I/O error, unwrapping an [`Error`] carried inside it.
    ///
    /// The [`io::Read`] implementations of this crate wrap their typed error
    /// in an [`io::Error`]; this recovers it.
    #[must_use]
    pub fn from_io(err: io::Error) -> Self {
        if err.get_ref().is_some_and(|inner| inner.is::<Self>()) {
            if let Some(inner) = err.into_inner() {
                if let Ok(typed) = inner.downcast::<Self>() {
                    return *typed;
                }
            }
            return Self::Internal;
        }
        Self::Io(Arc::new(err))
    }

    /// Returns the closest [`io::ErrorKind`].
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::InputEnded => io::ErrorKind::UnexpectedEof,
            Self::BadMagic | Self::Corrupt => io::ErrorKind::InvalidData,
            Self::Internal | Self::UnexpectedEngineResult(_) => io::ErrorKind::Other,
            Self::Io(err) => err.kind(),
            Self::AllocationFailure => io::ErrorKind::OutOfMemory,
        }
    }

    /// Reports whether this is an I/O failure of a source, basis or sink.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::from_io(err)
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        Self::new(err.kind(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_codes_map_to_kinds() {
        assert!(matches!(Error::from_result(EngineResult::INPUT_ENDED), Error::InputEnded));
        assert!(matches!(Error::from_result(EngineResult::BAD_MAGIC), Error::BadMagic));
        assert!(matches!(Error::from_result(EngineResult::CORRUPT), Error::Corrupt));
        assert!(matches!(Error::from_result(EngineResult::INTERNAL_ERROR), Error::Internal));
        assert!(matches!(
            Error::from_result(EngineResult::PARAM_ERROR),
            Error::UnexpectedEngineResult(108)
        ));
        assert!(matches!(
            Error::from_result(EngineResult::from_raw(-3)),
            Error::UnexpectedEngineResult(-3)
        ));
    }

    #[test]
    fn typed_error_survives_io_round_trip() {
        let io_err: io::Error = Error::Corrupt.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
        assert!(matches!(Error::from_io(io_err), Error::Corrupt));
    }

    #[test]
    fn plain_io_error_is_wrapped() {
        let err = Error::from_io(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert!(err.is_io());
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn clones_share_the_io_error() {
        let err = Error::from_io(io::Error::other("disk on fire"));
        let clone = err.clone();
        match (err, clone) {
            (Error::Io(a), Error::Io(b)) => assert!(Arc::ptr_eq(&a, &b)),
            _ => unreachable!(),
        }
    }
}
