//! crates/engine/src/result.rs
//!
//! Engine status codes.

use core::fmt;

/// Status reported by every engine entry point.
///
/// A transparent wrapper over the raw integer so codes the binding layer
/// does not know about survive the round trip unchanged.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct EngineResult(i32);

impl EngineResult {
    /// The session completed and all output has been produced.
    pub const DONE: Self = Self(0);
    /// The session needs more input or more output room.
    pub const BLOCKED: Self = Self(1);
    /// The session is still working.
    pub const RUNNING: Self = Self(2);
    /// An I/O operation failed.
    pub const IO_ERROR: Self = Self(100);
    /// Command line syntax error.
    pub const SYNTAX_ERROR: Self = Self(101);
    /// Out of memory.
    pub const MEM_ERROR: Self = Self(102);
    /// Input ended before the stream was complete.
    pub const INPUT_ENDED: Self = Self(103);
    /// The stream did not start with a recognised magic number.
    pub const BAD_MAGIC: Self = Self(104);
    /// A feature the engine does not implement was requested.
    pub const UNIMPLEMENTED: Self = Self(105);
    /// The stream is structurally invalid.
    pub const CORRUPT: Self = Self(106);
    /// An engine invariant was violated.
    pub const INTERNAL_ERROR: Self = Self(107);
    /// A parameter was out of range or used in the wrong state.
    pub const PARAM_ERROR: Self = Self(108);

    /// Wraps a raw status code.
    #[must_use]
    pub const fn from_raw(code: i32) -> Self {
        Self(code)
    }

    /// Returns the raw status code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Reports whether the code is one of the non-error statuses.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self.0, 0..=2)
    }

    /// Returns the symbolic name of a known code.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        Some(match self.0 {
            0 => "DONE",
            1 => "BLOCKED",
            2 => "RUNNING",
            100 => "IO_ERROR",
            101 => "SYNTAX_ERROR",
            102 => "MEM_ERROR",
            103 => "INPUT_ENDED",
            104 => "BAD_MAGIC",
            105 => "UNIMPLEMENTED",
            106 => "CORRUPT",
            107 => "INTERNAL_ERROR",
            108 => "PARAM_ERROR",
            _ => return None,
        })
    }

    const fn describe(self) -> &'static str {
        match self.0 {
            0 => "OK",
            1 => "blocked waiting for input or output buffers",
            2 => "still running",
            100 => "IO error",
            101 => "bad command line syntax",
            102 => "out of memory",
            103 => "unexpected end of input",
            104 => "bad magic number at start of stream",
            105 => "unimplemented case",
            106 => "stream corrupt",
            107 => "library internal error",
            108 => "invalid parameter",
            _ => "unexplained problem",
        }
    }
}

impl fmt::Debug for EngineResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "EngineResult({})", self.0),
        }
    }
}

impl fmt::Display for EngineResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.describe(), self.0)
    }
}

impl From<EngineResult> for i32 {
    fn from(result: EngineResult) -> Self {
        result.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_have_names() {
        assert_eq!(EngineResult::DONE.name(), Some("DONE"));
        assert_eq!(EngineResult::PARAM_ERROR.name(), Some("PARAM_ERROR"));
        assert_eq!(EngineResult::from_raw(42).name(), None);
    }

    #[test]
    fn unknown_codes_keep_their_value() {
        let result = EngineResult::from_raw(-7);
        assert_eq!(result.code(), -7);
        assert_eq!(format!("{result:?}"), "EngineResult(-7)");
        assert!(!result.is_ok());
    }

    #[test]
    fn display_mentions_the_code() {
        assert_eq!(EngineResult::CORRUPT.to_string(), "stream corrupt (106)");
    }
}
