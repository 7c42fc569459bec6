//! crates/logging/src/tracing_macros.rs
//! Convenience macros for rdelta-specific tracing.
//!
//! These wrap the standard tracing macros with the subsystem targets listed in
//! the crate documentation. Routine events go out at `debug`, per-iteration
//! detail at `trace`.

/// Emit a streaming job trace.
///
/// # Example
/// ```ignore
/// trace_job!(produced = n, "iteration finished");
/// ```
#[macro_export]
macro_rules! trace_job {
    ($($arg:tt)*) => {
        $crate::tracing::trace!(target: "rdelta::job", $($arg)*)
    };
}

/// Emit a job lifecycle event (creation, completion, failure, release).
///
/// # Example
/// ```ignore
/// job_event!(kind = "signature", "job created");
/// ```
#[macro_export]
macro_rules! job_event {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "rdelta::job", $($arg)*)
    };
}

/// Emit a signature generation or loading trace.
///
/// # Example
/// ```ignore
/// trace_signature!(blocks = count, "signature indexed");
/// ```
#[macro_export]
macro_rules! trace_signature {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "rdelta::signature", $($arg)*)
    };
}

/// Emit a delta generation trace.
///
/// # Example
/// ```ignore
/// trace_delta!("delta generator created");
/// ```
#[macro_export]
macro_rules! trace_delta {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "rdelta::delta", $($arg)*)
    };
}

/// Emit a patch application trace.
///
/// # Example
/// ```ignore
/// trace_patch!(id = handle, "patcher registered");
/// ```
#[macro_export]
macro_rules! trace_patch {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "rdelta::patch", $($arg)*)
    };
}

/// Emit a callback bridge trace.
///
/// # Example
/// ```ignore
/// trace_bridge!(offset, len, "basis read");
/// ```
#[macro_export]
macro_rules! trace_bridge {
    ($($arg:tt)*) => {
        $crate::tracing::trace!(target: "rdelta::bridge", $($arg)*)
    };
}

/// Report a fault captured by the callback bridge.
///
/// # Example
/// ```ignore
/// bridge_fault!(error = %err, "basis read failed");
/// ```
#[macro_export]
macro_rules! bridge_fault {
    ($($arg:tt)*) => {
        $crate::tracing::warn!(target: "rdelta::bridge", $($arg)*)
    };
}

/// Emit an engine session trace.
///
/// # Example
/// ```ignore
/// trace_engine!(kind = "delta", "session started");
/// ```
#[macro_export]
macro_rules! trace_engine {
    ($($arg:tt)*) => {
        $crate::tracing::trace!(target: "rdelta::engine", $($arg)*)
    };
}
