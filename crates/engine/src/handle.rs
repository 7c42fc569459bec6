//! crates/engine/src/handle.rs
//!
//! Shared handle to a signature being loaded and then indexed.

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use signature::{FileSignature, SignatureIndex};

use crate::result::EngineResult;

/// Handle to a signature filled by a loadsig session.
///
/// The handle moves through two states. While loading, the session appends
/// blocks and hands the finished [`FileSignature`] over when the stream ends.
/// [`build`](Self::build) then turns it into a [`SignatureIndex`] exactly
/// once; from there on the handle is read-only and can be cloned into any
/// number of delta sessions.
#[derive(Clone, Debug, Default)]
pub struct SignatureHandle {
    inner: Arc<HandleInner>,
}

#[derive(Debug, Default)]
struct HandleInner {
    loaded: Mutex<Option<FileSignature>>,
    index: OnceLock<Arc<SignatureIndex>>,
}

impl SignatureHandle {
    /// Creates an empty handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn store(&self, signature: FileSignature) {
        *self.inner.loaded.lock() = Some(signature);
    }

    /// Reports whether a complete signature is waiting to be indexed.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.loaded.lock().is_some()
    }

    /// Reports whether [`build`](Self::build) has completed.
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.inner.index.get().is_some()
    }

    /// Builds the lookup index from the loaded signature.
    ///
    /// Returns [`EngineResult::PARAM_ERROR`] when loading has not finished
    /// or the index was already built.
    pub fn build(&self) -> EngineResult {
        let Some(signature) = self.inner.loaded.lock().take() else {
            return EngineResult::PARAM_ERROR;
        };
        let index = Arc::new(SignatureIndex::build(signature));
        match self.inner.index.set(index) {
            Ok(()) => EngineResult::DONE,
            Err(_) => EngineResult::PARAM_ERROR,
        }
    }

    /// Returns the built index.
    #[must_use]
    pub fn index(&self) -> Option<&Arc<SignatureIndex>> {
        self.inner.index.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signature::{SignatureAlgorithm, SignatureParams};

    fn signature() -> FileSignature {
        let layout = SignatureParams::new(16, 8, SignatureAlgorithm::Md4).resolve().unwrap();
        let mut signature = FileSignature::new(layout);
        signature.push(7, vec![0; 8]);
        signature
    }

    #[test]
    fn build_before_load_is_rejected() {
        let handle = SignatureHandle::new();
        assert_eq!(handle.build(), EngineResult::PARAM_ERROR);
        assert!(handle.index().is_none());
    }

    #[test]
    fn build_succeeds_once() {
        let handle = SignatureHandle::new();
        handle.store(signature());
        assert!(handle.is_loaded());

        assert_eq!(handle.build(), EngineResult::DONE);
        assert!(handle.is_indexed());
        assert!(!handle.is_loaded());
        assert_eq!(handle.index().map(|index| index.len()), Some(1));

        assert_eq!(handle.build(), EngineResult::PARAM_ERROR);
    }

    #[test]
    fn clones_share_state() {
        let handle = SignatureHandle::new();
        let other = handle.clone();
        handle.store(signature());
        assert_eq!(other.build(), EngineResult::DONE);
        assert!(handle.is_indexed());
    }
}
