//! src/registry.rs
//!
//! Maps the integer context of engine callbacks back to live patchers.
//!
//! The engine's copy callback is a plain function pointer that receives only
//! an integer. Each patcher registers its [`PatchContext`] here before its
//! session starts, using the context's heap address as the integer, and the
//! callback looks the context up again on every invocation.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use logging::trace_bridge;
use parking_lot::Mutex;

use crate::patch::PatchContext;

/// Lock-protected table of registered patch contexts.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    entries: Mutex<BTreeMap<usize, Arc<PatchContext>>>,
}

impl HandleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Registers `context` and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the same context is already registered.
    pub fn register(&self, context: Arc<PatchContext>) -> usize {
        let id = Arc::as_ptr(&context) as usize;
        let mut entries = self.entries.lock();
        assert!(!entries.contains_key(&id), "patch context {id:#x} registered twice");
        entries.insert(id, context);
        trace_bridge!(id, live = entries.len(), "context registered");
        id
    }

    /// Removes the context registered under `id`.
    ///
    /// # Panics
    ///
    /// Panics if nothing is registered under `id`.
    pub fn deregister(&self, id: usize) {
        let mut entries = self.entries.lock();
        assert!(entries.remove(&id).is_some(), "patch context {id:#x} is not registered");
        trace_bridge!(id, live = entries.len(), "context deregistered");
    }

    /// Returns the context registered under `id`.
    #[must_use]
    pub fn lookup(&self, id: usize) -> Option<Arc<PatchContext>> {
        self.entries.lock().get(&id).cloned()
    }

    /// Reports whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: usize) -> bool {
        self.entries.lock().contains_key(&id)
    }

    /// Returns the number of registered contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Reports whether no context is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Selects the registry a patcher and its callback use.
///
/// The callback is monomorphised per scope, so the registry has to be
/// reachable without any runtime context.
pub trait RegistryScope: 'static {
    /// Returns the scope's registry.
    fn registry() -> &'static HandleRegistry;
}

static PROCESS_REGISTRY: HandleRegistry = HandleRegistry::new();

/// The process-wide registry used by default.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRegistry;

impl RegistryScope for ProcessRegistry {
    fn registry() -> &'static HandleRegistry {
        &PROCESS_REGISTRY
    }
}

/// Registry entry owned by a patcher; deregisters on drop.
#[derive(Debug)]
pub(crate) struct Registration<S: RegistryScope> {
    id: usize,
    _scope: PhantomData<fn() -> S>,
}

impl<S: RegistryScope> Registration<S> {
    pub(crate) fn new(context: Arc<PatchContext>) -> Self {
        Self {
            id: S::registry().register(context),
            _scope: PhantomData,
        }
    }

    pub(crate) const fn id(&self) -> usize {
        self.id
    }
}

impl<S: RegistryScope> Drop for Registration<S> {
    fn drop(&mut self) {
        S::registry().deregister(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Arc<PatchContext> {
        Arc::new(PatchContext::new(Vec::new()))
    }

    #[test]
    fn id_is_the_context_address() {
        let registry = HandleRegistry::new();
        let ctx = context();
        let id = registry.register(Arc::clone(&ctx));
        assert_eq!(id, Arc::as_ptr(&ctx) as usize);
        assert!(registry.contains(id));
        assert!(Arc::ptr_eq(&registry.lookup(id).unwrap(), &ctx));
        registry.deregister(id);
        assert!(registry.is_empty());
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn double_registration_panics() {
        let registry = HandleRegistry::new();
        let ctx = context();
        registry.register(Arc::clone(&ctx));
        registry.register(ctx);
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn deregistering_unknown_id_panics() {
        HandleRegistry::new().deregister(0x1000);
    }

    #[test]
    fn registration_guard_cleans_up() {
        struct Scope;
        static REGISTRY: HandleRegistry = HandleRegistry::new();
        impl RegistryScope for Scope {
            fn registry() -> &'static HandleRegistry {
                &REGISTRY
            }
        }

        let registration = Registration::<Scope>::new(context());
        assert!(REGISTRY.contains(registration.id()));
        drop(registration);
        assert!(REGISTRY.is_empty());
    }
}
