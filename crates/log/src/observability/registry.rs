//! Owned registry for observability hooks

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::hooks::{ObservabilityEvent, ObservabilityHook};

/// Dispatches events to every registered hook
///
/// Each component that emits diagnostics owns its own registry, so two
/// engines never see each other's hooks. Registration takes a write lock,
/// emission a read lock.
#[derive(Default)]
pub struct HookRegistry {
    hooks: RwLock<Vec<Arc<dyn ObservabilityHook>>>,
}

impl HookRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with `hook`
    #[must_use]
    pub fn with_hook(hook: Arc<dyn ObservabilityHook>) -> Self {
        let registry = Self::new();
        registry.register(hook);
        registry
    }

    /// Register a new hook
    ///
    /// The hook's `initialize()` method is called immediately.
    pub fn register(&self, hook: Arc<dyn ObservabilityHook>) {
        hook.initialize();
        self.hooks.write().push(hook);
    }

    /// Emit an event to all registered hooks
    pub fn emit(&self, event: &dyn ObservabilityEvent) {
        for hook in self.hooks.read().iter() {
            hook.on_event(event);
        }
    }

    /// Call `shutdown()` on each hook and clear the registry
    pub fn shutdown(&self) {
        let hooks = std::mem::take(&mut *self.hooks.write());
        for hook in hooks {
            hook.shutdown();
        }
    }

    /// Number of registered hooks
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.read().len()
    }

    /// Whether no hook is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.read().is_empty()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.len())
            .finish()
    }
}
