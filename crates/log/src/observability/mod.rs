//! Observability hooks
//!
//! Structured diagnostic events delivered to pluggable hooks, independent
//! of whatever subscriber the host installs.
//!
//! - [`ObservabilityEvent`]: events that can be emitted
//! - [`ObservabilityHook`]: hooks that receive events
//! - [`HookRegistry`]: an owned set of hooks

mod hooks;
mod registry;

pub use hooks::{DIAGNOSTICS_TARGET, LoggingHook, ObservabilityEvent, ObservabilityHook};
pub use registry::HookRegistry;
