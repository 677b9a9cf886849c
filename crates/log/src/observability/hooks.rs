//! Observability event and hook traits

use std::time::SystemTime;

use tracing::Level;

/// Something worth reporting that happened inside the runtime
///
/// Events are plain values handed to every hook of a [`super::HookRegistry`].
/// The name is the stable part; the payload is free-form JSON.
///
/// ```rust
/// use bdo_log::observability::ObservabilityEvent;
///
/// struct FieldChecked {
///     field: String,
///     valid: bool,
/// }
///
/// impl ObservabilityEvent for FieldChecked {
///     fn name(&self) -> &str {
///         "field_checked"
///     }
///
///     fn data(&self) -> Option<serde_json::Value> {
///         Some(serde_json::json!({ "field": self.field, "valid": self.valid }))
///     }
/// }
/// ```
pub trait ObservabilityEvent: Send + Sync {
    /// Stable identifier like "rule_evaluation_failed"
    fn name(&self) -> &str;

    /// Defaults to the moment of the call
    fn timestamp(&self) -> SystemTime {
        SystemTime::now()
    }

    /// Structured payload, `None` if the name says it all
    fn data(&self) -> Option<serde_json::Value> {
        None
    }
}

/// Receiver of runtime events
///
/// `on_event` runs synchronously inside validation, so a slow hook slows
/// every field check.
pub trait ObservabilityHook: Send + Sync {
    /// Handle one event
    fn on_event(&self, event: &dyn ObservabilityEvent);

    /// Runs when the hook joins a registry
    fn initialize(&self) {}

    /// Runs when the owning registry shuts down
    fn shutdown(&self) {}
}

/// Tracing target of records written by [`LoggingHook`]
pub const DIAGNOSTICS_TARGET: &str = "bdo::diagnostics";

/// Writes each event as a tracing record under [`DIAGNOSTICS_TARGET`]
///
/// Rule engines install one at `WARN` so swallowed evaluation errors still
/// reach the host's subscriber.
#[derive(Debug, Clone, Copy)]
pub struct LoggingHook {
    level: Level,
}

impl LoggingHook {
    /// Log at `level`
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Level records are written at
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for LoggingHook {
    fn default() -> Self {
        Self::new(Level::WARN)
    }
}

impl ObservabilityHook for LoggingHook {
    fn on_event(&self, event: &dyn ObservabilityEvent) {
        let name = event.name();
        let payload = event.data().unwrap_or(serde_json::Value::Null);

        // tracing needs the level at compile time
        match self.level {
            Level::ERROR => tracing::error!(target: DIAGNOSTICS_TARGET, event = name, %payload),
            Level::WARN => tracing::warn!(target: DIAGNOSTICS_TARGET, event = name, %payload),
            Level::INFO => tracing::info!(target: DIAGNOSTICS_TARGET, event = name, %payload),
            Level::DEBUG => tracing::debug!(target: DIAGNOSTICS_TARGET, event = name, %payload),
            Level::TRACE => tracing::trace!(target: DIAGNOSTICS_TARGET, event = name, %payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestEvent {
        name: String,
    }

    impl ObservabilityEvent for TestEvent {
        fn name(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn event_defaults() {
        let event = TestEvent {
            name: "test_event".to_string(),
        };
        assert_eq!(event.name(), "test_event");
        assert!(event.data().is_none());
        assert!(event.timestamp() <= SystemTime::now());
    }

    #[test]
    fn logging_hook_handles_every_level() {
        let event = TestEvent {
            name: "test".to_string(),
        };
        for level in [
            Level::ERROR,
            Level::WARN,
            Level::INFO,
            Level::DEBUG,
            Level::TRACE,
        ] {
            LoggingHook::new(level).on_event(&event);
        }
        assert_eq!(LoggingHook::default().level(), Level::WARN);
    }
}
