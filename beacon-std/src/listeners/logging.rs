//! Logging listener - observability for dispatched events.

use beacon_core::{Event, Listener};

/// A listener that logs every event it receives.
///
/// Register it under the wildcard name to observe all dispatches of a
/// dispatcher. It uses `tracing` when the `tracing` feature is enabled and
/// does nothing otherwise.
///
/// # Example
///
/// ```rust,ignore
/// dispatcher.on("*", LoggingListener::named("session").into_listener());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LoggingListener {
    name: &'static str,
}

impl LoggingListener {
    /// Create a new `LoggingListener` with a default name.
    pub fn new() -> Self {
        Self { name: "event" }
    }

    /// Create a new `LoggingListener` with a custom name.
    ///
    /// The name is used in log messages to identify the dispatcher.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }

    /// The name used in log messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Build the listener.
    pub fn into_listener(self) -> Listener {
        Listener::from_fn(move |event: &mut Event| self.observe(event))
    }

    fn observe(&self, event: &Event) {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                name = %self.name,
                event = %event.name(),
                stopped = event.is_stopped(),
                results = event.result_details().len(),
                "observed event"
            );
        }

        #[cfg(not(feature = "tracing"))]
        {
            let _ = (self.name, event);
        }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}
