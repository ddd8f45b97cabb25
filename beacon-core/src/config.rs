//! Dispatcher configuration.

use crate::{context::Context, dispatcher::EventDispatcher, listener::Listener};

/// Behaviour switches of an [`EventDispatcher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Skip the remaining listeners (and the wildcard phase) once a listener
    /// calls [`Event::stop_propagation`](crate::Event::stop_propagation).
    ///
    /// Off by default: the flag is advisory and listeners check it themselves.
    pub halt_on_stop: bool,
}

impl DispatcherConfig {
    /// Set `halt_on_stop`.
    pub fn with_halt_on_stop(mut self, halt_on_stop: bool) -> Self {
        self.halt_on_stop = halt_on_stop;
        self
    }
}

/// Builder for an [`EventDispatcher`] with an initial registration table.
///
/// # Example
/// ```ignore
/// let dispatcher = EventDispatcher::builder()
///     .halt_on_stop(true)
///     .listener("ready", on_ready)
///     .listener("*", audit)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    listeners: Vec<(String, Listener, Context, bool)>,
}

impl DispatcherBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// See [`DispatcherConfig::halt_on_stop`].
    pub fn halt_on_stop(mut self, halt_on_stop: bool) -> Self {
        self.config.halt_on_stop = halt_on_stop;
        self
    }

    /// Register a listener bound to the dispatcher.
    pub fn listener(self, name: impl Into<String>, listener: impl Into<Listener>) -> Self {
        self.listener_with(name, listener, Context::Dispatcher, false)
    }

    /// Register a listener with an explicit context and one-shot flag.
    pub fn listener_with(
        mut self,
        name: impl Into<String>,
        listener: impl Into<Listener>,
        context: Context,
        once: bool,
    ) -> Self {
        self.listeners
            .push((name.into(), listener.into(), context, once));
        self
    }

    /// Get the number of queued registrations.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check if the builder has no registrations.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Build the dispatcher, registering the table in order.
    pub fn build(self) -> EventDispatcher {
        let dispatcher = EventDispatcher::with_config(self.config);
        for (name, listener, context, once) in self.listeners {
            dispatcher.add_event_listener(name, listener, context, once);
        }
        dispatcher
    }
}
