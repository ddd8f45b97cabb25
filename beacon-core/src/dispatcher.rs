//! # Event dispatcher
//!
//! [`EventDispatcher`] owns a per-instance registry of listeners keyed by
//! event name and runs them synchronously, in registration order, when an
//! event is dispatched.
//!
//! # Dispatch phases
//!
//! 1. Listeners registered under the event's name.
//! 2. Listeners registered under [`WILDCARD`], if any remain registered once
//!    phase one finishes.
//!
//! Each phase iterates a snapshot of registration ids and looks every id up
//! in the live list before invoking it. Listeners may therefore add or remove
//! registrations (or dispatch again) while a dispatch is running: removed
//! entries are not invoked, surviving entries are invoked exactly once, and
//! entries added mid-dispatch take part from the next dispatch on.
//! One-shot entries leave the registry before they are invoked.
//!
//! # Errors
//!
//! A failing listener aborts the dispatch. Its error is returned unmodified
//! and the remaining listeners, wildcard phase included, are skipped.

use crate::{
    config::{DispatcherBuilder, DispatcherConfig},
    context::{Bound, Context},
    error::BoxError,
    event::{Event, Values, WILDCARD},
    listener::Listener,
    registry::{EntryId, Registry},
};
use futures::channel::oneshot;
use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

struct Inner {
    registry: RefCell<Registry>,
    config: DispatcherConfig,
    /// Waiters triggered by the dispatches currently on the stack.
    settled: RefCell<Vec<oneshot::Sender<Event>>>,
}

/// A synchronous, single-threaded event dispatcher.
///
/// Cloning yields another handle to the same registry. Host types embed one
/// and expose it through `EventTarget` to gain event emission.
///
/// # Example
/// ```ignore
/// let dispatcher = EventDispatcher::new();
/// dispatcher.on("ping", |event: &mut Event| event.set_result("pong"));
///
/// let event = dispatcher.dispatch_event("ping")?;
/// assert_eq!(event.call_count(), 1);
/// ```
#[derive(Clone)]
pub struct EventDispatcher {
    inner: Rc<Inner>,
}

/// A non-owning handle to an [`EventDispatcher`].
#[derive(Clone)]
pub struct WeakDispatcher(Weak<Inner>);

impl WeakDispatcher {
    /// The dispatcher, if it is still alive.
    pub fn upgrade(&self) -> Option<EventDispatcher> {
        self.0.upgrade().map(|inner| EventDispatcher { inner })
    }
}

impl fmt::Debug for WeakDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeakDispatcher({:p})", self.0.as_ptr())
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDispatcher {
    /// Create a dispatcher with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Create a dispatcher with the given configuration.
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                registry: RefCell::new(Registry::default()),
                config,
                settled: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Start building a dispatcher with an initial registration table.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// The configuration this dispatcher was built with.
    pub fn config(&self) -> DispatcherConfig {
        self.inner.config
    }

    /// A non-owning handle to this dispatcher.
    pub fn downgrade(&self) -> WeakDispatcher {
        WeakDispatcher(Rc::downgrade(&self.inner))
    }

    /// Whether both handles refer to the same dispatcher.
    pub fn ptr_eq(&self, other: &EventDispatcher) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Append a registration. The same listener and context may be
    /// registered several times and is then invoked once per registration.
    pub fn add_event_listener(
        &self,
        name: impl Into<String>,
        listener: impl Into<Listener>,
        context: Context,
        once: bool,
    ) -> &Self {
        let name = name.into();
        #[cfg(feature = "tracing")]
        tracing::trace!(event = %name, ?context, once, "adding listener");
        self.inner
            .registry
            .borrow_mut()
            .push(name, listener.into(), context, once);
        self
    }

    /// Register `listener` unless the same listener and context pair is
    /// already present; any existing pair is replaced by the new one.
    pub fn add_unique_event_listener(
        &self,
        name: impl Into<String>,
        listener: impl Into<Listener>,
        context: Context,
        once: bool,
    ) -> &Self {
        let name = name.into();
        let listener = listener.into();
        self.remove_event_listener(&name, &listener, &context);
        self.add_event_listener(name, listener, context, once)
    }

    /// Register `listener` with its context held weakly.
    ///
    /// The registration does not keep the context alive; it is pruned on the
    /// first dispatch after the context is dropped.
    pub fn add_weak_event_listener(
        &self,
        name: impl Into<String>,
        listener: impl Into<Listener>,
        context: Context,
        once: bool,
    ) -> &Self {
        self.add_event_listener(name, listener, context.downgrade(), once)
    }

    /// Remove every registration of `listener` under `name` whose context
    /// refers to the same target as `context`.
    pub fn remove_event_listener(&self, name: &str, listener: &Listener, context: &Context) -> &Self {
        // Dropped after the borrow ends, a listener may own a dispatcher.
        let removed = self
            .inner
            .registry
            .borrow_mut()
            .remove_matching(name, listener, context);
        #[cfg(feature = "tracing")]
        tracing::trace!(event = %name, removed = removed.len(), "removed listener");
        drop(removed);
        self
    }

    /// Remove all registrations, or only those under `name`.
    pub fn remove_all_event_listeners(&self, name: Option<&str>) -> &Self {
        let removed = {
            let mut registry = self.inner.registry.borrow_mut();
            match name {
                Some(name) => registry.take_name(name),
                None => registry.take_all(),
            }
        };
        drop(removed);
        self
    }

    /// Register a listener bound to this dispatcher.
    pub fn on(&self, name: impl Into<String>, listener: impl Into<Listener>) -> &Self {
        self.add_event_listener(name, listener, Context::Dispatcher, false)
    }

    /// Register a listener bound to `context`.
    pub fn on_with(
        &self,
        name: impl Into<String>,
        listener: impl Into<Listener>,
        context: Context,
    ) -> &Self {
        self.add_event_listener(name, listener, context, false)
    }

    /// Alias of [`add_weak_event_listener`](Self::add_weak_event_listener).
    pub fn on_weak(
        &self,
        name: impl Into<String>,
        listener: impl Into<Listener>,
        context: Context,
    ) -> &Self {
        self.add_weak_event_listener(name, listener, context, false)
    }

    /// Register a one-shot listener bound to this dispatcher.
    pub fn once(&self, name: impl Into<String>, listener: impl Into<Listener>) -> &Self {
        self.add_event_listener(name, listener, Context::Dispatcher, true)
    }

    /// Register a one-shot listener bound to `context`.
    pub fn once_with(
        &self,
        name: impl Into<String>,
        listener: impl Into<Listener>,
        context: Context,
    ) -> &Self {
        self.add_event_listener(name, listener, context, true)
    }

    /// Remove a listener registered with [`on`](Self::on).
    pub fn off(&self, name: &str, listener: &Listener) -> &Self {
        self.remove_event_listener(name, listener, &Context::Dispatcher)
    }

    /// Remove a listener registered with an explicit context.
    pub fn off_with(&self, name: &str, listener: &Listener, context: &Context) -> &Self {
        self.remove_event_listener(name, listener, context)
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    /// Whether any registration exists under `name`.
    pub fn has_event_listener(&self, name: &str) -> bool {
        self.inner.registry.borrow().contains(name)
    }

    /// Whether any registration exists at all, under any name.
    pub fn has_any_event_listener(&self) -> bool {
        !self.inner.registry.borrow().is_empty()
    }

    /// Number of registrations under `name`, dead weak ones included until
    /// the next dispatch prunes them.
    pub fn listener_count(&self, name: &str) -> usize {
        self.inner.registry.borrow().len(name)
    }

    /// Names with at least one registration, in no particular order.
    pub fn event_names(&self) -> Vec<String> {
        self.inner
            .registry
            .borrow()
            .names()
            .map(str::to_owned)
            .collect()
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    /// Dispatch an event, or a new event built from a name.
    pub fn dispatch_event(&self, event: impl Into<Event>) -> Result<Event, BoxError> {
        self.dispatch_event_with(event, Values::new())
    }

    /// Dispatch an event after merging `values` onto it.
    ///
    /// Returns the event with its target and call count set. When nothing is
    /// registered under the event's name, the call count stays unset and no
    /// wildcard listener runs.
    pub fn dispatch_event_with(
        &self,
        event: impl Into<Event>,
        values: Values,
    ) -> Result<Event, BoxError> {
        let mut event = event.into();
        event.set_target(self.downgrade());
        event.extend_values(values);

        if !self.has_event_listener(event.name()) {
            #[cfg(feature = "tracing")]
            tracing::trace!(event = %event.name(), "no listeners registered");
            return Ok(event);
        }

        let mark = self.inner.settled.borrow().len();
        let outcome = self.run_phases(&mut event);
        if let Ok(calls) = outcome {
            event.set_call_count(calls);
        }
        self.settle(mark, &event);
        outcome.map(|_| event)
    }

    fn run_phases(&self, event: &mut Event) -> Result<usize, BoxError> {
        let name = event.name().to_owned();
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!("dispatch", event = %name).entered();

        let mut calls = self.run_phase(&name, event)?;
        if !self.halted(event) && self.has_event_listener(WILDCARD) {
            calls += self.run_phase(WILDCARD, event)?;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(calls, stopped = event.is_stopped(), "dispatch finished");
        Ok(calls)
    }

    fn run_phase(&self, phase: &str, event: &mut Event) -> Result<usize, BoxError> {
        let ids = self.inner.registry.borrow().ids(phase);
        let mut calls = 0;

        for id in ids {
            if self.halted(event) {
                #[cfg(feature = "tracing")]
                tracing::trace!(phase, "propagation stopped");
                break;
            }
            let Some((listener, bound, once)) = self.resolve_entry(phase, id) else {
                continue;
            };

            // One-shot registrations are claimed before running, so a
            // re-entrant dispatch of the same name cannot run them again.
            if once {
                let spent = self.inner.registry.borrow_mut().remove_entry(phase, id);
                drop(spent);
            }
            let outcome = listener.call(bound.this(self), event);
            calls += 1;
            if let Err(error) = outcome {
                #[cfg(feature = "tracing")]
                tracing::debug!(phase, %error, "listener failed, aborting dispatch");
                return Err(error);
            }
        }
        Ok(calls)
    }

    /// Look up a live registration. Dead weak registrations are removed.
    fn resolve_entry(&self, phase: &str, id: EntryId) -> Option<(Listener, Bound, bool)> {
        let mut registry = self.inner.registry.borrow_mut();
        let (listener, once, bound) = {
            let entry = registry.get(phase, id)?;
            (entry.listener.clone(), entry.once, entry.context.resolve())
        };
        match bound {
            Some(bound) => Some((listener, bound, once)),
            None => {
                let pruned = registry.remove_entry(phase, id);
                drop(registry);
                drop(pruned);
                #[cfg(feature = "tracing")]
                tracing::debug!(phase, "pruned listener with dropped weak context");
                None
            }
        }
    }

    /// Queue a waiter to be resolved when the current dispatch finishes.
    pub(crate) fn defer_settle(&self, waiter: oneshot::Sender<Event>) {
        self.inner.settled.borrow_mut().push(waiter);
    }

    fn halted(&self, event: &Event) -> bool {
        self.inner.config.halt_on_stop && event.is_stopped()
    }

    /// Resolve the waiters triggered since `mark` with the finished event.
    fn settle(&self, mark: usize, event: &Event) {
        let waiters: Vec<_> = {
            let mut settled = self.inner.settled.borrow_mut();
            let mark = mark.min(settled.len());
            settled.drain(mark..).collect()
        };
        for waiter in waiters {
            // The receiver may have been dropped; nobody is waiting then.
            let _ = waiter.send(event.clone());
        }
    }
}

impl PartialEq for EventDispatcher {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for EventDispatcher {}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.inner.registry.borrow();
        let mut names: Vec<_> = registry.names().map(|name| (name, registry.len(name))).collect();
        names.sort_unstable();
        f.debug_struct("EventDispatcher")
            .field("listeners", &names)
            .field("config", &self.inner.config)
            .finish()
    }
}
