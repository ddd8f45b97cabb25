//! Host embedding.
//!
//! Any type that owns an [`EventDispatcher`] becomes an event target by
//! implementing [`EventTarget`]; the provided methods forward to the
//! embedded dispatcher.

use crate::autowire::{self, AutoListen};
use beacon_core::{
    BoxError, Context, Event, EventDispatcher, EventFuture, Listener, Values,
};
use std::rc::Rc;

/// A type that emits events through an embedded dispatcher.
///
/// # Example
///
/// ```rust,ignore
/// struct Downloader {
///     events: EventDispatcher,
/// }
///
/// impl EventTarget for Downloader {
///     fn event_dispatcher(&self) -> &EventDispatcher {
///         &self.events
///     }
/// }
///
/// downloader.on("progress", |event: &mut Event| { /* ... */ });
/// downloader.dispatch_event("progress")?;
/// ```
pub trait EventTarget {
    /// The embedded dispatcher.
    fn event_dispatcher(&self) -> &EventDispatcher;

    /// See [`EventDispatcher::on`].
    fn on(&self, name: impl Into<String>, listener: impl Into<Listener>) -> &Self
    where
        Self: Sized,
    {
        self.event_dispatcher().on(name, listener);
        self
    }

    /// See [`EventDispatcher::on_with`].
    fn on_with(
        &self,
        name: impl Into<String>,
        listener: impl Into<Listener>,
        context: Context,
    ) -> &Self
    where
        Self: Sized,
    {
        self.event_dispatcher().on_with(name, listener, context);
        self
    }

    /// See [`EventDispatcher::on_weak`].
    fn on_weak(
        &self,
        name: impl Into<String>,
        listener: impl Into<Listener>,
        context: Context,
    ) -> &Self
    where
        Self: Sized,
    {
        self.event_dispatcher().on_weak(name, listener, context);
        self
    }

    /// See [`EventDispatcher::once`].
    fn once(&self, name: impl Into<String>, listener: impl Into<Listener>) -> &Self
    where
        Self: Sized,
    {
        self.event_dispatcher().once(name, listener);
        self
    }

    /// See [`EventDispatcher::off`].
    fn off(&self, name: &str, listener: &Listener) -> &Self
    where
        Self: Sized,
    {
        self.event_dispatcher().off(name, listener);
        self
    }

    /// See [`EventDispatcher::remove_all_event_listeners`].
    fn remove_all_event_listeners(&self, name: Option<&str>) -> &Self
    where
        Self: Sized,
    {
        self.event_dispatcher().remove_all_event_listeners(name);
        self
    }

    /// See [`EventDispatcher::has_event_listener`].
    fn has_event_listener(&self, name: &str) -> bool {
        self.event_dispatcher().has_event_listener(name)
    }

    /// See [`EventDispatcher::dispatch_event`].
    fn dispatch_event(&self, event: impl Into<Event>) -> Result<Event, BoxError>
    where
        Self: Sized,
    {
        self.event_dispatcher().dispatch_event(event)
    }

    /// See [`EventDispatcher::dispatch_event_with`].
    fn dispatch_event_with(&self, event: impl Into<Event>, values: Values) -> Result<Event, BoxError>
    where
        Self: Sized,
    {
        self.event_dispatcher().dispatch_event_with(event, values)
    }

    /// See [`EventDispatcher::wait_for_event`].
    fn wait_for_event(&self, name: impl Into<String>) -> EventFuture
    where
        Self: Sized,
    {
        self.event_dispatcher().wait_for_event(name)
    }

    /// Register this host's [`AutoListen`] table on its own dispatcher.
    ///
    /// Returns the number of registrations made.
    fn wire_listeners(self: &Rc<Self>) -> usize
    where
        Self: AutoListen,
    {
        autowire::wire(self, self.event_dispatcher())
    }

    /// Put `host` behind an `Rc` with its [`AutoListen`] table already
    /// registered on its own dispatcher.
    ///
    /// ```rust,ignore
    /// let door = Door::new_wired(Door::default());
    /// door.dispatch_event("open")?;
    /// ```
    fn new_wired(host: Self) -> Rc<Self>
    where
        Self: AutoListen,
    {
        let host = Rc::new(host);
        host.wire_listeners();
        host
    }
}

impl EventTarget for EventDispatcher {
    fn event_dispatcher(&self) -> &EventDispatcher {
        self
    }
}
