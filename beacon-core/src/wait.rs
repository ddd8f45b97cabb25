//! Waiting for events.
//!
//! The futures returned here resolve when a later `dispatch_event` call on
//! the same dispatcher fires the awaited name. They carry the event as it
//! stands once that dispatch has finished, call count included.
//!
//! There is no timeout. A future whose registration is removed (for example
//! by `remove_all_event_listeners`) or whose dispatcher is dropped resolves
//! to [`WaitError::Abandoned`].

use crate::{
    context::Context,
    dispatcher::EventDispatcher,
    error::WaitError,
    event::Event,
    listener::Listener,
};
use futures::{
    channel::oneshot,
    future::{TryJoinAll, try_join_all},
};
use std::{
    cell::RefCell,
    future::Future,
    pin::Pin,
    task::{Context as TaskContext, Poll},
};

/// Resolves with the first dispatched event of a name.
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct EventFuture {
    rx: oneshot::Receiver<Event>,
}

impl Future for EventFuture {
    type Output = Result<Event, WaitError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.map_err(|_| WaitError::Abandoned))
    }
}

impl EventDispatcher {
    /// Wait for the next dispatch of `name`.
    ///
    /// Registers a one-shot listener bound to this dispatcher.
    pub fn wait_for_event(&self, name: impl Into<String>) -> EventFuture {
        let (tx, rx) = oneshot::channel();
        let slot = RefCell::new(Some(tx));
        let waiter = Listener::new(move |this, _event: &mut Event| {
            if let (Some(dispatcher), Some(tx)) = (this.dispatcher(), slot.borrow_mut().take()) {
                dispatcher.defer_settle(tx);
            }
        });
        self.add_event_listener(name, waiter, Context::Dispatcher, true);
        EventFuture { rx }
    }

    /// Alias of [`wait_for_event`](Self::wait_for_event).
    pub fn event_promise(&self, name: impl Into<String>) -> EventFuture {
        self.wait_for_event(name)
    }

    /// Wait until every name has been dispatched at least once.
    ///
    /// Resolves with one event per name, in the order of `names`, whatever
    /// order they fired in.
    pub fn event_promise_all<I, S>(&self, names: I) -> TryJoinAll<EventFuture>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        try_join_all(names.into_iter().map(|name| self.wait_for_event(name)))
    }
}
