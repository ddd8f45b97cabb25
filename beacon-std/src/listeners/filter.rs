//! Filter listener for conditional event processing.

use beacon_core::{Event, Listener};

/// Wraps a listener so it only runs for events matching a predicate.
///
/// Useful on the wildcard name, where every dispatch arrives. A skipped
/// event still counts as an invocation of the wrapper.
pub struct FilterListener<F> {
    predicate: F,
}

impl<F> FilterListener<F>
where
    F: Fn(&Event) -> bool + 'static,
{
    /// Create a new filter listener.
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }

    /// Build the listener that forwards matching events to `inner`.
    pub fn then(self, inner: impl Into<Listener>) -> Listener {
        let inner = inner.into();
        let predicate = self.predicate;
        Listener::new(move |this, event: &mut Event| {
            if predicate(event) {
                inner.call(this, event)
            } else {
                Ok(())
            }
        })
    }
}

/// Only events whose name starts with `prefix`.
pub fn name_prefix(prefix: impl Into<String>) -> FilterListener<impl Fn(&Event) -> bool + 'static> {
    let prefix = prefix.into();
    FilterListener::new(move |event: &Event| event.name().starts_with(&prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::EventDispatcher;
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn test_filter_on_wildcard() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let dispatcher = EventDispatcher::new();
        dispatcher.on(
            "*",
            name_prefix("user.").then(move |event: &mut Event| {
                sink.borrow_mut().push(event.name().to_owned());
            }),
        );
        dispatcher.on("user.login", |_event: &mut Event| {});
        dispatcher.on("system.tick", |_event: &mut Event| {});

        dispatcher.dispatch_event("user.login").unwrap();
        dispatcher.dispatch_event("system.tick").unwrap();

        assert_eq!(*seen.borrow(), vec!["user.login"]);
    }

    #[test]
    fn test_filter_preserves_binding() {
        let dispatcher = EventDispatcher::new();
        let bound = Rc::new(RefCell::new(false));
        let flag = bound.clone();
        dispatcher.on(
            "ping",
            FilterListener::new(|_event: &Event| true).then(beacon_core::Listener::new(
                move |this, _event: &mut Event| {
                    *flag.borrow_mut() = this.dispatcher().is_some();
                },
            )),
        );

        dispatcher.dispatch_event("ping").unwrap();
        assert!(*bound.borrow());
    }
}
