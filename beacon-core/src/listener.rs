//! # Listeners
//!
//! A [`Listener`] is a shared handle to a callable. The dispatcher invokes it
//! with the resolved binding ([`This`]) of its registration and the event.
//!
//! Handles compare by identity: clone the handle you registered and pass it
//! to `off`/`remove_event_listener` to unsubscribe.
//!
//! ```rust,ignore
//! let log = Listener::from_fn(|event: &mut Event| println!("{}", event.name()));
//! dispatcher.on("saved", log.clone());
//! dispatcher.off("saved", &log);
//! ```

use crate::{
    dispatcher::EventDispatcher,
    error::{BoxError, Error},
    event::Event,
};
use std::{any::Any, fmt, rc::Rc};

/// Return types accepted from listener bodies.
pub trait IntoListenerResult {
    /// Convert into the dispatcher's result type.
    fn into_listener_result(self) -> Result<(), BoxError>;
}

impl IntoListenerResult for () {
    fn into_listener_result(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E> IntoListenerResult for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_listener_result(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}

/// The receiver a listener is invoked with.
#[derive(Clone, Copy)]
pub enum This<'a> {
    /// Bound to the dispatcher performing the dispatch (the default).
    Dispatcher(&'a EventDispatcher),
    /// Bound to an object context.
    Object(&'a Rc<dyn Any>),
    /// Registered with an explicitly absent context.
    Unbound,
}

impl<'a> This<'a> {
    /// The dispatcher, when the listener is bound to it.
    pub fn dispatcher(&self) -> Option<&'a EventDispatcher> {
        match *self {
            This::Dispatcher(dispatcher) => Some(dispatcher),
            _ => None,
        }
    }

    /// The object context downcast to `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        match *self {
            This::Object(object) => (**object).downcast_ref::<T>(),
            _ => None,
        }
    }

    /// The object context as a shared handle downcast to `T`.
    pub fn downcast_rc<T: Any>(&self) -> Option<Rc<T>> {
        match *self {
            This::Object(object) => Rc::clone(object).downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Whether the listener runs without a binding.
    pub fn is_unbound(&self) -> bool {
        matches!(self, This::Unbound)
    }
}

impl fmt::Debug for This<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            This::Dispatcher(_) => f.write_str("This::Dispatcher"),
            This::Object(object) => write!(f, "This::Object({:p})", Rc::as_ptr(object)),
            This::Unbound => f.write_str("This::Unbound"),
        }
    }
}

type ListenerFn = dyn Fn(This<'_>, &mut Event) -> Result<(), BoxError>;

/// A shared, identity-compared listener handle.
#[derive(Clone)]
pub struct Listener {
    func: Rc<ListenerFn>,
}

impl Listener {
    /// Create a listener that receives its binding.
    pub fn new<F, R>(func: F) -> Self
    where
        F: Fn(This<'_>, &mut Event) -> R + 'static,
        R: IntoListenerResult,
    {
        Self {
            func: Rc::new(move |this: This<'_>, event: &mut Event| {
                func(this, event).into_listener_result()
            }),
        }
    }

    /// Create a listener that ignores its binding.
    pub fn from_fn<F, R>(func: F) -> Self
    where
        F: Fn(&mut Event) -> R + 'static,
        R: IntoListenerResult,
    {
        Self::new(move |_this, event| func(event))
    }

    /// Create a listener for methods of `T`.
    ///
    /// The registration's context must be an object of type `T`; any other
    /// binding makes the invocation fail with [`Error::ContextMismatch`] or
    /// [`Error::MissingContext`].
    pub fn method<T, F, R>(func: F) -> Self
    where
        T: Any,
        F: Fn(&T, &mut Event) -> R + 'static,
        R: IntoListenerResult,
    {
        let expected = std::any::type_name::<T>();
        Self::new(move |this: This<'_>, event: &mut Event| match this {
            This::Object(_) => match this.downcast_ref::<T>() {
                Some(receiver) => func(receiver, event).into_listener_result(),
                None => Err(Error::ContextMismatch { expected }.into()),
            },
            _ => Err(Error::MissingContext { expected }.into()),
        })
    }

    /// Whether both handles point to the same callable.
    pub fn ptr_eq(&self, other: &Listener) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }

    /// Invoke the callable directly, outside of any dispatch.
    pub fn call(&self, this: This<'_>, event: &mut Event) -> Result<(), BoxError> {
        (self.func)(this, event)
    }
}

impl<F, R> From<F> for Listener
where
    F: Fn(&mut Event) -> R + 'static,
    R: IntoListenerResult,
{
    fn from(func: F) -> Self {
        Listener::from_fn(func)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.func) as *const ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        hits: std::cell::Cell<u32>,
    }

    #[test]
    fn test_clones_share_identity() {
        let a = Listener::from_fn(|_event: &mut Event| {});
        let b = a.clone();
        let c = Listener::from_fn(|_event: &mut Event| {});

        assert!(a.ptr_eq(&b));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_method_listener_downcasts() {
        let counter: Rc<dyn Any> = Rc::new(Counter {
            hits: std::cell::Cell::new(0),
        });
        let listener = Listener::method(|counter: &Counter, _event: &mut Event| {
            counter.hits.set(counter.hits.get() + 1);
        });

        let mut event = Event::new("tick");
        listener.call(This::Object(&counter), &mut event).unwrap();
        listener.call(This::Object(&counter), &mut event).unwrap();

        let counter = counter.downcast_ref::<Counter>().unwrap();
        assert_eq!(counter.hits.get(), 2);
    }

    #[test]
    fn test_method_listener_rejects_wrong_context() {
        let wrong: Rc<dyn Any> = Rc::new(5_u8);
        let listener = Listener::method(|_counter: &Counter, _event: &mut Event| {});
        let mut event = Event::new("tick");

        let err = listener.call(This::Object(&wrong), &mut event).unwrap_err();
        assert!(err.to_string().contains("Counter"));

        let err = listener.call(This::Unbound, &mut event).unwrap_err();
        assert!(err.to_string().contains("unbound"));
    }

    #[test]
    fn test_result_conversion() {
        let ok = Listener::from_fn(|_event: &mut Event| Ok::<(), std::io::Error>(()));
        let failing = Listener::from_fn(|_event: &mut Event| Err::<(), _>("boom"));
        let mut event = Event::new("x");

        assert!(ok.call(This::Unbound, &mut event).is_ok());
        let err = failing.call(This::Unbound, &mut event).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
