//! Listener bindings.
//!
//! A [`Context`] is stored with each registration and resolved into a
//! [`This`] right before the listener runs. Weak contexts are resolved at
//! every dispatch; once the referent is gone the registration is pruned.

use crate::{dispatcher::EventDispatcher, listener::This};
use std::{
    any::Any,
    fmt,
    rc::{Rc, Weak},
};

/// The binding of a listener registration.
#[derive(Clone, Default)]
pub enum Context {
    /// The dispatcher the listener is registered on.
    #[default]
    Dispatcher,
    /// No binding at all.
    Unbound,
    /// An object kept alive by the registration.
    Strong(Rc<dyn Any>),
    /// An object the registration does not keep alive.
    Weak(Weak<dyn Any>),
}

impl Context {
    /// Bind to `object`, keeping it alive.
    pub fn object<T: Any>(object: &Rc<T>) -> Self {
        let object: Rc<dyn Any> = object.clone();
        Context::Strong(object)
    }

    /// Bind to `object` without keeping it alive.
    pub fn weak<T: Any>(object: &Rc<T>) -> Self {
        let object: Rc<dyn Any> = object.clone();
        Context::Weak(Rc::downgrade(&object))
    }

    /// The same binding, held weakly.
    ///
    /// Dispatcher and unbound contexts have nothing to downgrade.
    pub fn downgrade(self) -> Self {
        match self {
            Context::Strong(object) => Context::Weak(Rc::downgrade(&object)),
            other => other,
        }
    }

    /// Whether the binding is held weakly.
    pub fn is_weak(&self) -> bool {
        matches!(self, Context::Weak(_))
    }

    /// Whether a weak binding still has a live referent. Strong, dispatcher
    /// and unbound contexts are always alive.
    pub fn is_alive(&self) -> bool {
        match self {
            Context::Weak(object) => object.strong_count() > 0,
            _ => true,
        }
    }

    /// Whether a stored binding refers to the same target as `target`.
    ///
    /// Objects compare by address; a dead weak binding matches nothing.
    pub(crate) fn matches(&self, target: &Context) -> bool {
        match (self, target) {
            (Context::Dispatcher, Context::Dispatcher) => true,
            (Context::Unbound, Context::Unbound) => true,
            (stored, target) => match (stored.address(), target.address()) {
                (Some(a), Some(b)) => stored.is_alive() && a == b,
                _ => false,
            },
        }
    }

    fn address(&self) -> Option<*const ()> {
        match self {
            Context::Strong(object) => Some(Rc::as_ptr(object) as *const ()),
            Context::Weak(object) => Some(Weak::as_ptr(object) as *const ()),
            _ => None,
        }
    }

    /// Resolve into an owned binding, `None` when a weak referent is gone.
    pub(crate) fn resolve(&self) -> Option<Bound> {
        match self {
            Context::Dispatcher => Some(Bound::Dispatcher),
            Context::Unbound => Some(Bound::Unbound),
            Context::Strong(object) => Some(Bound::Object(Rc::clone(object))),
            Context::Weak(object) => object.upgrade().map(Bound::Object),
        }
    }
}

impl<T: Any> From<&Rc<T>> for Context {
    fn from(object: &Rc<T>) -> Self {
        Context::object(object)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Dispatcher => f.write_str("Dispatcher"),
            Context::Unbound => f.write_str("Unbound"),
            Context::Strong(object) => write!(f, "Strong({:p})", Rc::as_ptr(object)),
            Context::Weak(object) => f
                .debug_struct("Weak")
                .field("address", &Weak::as_ptr(object))
                .field("alive", &self.is_alive())
                .finish(),
        }
    }
}

/// A resolved binding, owned for the duration of one invocation.
pub(crate) enum Bound {
    Dispatcher,
    Unbound,
    Object(Rc<dyn Any>),
}

impl Bound {
    pub(crate) fn this<'a>(&'a self, dispatcher: &'a EventDispatcher) -> This<'a> {
        match self {
            Bound::Dispatcher => This::Dispatcher(dispatcher),
            Bound::Unbound => This::Unbound,
            Bound::Object(object) => This::Object(object),
        }
    }
}
