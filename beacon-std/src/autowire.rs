//! Declarative listener wiring.
//!
//! A host type lists its event handlers once, in an [`AutoListen`] table,
//! instead of registering each of them by hand after construction. The
//! `#[listeners]` macro in `beacon-macros` generates the table from methods
//! marked with `#[on(..)]`.
//!
//! ```rust,ignore
//! impl AutoListen for Door {
//!     fn auto_listeners() -> Vec<AutoListener<Self>> {
//!         vec![AutoListener::new(["open", "close"], |door: &Door, event| door.log(event))]
//!     }
//! }
//!
//! let door = Rc::new(Door::default());
//! wire(&door, door.event_dispatcher());
//! ```

use beacon_core::{BoxError, Context, Event, EventDispatcher, Listener, PREFIX};
use std::{any::Any, fmt, rc::Rc};

/// Handler signature of an auto-wired method.
pub type AutoHandler<T> = fn(&T, &mut Event) -> Result<(), BoxError>;

/// One row of an [`AutoListen`] table: a handler and the names it serves.
pub struct AutoListener<T> {
    events: Vec<String>,
    handler: AutoHandler<T>,
}

impl<T> AutoListener<T> {
    /// A handler subscribed to every name in `events`.
    pub fn new<I, S>(events: I, handler: AutoHandler<T>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            events: events.into_iter().map(Into::into).collect(),
            handler,
        }
    }

    /// A handler subscribed to the names encoded in a marked name.
    ///
    /// See [`decode_marked_name`].
    pub fn from_marked_name(marked: &str, handler: AutoHandler<T>) -> Self {
        Self::new(decode_marked_name(marked), handler)
    }

    /// The names this handler is subscribed to.
    pub fn events(&self) -> &[String] {
        &self.events
    }

    /// The handler.
    pub fn handler(&self) -> AutoHandler<T> {
        self.handler
    }
}

impl<T> fmt::Debug for AutoListener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoListener")
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

/// Split a name made of [`PREFIX`]-marked segments into event names.
///
/// `"🚩ready"` yields `["🚩ready"]`, `"🚩ready🚩error"` yields
/// `["🚩ready", "🚩error"]`. Names without the leading marker yield nothing.
///
/// Empty segments are skipped: `"🚩a🚩🚩b"` yields `["🚩a", "🚩b"]` and never
/// the bare `"🚩"`. The `🚩`-marked method naming convention this decodes
/// registers the bare marker for such a segment; this function deliberately
/// does not.
pub fn decode_marked_name(marked: &str) -> Vec<String> {
    let Some(rest) = marked.strip_prefix(PREFIX) else {
        return Vec::new();
    };
    rest.split(PREFIX)
        .filter(|segment| !segment.is_empty())
        .map(Event::reserved_name)
        .collect()
}

/// Types that declare their own event handlers.
pub trait AutoListen: Any + Sized {
    /// The registration table of this type.
    fn auto_listeners() -> Vec<AutoListener<Self>>;
}

/// Register every handler of `host`'s table on `dispatcher`.
///
/// Handlers are bound weakly to `host`: hosts usually own the dispatcher
/// they wire into, and a strong binding would keep both alive forever.
/// Returns the number of registrations made.
pub fn wire<T: AutoListen>(host: &Rc<T>, dispatcher: &EventDispatcher) -> usize {
    let context = Context::weak(host);
    let mut wired = 0;

    for auto in T::auto_listeners() {
        let handler = auto.handler;
        let listener = Listener::method(move |host: &T, event: &mut Event| handler(host, event));
        for name in auto.events {
            #[cfg(feature = "tracing")]
            tracing::trace!(event = %name, host = std::any::type_name::<T>(), "auto-wiring listener");
            dispatcher.add_event_listener(name, listener.clone(), context.clone(), false);
            wired += 1;
        }
    }
    wired
}
