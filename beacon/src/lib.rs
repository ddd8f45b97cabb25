//! # beacon - Synchronous In-Process Events
//!
//! `beacon` lets an object announce named events to whoever registered
//! interest in them. Dispatch is synchronous: every listener has run by the
//! time `dispatch_event` returns, and the returned [`Event`] carries the
//! results they left behind.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use beacon::prelude::*;
//!
//! let dispatcher = EventDispatcher::new();
//! dispatcher.on("saved", |event: &mut Event| event.set_result("ok"));
//!
//! let event = dispatcher.dispatch_event("saved")?;
//! assert_eq!(event.call_count(), 1);
//! ```
//!
//! ## Hosts
//!
//! Types that own a dispatcher implement [`EventTarget`] (or derive it) and
//! can declare their handlers with [`listeners`]:
//!
//! ```rust,ignore
//! #[derive(EventTarget)]
//! struct Door {
//!     events: EventDispatcher,
//! }
//!
//! #[beacon::listeners]
//! impl Door {
//!     #[on("open", "close")]
//!     fn log(&self, event: &mut Event) { /* ... */ }
//! }
//!
//! let door = Rc::new(Door { events: EventDispatcher::new() });
//! door.wire_listeners();
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use beacon_core::{
    // Errors
    BoxError,
    // Dispatcher
    Context,
    DispatcherBuilder,
    DispatcherConfig,
    Error,
    // Event
    Event,
    EventDispatcher,
    EventFuture,
    IntoListenerResult,
    // Listener
    Listener,
    PREFIX,
    ResultKey,
    This,
    Value,
    Values,
    WILDCARD,
    WaitError,
    WeakDispatcher,
    serde_json,
};

// Host embedding
pub use beacon_std::{
    AutoHandler, AutoListen, AutoListener, EventTarget, decode_marked_name, wire,
};

/// Standard listener implementations.
pub mod listeners {
    pub use beacon_std::listeners::{FilterListener, LoggingListener, name_prefix};
}

/// Testing utilities.
pub mod testing {
    pub use beacon_std::testing::{
        CountingListener, FailingListener, OrderProbe, RecordingListener,
    };
}

/// Prelude module - common imports for Beacon.
///
/// # Usage
///
/// ```rust,ignore
/// use beacon::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AutoListen, BoxError, Context, Event, EventDispatcher, EventTarget, Listener, This,
        Value, Values,
    };
}

#[cfg(feature = "macros")]
pub use beacon_macros::{EventTarget, listeners};
