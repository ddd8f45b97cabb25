//! Error types for Beacon.
//!
//! Listener failures travel as [`BoxError`] and leave
//! [`EventDispatcher::dispatch_event`] untouched. The enums below cover the
//! failures Beacon produces itself:
//!
//! - [`Error`] - Errors raised while invoking a listener
//! - [`WaitError`] - Errors from the waiting futures
//!
//! [`EventDispatcher::dispatch_event`]: crate::EventDispatcher::dispatch_event

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by Beacon while calling a listener.
#[derive(Error, Debug)]
pub enum Error {
    /// A typed method listener was bound to a context of another type.
    #[error("listener expects a `{expected}` context")]
    ContextMismatch {
        /// Type name the listener was written for.
        expected: &'static str,
    },

    /// A typed method listener was registered without an object context.
    #[error("listener expects a `{expected}` context but was invoked unbound")]
    MissingContext {
        /// Type name the listener was written for.
        expected: &'static str,
    },
}

/// Errors returned by [`EventFuture`](crate::EventFuture).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    /// The one-shot registration was dropped before the event fired.
    #[error("listener was removed before the event was dispatched")]
    Abandoned,
}
