//! # beacon-core
//!
//! Event value type and synchronous dispatcher for the Beacon event
//! framework.
//!
//! This crate holds everything a dispatch needs. `beacon-std` builds host
//! embedding and testing helpers on top of it.
//!
//! # Building blocks
//!
//! ## [`Event`]
//!
//! The envelope passed to listeners: name, target, advisory propagation
//! flag, per-listener results and free-form extension values.
//!
//! ## [`Listener`] and [`Context`]
//!
//! A listener is an identity-compared callable handle. Each registration
//! pairs it with a context (the dispatcher, an object held strongly or
//! weakly, or nothing) that is resolved into a [`This`] at invocation time.
//!
//! ## [`EventDispatcher`]
//!
//! Owns the registrations of one host and runs them in two phases per
//! dispatch: name-specific listeners first, then [`WILDCARD`] listeners.
//! One-shot registrations are removed as they run, dead weak
//! registrations are pruned lazily, and [`EventFuture`]s let async code wait
//! for the next occurrence of a name.
//!
//! # Error Types
//!
//! - [`BoxError`] - Listener errors, returned unmodified by dispatch
//! - [`Error`] - Invocation errors raised by Beacon itself
//! - [`WaitError`] - Waiting future errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod config;
mod context;
mod dispatcher;
mod error;
mod event;
mod listener;
mod registry;
mod wait;

// Re-exports
pub use config::{DispatcherBuilder, DispatcherConfig};
pub use context::Context;
pub use dispatcher::{EventDispatcher, WeakDispatcher};
pub use error::{BoxError, Error, WaitError};
pub use event::{Event, PREFIX, ResultKey, Values, WILDCARD};
pub use listener::{IntoListenerResult, Listener, This};
pub use serde_json::{self, Value};
pub use wait::EventFuture;
