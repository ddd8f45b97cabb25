//! # Event envelope
//!
//! [`Event`] is the value handed to every listener during a dispatch. It
//! carries the dispatch key, a back-reference to the dispatcher that sent it,
//! an advisory propagation flag and the results contributed by listeners.
//!
//! Arbitrary extension data lives in a JSON map ([`Values`]) instead of
//! ad-hoc fields, so templates and merges stay explicit:
//!
//! ```rust,ignore
//! let event = Event::new("saved")
//!     .with_value("path", "/tmp/a.txt")
//!     .with_value("bytes", 512);
//! ```

use crate::dispatcher::{EventDispatcher, WeakDispatcher};
use serde_json::Value;
use std::{
    collections::HashMap,
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

/// Reserved marker prefixed to generated and convention-derived event names.
pub const PREFIX: &str = "🚩";

/// Catch-all event name. Listeners registered under it run after the
/// name-specific listeners of every dispatch.
pub const WILDCARD: &str = "*";

/// Extension values merged onto an event.
pub type Values = serde_json::Map<String, Value>;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Key of a single listener result in [`Event::result_details`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResultKey {
    /// Sequential key, assigned automatically by [`Event::set_result`].
    Index(usize),
    /// Listener-chosen key.
    Name(String),
}

impl From<usize> for ResultKey {
    fn from(index: usize) -> Self {
        ResultKey::Index(index)
    }
}

impl From<&str> for ResultKey {
    fn from(key: &str) -> Self {
        // "1" and 1 address the same detail.
        match key.parse::<usize>() {
            Ok(index) if index.to_string() == key => ResultKey::Index(index),
            _ => ResultKey::Name(key.to_owned()),
        }
    }
}

impl From<String> for ResultKey {
    fn from(key: String) -> Self {
        ResultKey::from(key.as_str())
    }
}

impl fmt::Display for ResultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultKey::Index(index) => write!(f, "{index}"),
            ResultKey::Name(name) => f.write_str(name),
        }
    }
}

/// An event travelling through an [`EventDispatcher`].
///
/// # Lifecycle
///
/// 1. Built by the caller (or implicitly from a name by `dispatch_event`).
/// 2. Stamped with its target and extension values by the dispatcher.
/// 3. Passed by `&mut` to each listener, which may record results or call
///    [`stop_propagation`](Event::stop_propagation).
/// 4. Returned to the caller with [`call_count`](Event::call_count) set.
///
/// An event can be dispatched again to carry its accumulated results forward.
#[derive(Clone)]
pub struct Event {
    name: String,
    target: Option<WeakDispatcher>,
    stopped: bool,
    result: Option<Value>,
    result_details: HashMap<ResultKey, Value>,
    call_count: Option<usize>,
    values: Values,
}

impl Event {
    /// Create an event with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
            stopped: false,
            result: None,
            result_details: HashMap::new(),
            call_count: None,
            values: Values::new(),
        }
    }

    /// Create an event with a generated name, unique within this process.
    pub fn unnamed() -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed) + 1;
        Self::new(format!("{PREFIX}unnamed{id}"))
    }

    /// Create an event by copying every field of `template`.
    ///
    /// Results, the propagation flag and the target are carried over too.
    pub fn from_template(template: &Event) -> Self {
        template.clone()
    }

    /// The name [`PREFIX`] + `name`, used for convention-derived events.
    pub fn reserved_name(name: &str) -> String {
        format!("{PREFIX}{name}")
    }

    /// Merge extension values on top of this event (builder form).
    pub fn with_values(mut self, values: Values) -> Self {
        self.extend_values(values);
        self
    }

    /// Set a single extension value (builder form).
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_value(key, value);
        self
    }

    /// Shallow-merge `values` into the extension map. Later keys win.
    pub fn extend_values(&mut self, values: Values) {
        self.values.extend(values);
    }

    /// Set a single extension value, returning the previous one.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Get an extension value.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// All extension values.
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// The dispatch key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dispatcher that sent this event, if it is still alive.
    pub fn target(&self) -> Option<EventDispatcher> {
        self.target.as_ref().and_then(WeakDispatcher::upgrade)
    }

    pub(crate) fn set_target(&mut self, target: WeakDispatcher) {
        self.target = Some(target);
    }

    /// Mark this event as stopped.
    ///
    /// The dispatcher keeps invoking listeners unless it was built with
    /// `halt_on_stop`; cooperating listeners check [`is_stopped`](Event::is_stopped).
    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    /// Whether [`stop_propagation`](Event::stop_propagation) was called.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Record a result under the next sequential key.
    ///
    /// The key is the number of details already present, so listeners that
    /// never pass an id fill keys `0, 1, 2, ...`.
    pub fn set_result(&mut self, result: impl Into<Value>) {
        let id = ResultKey::Index(self.result_details.len());
        self.set_result_as(id, result);
    }

    /// Record a result under an explicit key.
    pub fn set_result_as(&mut self, id: impl Into<ResultKey>, result: impl Into<Value>) {
        let result = result.into();
        self.result = Some(result.clone());
        self.result_details.insert(id.into(), result);
    }

    /// The latest result when `id` is `None`, otherwise the detail for `id`.
    pub fn get_result(&self, id: Option<ResultKey>) -> Option<&Value> {
        match id {
            None => self.result(),
            Some(id) => self.result_details.get(&id),
        }
    }

    /// The most recently recorded result.
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// The result recorded under `id`.
    pub fn result_of(&self, id: impl Into<ResultKey>) -> Option<&Value> {
        self.result_details.get(&id.into())
    }

    /// Every recorded result by key.
    pub fn result_details(&self) -> &HashMap<ResultKey, Value> {
        &self.result_details
    }

    /// Number of listener invocations of the last dispatch, 0 if unset.
    pub fn call_count(&self) -> usize {
        self.call_count.unwrap_or(0)
    }

    /// Number of listener invocations, `None` when no listener list existed
    /// for the name at dispatch time.
    pub fn call_count_opt(&self) -> Option<usize> {
        self.call_count
    }

    pub(crate) fn set_call_count(&mut self, count: usize) {
        self.call_count = Some(count);
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::unnamed()
    }
}

impl From<&str> for Event {
    fn from(name: &str) -> Self {
        Event::new(name)
    }
}

impl From<String> for Event {
    fn from(name: String) -> Self {
        Event::new(name)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("has_target", &self.target().is_some())
            .field("stopped", &self.stopped)
            .field("result", &self.result)
            .field("result_details", &self.result_details)
            .field("call_count", &self.call_count)
            .field("values", &self.values)
            .finish()
    }
}
