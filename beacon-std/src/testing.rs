//! Testing utilities for Beacon.
//!
//! This module provides listeners that make dispatch behaviour easy to
//! assert on.
//!
//! # Features
//!
//! - [`RecordingListener`]: Records a copy of every event it receives
//! - [`CountingListener`]: Counts invocations
//! - [`FailingListener`]: Fails every invocation with a fixed message
//! - [`OrderProbe`]: Records which of several listeners ran, in order

use beacon_core::{Event, Listener};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

// ============================================================================
// Recording Listener
// ============================================================================

/// A listener that records every event it receives.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingListener::new();
/// dispatcher.on("*", recorder.listener());
///
/// dispatcher.dispatch_event("saved")?;
/// assert_eq!(recorder.names(), vec!["saved"]);
/// ```
#[derive(Clone)]
pub struct RecordingListener {
    events: Rc<RefCell<Vec<Event>>>,
    listener: Listener,
}

impl RecordingListener {
    /// Create a new recording listener.
    pub fn new() -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let listener = Listener::from_fn(move |event: &mut Event| {
            sink.borrow_mut().push(event.clone());
        });
        Self { events, listener }
    }

    /// The listener handle. Every clone shares the same record.
    pub fn listener(&self) -> Listener {
        self.listener.clone()
    }

    /// Get a clone of the recorded events.
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Names of the recorded events, in arrival order.
    pub fn names(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .map(|event| event.name().to_owned())
            .collect()
    }

    /// Get the number of recorded events.
    pub fn count(&self) -> usize {
        self.events.borrow().len()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Default for RecordingListener {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Counting Listener
// ============================================================================

/// A listener that counts invocations.
#[derive(Clone)]
pub struct CountingListener {
    count: Rc<Cell<usize>>,
    listener: Listener,
}

impl CountingListener {
    /// Create a new counting listener.
    pub fn new() -> Self {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let listener = Listener::from_fn(move |_event: &mut Event| {
            counter.set(counter.get() + 1);
        });
        Self { count, listener }
    }

    /// The listener handle.
    pub fn listener(&self) -> Listener {
        self.listener.clone()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.get()
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.set(0);
    }
}

impl Default for CountingListener {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Failing Listener
// ============================================================================

/// A listener that fails every invocation.
#[derive(Clone)]
pub struct FailingListener {
    attempts: Rc<Cell<usize>>,
    listener: Listener,
}

impl FailingListener {
    /// Create a listener failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let attempts = Rc::new(Cell::new(0));
        let counter = attempts.clone();
        let listener = Listener::from_fn(move |_event: &mut Event| {
            counter.set(counter.get() + 1);
            Err::<(), _>(message.clone())
        });
        Self { attempts, listener }
    }

    /// The listener handle.
    pub fn listener(&self) -> Listener {
        self.listener.clone()
    }

    /// How many times the listener ran.
    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

// ============================================================================
// Order Probe
// ============================================================================

/// Hands out listeners that record their id when invoked.
///
/// # Example
///
/// ```rust,ignore
/// let probe = OrderProbe::new();
/// dispatcher.on("x", probe.listener(1));
/// dispatcher.on("x", probe.listener(2));
///
/// dispatcher.dispatch_event("x")?;
/// assert_eq!(probe.order(), vec![1, 2]);
/// ```
#[derive(Clone, Default)]
pub struct OrderProbe {
    order: Rc<RefCell<Vec<usize>>>,
}

impl OrderProbe {
    /// Create a new probe.
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener recording `id`.
    pub fn listener(&self, id: usize) -> Listener {
        let order = self.order.clone();
        Listener::from_fn(move |_event: &mut Event| order.borrow_mut().push(id))
    }

    /// The recorded ids, in invocation order.
    pub fn order(&self) -> Vec<usize> {
        self.order.borrow().clone()
    }

    /// Clear the record.
    pub fn clear(&self) {
        self.order.borrow_mut().clear();
    }
}
