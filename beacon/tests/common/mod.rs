#![allow(dead_code)]

use beacon::{Event, EventDispatcher, EventTarget, Listener};
use std::{cell::RefCell, rc::Rc, sync::Once};

// ============================================================================
// Logging
// ============================================================================

static TRACING: Once = Once::new();

/// Install a test subscriber once per test binary. Honours `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Journal
// ============================================================================

/// Shared log of labels written by listeners.
#[derive(Clone, Default)]
pub struct Journal {
    entries: Rc<RefCell<Vec<String>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener writing `label` on every invocation.
    pub fn writer(&self, label: &str) -> Listener {
        let entries = self.entries.clone();
        let label = label.to_owned();
        Listener::from_fn(move |_event: &mut Event| entries.borrow_mut().push(label.clone()))
    }

    /// A listener writing `label:<event name>` on every invocation.
    pub fn tagged(&self, label: &str) -> Listener {
        let entries = self.entries.clone();
        let label = label.to_owned();
        Listener::from_fn(move |event: &mut Event| {
            entries
                .borrow_mut()
                .push(format!("{label}:{}", event.name()))
        })
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

// ============================================================================
// Test Hosts
// ============================================================================

/// A host embedding a dispatcher by hand.
#[derive(Default)]
pub struct Uploader {
    pub events: EventDispatcher,
    pub sent: RefCell<Vec<String>>,
}

impl EventTarget for Uploader {
    fn event_dispatcher(&self) -> &EventDispatcher {
        &self.events
    }
}

impl Uploader {
    pub fn upload(&self, file: &str) -> Result<Event, beacon::BoxError> {
        self.sent.borrow_mut().push(file.to_owned());
        self.dispatch_event(Event::new("uploaded").with_value("file", file))
    }
}
