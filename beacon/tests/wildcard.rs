//! Wildcard listeners and the standard listeners built for them.

use beacon::{
    EventDispatcher, WILDCARD,
    listeners::{FilterListener, LoggingListener},
    testing::RecordingListener,
};

mod common;
use common::{Journal, init_tracing};

#[test]
fn test_wildcard_runs_after_named_listeners() {
    let dispatcher = EventDispatcher::new();
    let journal = Journal::new();
    dispatcher.on(WILDCARD, journal.tagged("any"));
    dispatcher.on("open", journal.tagged("open"));
    dispatcher.on("close", journal.tagged("close"));
    dispatcher.on("open", journal.tagged("open2"));

    let opened = dispatcher.dispatch_event("open").unwrap();
    let closed = dispatcher.dispatch_event("close").unwrap();

    assert_eq!(
        journal.entries(),
        vec!["open:open", "open2:open", "any:open", "close:close", "any:close"]
    );
    assert_eq!(opened.call_count(), 3);
    assert_eq!(closed.call_count(), 2);
}

#[test]
fn test_wildcard_skipped_for_unregistered_names() {
    let dispatcher = EventDispatcher::new();
    let recorder = RecordingListener::new();
    dispatcher.on(WILDCARD, recorder.listener());

    dispatcher.dispatch_event("nobody-listens").unwrap();
    assert_eq!(recorder.count(), 0);
}

#[test]
fn test_dispatching_wildcard_runs_its_list_twice() {
    let dispatcher = EventDispatcher::new();
    let recorder = RecordingListener::new();
    dispatcher.on(WILDCARD, recorder.listener());

    let event = dispatcher.dispatch_event(WILDCARD).unwrap();
    assert_eq!(event.call_count(), 2);
    assert_eq!(recorder.names(), vec!["*", "*"]);
}

#[test]
fn test_wildcard_added_by_named_listener_runs_same_dispatch() {
    let dispatcher = EventDispatcher::new();
    let journal = Journal::new();
    let late = journal.writer("wildcard");
    dispatcher.once(
        "boot",
        beacon::Listener::new(move |this, _event: &mut beacon::Event| {
            if let Some(dispatcher) = this.dispatcher() {
                dispatcher.on(WILDCARD, late.clone());
            }
        }),
    );

    dispatcher.dispatch_event("boot").unwrap();
    assert_eq!(journal.entries(), vec!["wildcard"]);
}

#[test]
fn test_filtered_wildcard_logging() {
    init_tracing();
    let dispatcher = EventDispatcher::new();
    let recorder = RecordingListener::new();
    let logger = LoggingListener::named("audit");

    dispatcher.on(WILDCARD, logger.into_listener());
    dispatcher.on(
        WILDCARD,
        FilterListener::new(|event: &beacon::Event| event.name().starts_with("user.")).then(recorder.listener()),
    );
    dispatcher.on("user.login", |_event: &mut beacon::Event| {});
    dispatcher.on("cache.miss", |_event: &mut beacon::Event| {});

    dispatcher.dispatch_event("user.login").unwrap();
    dispatcher.dispatch_event("cache.miss").unwrap();

    assert_eq!(recorder.names(), vec!["user.login"]);
}
