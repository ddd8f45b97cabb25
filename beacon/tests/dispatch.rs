//! Dispatch ordering, targets, counts and failures.

use beacon::{
    BoxError, Event, EventDispatcher, Listener, Values, serde_json::json,
    testing::{CountingListener, FailingListener, OrderProbe, RecordingListener},
};

mod common;
use common::{Journal, init_tracing};

#[test]
fn test_ping_reaches_listener_with_target() {
    init_tracing();
    let dispatcher = EventDispatcher::new();
    let recorder = RecordingListener::new();
    dispatcher.on("ping", recorder.listener());

    let event = dispatcher.dispatch_event("ping").unwrap();

    assert_eq!(recorder.count(), 1);
    let seen = &recorder.events()[0];
    assert_eq!(seen.name(), "ping");
    assert_eq!(seen.target(), Some(dispatcher.clone()));
    assert_eq!(event.target(), Some(dispatcher));
}

#[test]
fn test_listeners_run_in_registration_order() {
    let dispatcher = EventDispatcher::new();
    let probe = OrderProbe::new();
    for id in 0..5 {
        dispatcher.on("tick", probe.listener(id));
    }

    let event = dispatcher.dispatch_event("tick").unwrap();

    assert_eq!(probe.order(), vec![0, 1, 2, 3, 4]);
    assert_eq!(event.call_count(), 5);
}

#[test]
fn test_same_listener_registered_twice_runs_twice() {
    let dispatcher = EventDispatcher::new();
    let counter = CountingListener::new();
    dispatcher.on("tick", counter.listener());
    dispatcher.on("tick", counter.listener());

    let event = dispatcher.dispatch_event("tick").unwrap();
    assert_eq!(counter.count(), 2);
    assert_eq!(event.call_count(), 2);
}

#[test]
fn test_unregistered_name_leaves_registry_untouched() {
    let dispatcher = EventDispatcher::new();
    let counter = CountingListener::new();
    dispatcher.on("known", counter.listener());
    dispatcher.on("*", counter.listener());

    let event = dispatcher.dispatch_event("unknown").unwrap();

    assert_eq!(event.call_count_opt(), None);
    assert_eq!(event.call_count(), 0);
    assert_eq!(event.target(), Some(dispatcher.clone()));
    assert_eq!(counter.count(), 0);
    let mut names = dispatcher.event_names();
    names.sort();
    assert_eq!(names, vec!["*", "known"]);
}

#[test]
fn test_dispatching_an_existing_event_reuses_it() {
    let dispatcher = EventDispatcher::new();
    dispatcher.on("save", |event: &mut Event| {
        let path = event.value("path").cloned().unwrap_or_default();
        event.set_result(path);
    });

    let event = Event::new("save").with_value("path", "/tmp/a");
    let event = dispatcher.dispatch_event(event).unwrap();

    assert_eq!(event.result(), Some(&json!("/tmp/a")));
    assert_eq!(event.value("path"), Some(&json!("/tmp/a")));
}

#[test]
fn test_dispatch_with_merges_values() {
    let dispatcher = EventDispatcher::new();
    dispatcher.on("resize", |event: &mut Event| {
        let area = event.value("w").and_then(|w| w.as_u64()).unwrap_or(0)
            * event.value("h").and_then(|h| h.as_u64()).unwrap_or(0);
        event.set_value("area", area);
    });

    let mut values = Values::new();
    values.insert("w".into(), json!(4));
    values.insert("h".into(), json!(3));
    let template = Event::new("resize").with_value("w", 1);

    let event = dispatcher.dispatch_event_with(template, values).unwrap();
    assert_eq!(event.value("w"), Some(&json!(4)));
    assert_eq!(event.value("area"), Some(&json!(12)));
}

#[test]
fn test_unnamed_events_get_reserved_names() {
    let first = Event::unnamed();
    let second = Event::default();

    assert!(first.name().starts_with(beacon::PREFIX));
    assert!(first.name().contains("unnamed"));
    assert_ne!(first.name(), second.name());

    let dispatcher = EventDispatcher::new();
    let journal = Journal::new();
    dispatcher.on(first.name(), journal.writer("hit"));
    dispatcher.dispatch_event(first).unwrap();
    dispatcher.dispatch_event(second).unwrap();
    assert_eq!(journal.entries(), vec!["hit"]);
}

#[test]
fn test_listener_error_aborts_dispatch() {
    init_tracing();
    let dispatcher = EventDispatcher::new();
    let journal = Journal::new();
    let failing = FailingListener::new("disk full");

    dispatcher.on("save", journal.writer("before"));
    dispatcher.on("save", failing.listener());
    dispatcher.on("save", journal.writer("after"));
    dispatcher.on("*", journal.writer("wildcard"));

    let err = dispatcher.dispatch_event("save").unwrap_err();

    assert_eq!(err.to_string(), "disk full");
    assert_eq!(failing.attempts(), 1);
    assert_eq!(journal.entries(), vec!["before"]);
    assert!(dispatcher.has_event_listener("save"));
}

#[test]
fn test_listener_error_is_returned_unmodified() {
    let dispatcher = EventDispatcher::new();
    dispatcher.on("read", |_event: &mut Event| -> Result<(), std::io::Error> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
    });

    let err: BoxError = dispatcher.dispatch_event("read").unwrap_err();
    let io = err.downcast_ref::<std::io::Error>().unwrap();
    assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn test_stop_propagation_is_advisory_by_default() {
    let dispatcher = EventDispatcher::new();
    let journal = Journal::new();
    dispatcher.on("close", |event: &mut Event| event.stop_propagation());
    dispatcher.on("close", journal.writer("second"));
    dispatcher.on("*", journal.writer("wildcard"));

    let event = dispatcher.dispatch_event("close").unwrap();

    assert!(event.is_stopped());
    assert_eq!(event.call_count(), 3);
    assert_eq!(journal.entries(), vec!["second", "wildcard"]);
}

#[test]
fn test_cooperating_listener_honours_stop() {
    let dispatcher = EventDispatcher::new();
    let journal = Journal::new();
    dispatcher.on("close", |event: &mut Event| event.stop_propagation());
    let cooperative = journal.clone();
    dispatcher.on("close", move |event: &mut Event| {
        if !event.is_stopped() {
            cooperative.push("ran");
        }
    });

    dispatcher.dispatch_event("close").unwrap();
    assert!(journal.entries().is_empty());
}

#[test]
fn test_halt_on_stop_skips_remaining_listeners() {
    let dispatcher = EventDispatcher::builder().halt_on_stop(true).build();
    let journal = Journal::new();
    dispatcher.on("close", journal.writer("first"));
    dispatcher.on("close", |event: &mut Event| event.stop_propagation());
    dispatcher.on("close", journal.writer("third"));
    dispatcher.on("*", journal.writer("wildcard"));

    let event = dispatcher.dispatch_event("close").unwrap();

    assert!(dispatcher.config().halt_on_stop);
    assert_eq!(event.call_count(), 2);
    assert_eq!(journal.entries(), vec!["first"]);
}

#[test]
fn test_builder_registers_initial_listeners() {
    let journal = Journal::new();
    let dispatcher = EventDispatcher::builder()
        .listener("boot", journal.writer("a"))
        .listener("boot", journal.writer("b"))
        .build();

    assert_eq!(dispatcher.listener_count("boot"), 2);
    dispatcher.dispatch_event("boot").unwrap();
    assert_eq!(journal.entries(), vec!["a", "b"]);
}

#[test]
fn test_listener_sees_binding() {
    let dispatcher = EventDispatcher::new();
    let probe = dispatcher.downgrade();
    dispatcher.on(
        "bind",
        Listener::new(move |this, event: &mut Event| {
            let bound = match (this.dispatcher(), probe.upgrade()) {
                (Some(this), Some(expected)) => this.ptr_eq(&expected),
                _ => false,
            };
            event.set_result(bound);
        }),
    );

    let event = dispatcher.dispatch_event("bind").unwrap();
    assert_eq!(event.result(), Some(&json!(true)));
}
