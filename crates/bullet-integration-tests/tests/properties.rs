//! Dispatcher invariants, checked over a range of names and callbacks.

#![allow(clippy::arithmetic_side_effects)]

use std::panic::{AssertUnwindSafe, catch_unwind};

use bullet_events::{Callback, Dispatcher};
use bullet_test::{CallRecorder, OrderLog, noop_callback, panicking_callback, test_dispatcher};

const NAMES: &[&str] = &["a", "ping", "user:joined", "with space", "ünïcödé", "x.y.z"];

#[test]
fn register_then_unregister_round_trips() {
    for name in NAMES {
        let dispatcher: Dispatcher<()> = test_dispatcher();
        let cb = noop_callback();

        dispatcher.on(name, &cb).unwrap();
        let snap = dispatcher.inspect();
        assert_eq!(snap[*name].count, 1, "{name}");
        assert!(snap[*name].contains(cb.id()));

        dispatcher.off(name, &cb).unwrap();
        assert!(!dispatcher.inspect().contains_key(*name), "{name}");
    }
}

#[test]
fn unregister_keeps_binding_with_other_registrations() {
    let dispatcher: Dispatcher<()> = test_dispatcher();
    let a = noop_callback();
    let b = noop_callback();

    dispatcher.on("ping", &a).unwrap();
    dispatcher.on("ping", &b).unwrap();
    dispatcher.off("ping", &a).unwrap();

    let snap = dispatcher.inspect();
    assert_eq!(snap["ping"].count, 1);
    assert_eq!(snap["ping"].registrations.len(), snap["ping"].count);
}

#[test]
fn registering_same_identity_twice_is_idempotent() {
    let dispatcher: Dispatcher<()> = test_dispatcher();
    let recorder = CallRecorder::new();

    for _ in 0..3 {
        dispatcher.on("ping", recorder.callback()).unwrap();
        dispatcher.on("ping", &recorder.callback().clone()).unwrap();
    }

    assert_eq!(dispatcher.listener_count("ping"), 1);
    dispatcher.trigger("ping", None).unwrap();
    assert_eq!(recorder.count(), 1);
}

#[test]
fn identical_closures_are_distinct_registrations() {
    let dispatcher: Dispatcher<()> = test_dispatcher();
    let a = noop_callback();
    let b = noop_callback();

    dispatcher.on("ping", &a).unwrap();
    dispatcher.on("ping", &b).unwrap();
    assert_eq!(dispatcher.listener_count("ping"), 2);
}

#[test]
fn once_registration_is_removed_after_firing() {
    let dispatcher: Dispatcher<()> = test_dispatcher();
    let recorder = CallRecorder::new();

    dispatcher.once("ping", recorder.callback()).unwrap();
    dispatcher.trigger("ping", None).unwrap();
    assert!(!dispatcher.inspect().contains_key("ping"));

    dispatcher.trigger("ping", None).unwrap();
    assert_eq!(recorder.count(), 1);
}

#[test]
fn callbacks_run_in_registration_order() {
    let dispatcher: Dispatcher<()> = test_dispatcher();
    let log = OrderLog::new();
    let labels = ["one", "two", "three", "four", "five"];

    let callbacks: Vec<Callback<()>> = labels.iter().map(|l| log.callback(*l)).collect();
    for (idx, cb) in callbacks.iter().enumerate() {
        if idx % 2 == 0 {
            dispatcher.on("ping", cb).unwrap();
        } else {
            dispatcher.once("ping", cb).unwrap();
        }
    }

    dispatcher.trigger("ping", None).unwrap();
    assert_eq!(log.entries(), labels);

    log.clear();
    dispatcher.trigger("ping", None).unwrap();
    assert_eq!(log.entries(), vec!["one", "three", "five"]);
}

#[test]
fn reregistering_does_not_move_position() {
    let dispatcher: Dispatcher<()> = test_dispatcher();
    let log = OrderLog::new();
    let first = log.callback("first");
    let second = log.callback("second");

    dispatcher.on("ping", &first).unwrap();
    dispatcher.on("ping", &second).unwrap();
    dispatcher.register("ping", &first, Some(false)).unwrap();
    dispatcher.trigger("ping", None).unwrap();

    assert_eq!(log.entries(), vec!["first", "second"]);
}

#[test]
fn inspect_returns_isolated_copy() {
    let dispatcher: Dispatcher<()> = test_dispatcher();
    let cb = noop_callback();
    dispatcher.once("ping", &cb).unwrap();

    let before = dispatcher.inspect();
    let mut copy = dispatcher.inspect();
    copy.get_mut("ping").unwrap().registrations[0].once = false;
    copy.clear();

    assert_eq!(dispatcher.inspect(), before);
}

#[test]
fn snapshot_serializes_for_debugging() {
    let dispatcher: Dispatcher<()> = test_dispatcher();
    let cb = noop_callback();
    dispatcher.once("ping", &cb).unwrap();

    let json = serde_json::to_value(dispatcher.inspect()).unwrap();
    assert_eq!(json["ping"]["count"], 1);
    assert_eq!(json["ping"]["registrations"][0]["once"], true);
    assert_eq!(
        json["ping"]["registrations"][0]["callback"],
        cb.id().to_string()
    );
}

#[test]
fn unregister_all_empties_table() {
    let dispatcher: Dispatcher<()> = test_dispatcher();
    for name in NAMES {
        dispatcher.on(name, &noop_callback()).unwrap();
        dispatcher.once(name, &noop_callback()).unwrap();
    }
    assert_eq!(dispatcher.event_count(), NAMES.len());

    dispatcher.off_all();
    assert!(dispatcher.inspect().is_empty());
    assert!(dispatcher.is_empty());
}

#[test]
fn failed_operations_leave_state_unchanged() {
    let dispatcher: Dispatcher<()> = test_dispatcher();
    let cb = noop_callback();
    dispatcher.on("ping", &cb).unwrap();
    let before = dispatcher.inspect();

    assert!(dispatcher.on("", &cb).is_err());
    assert!(dispatcher.off("", &cb).is_err());
    assert!(dispatcher.trigger("", None).is_err());
    assert!(
        dispatcher
            .replace_callback("pong", &cb, &noop_callback(), None)
            .is_err()
    );
    assert!(dispatcher.on_any(["pong", ""], &cb).is_err());
    assert!(dispatcher.declare_events(["ok", ""]).is_err());

    assert_eq!(dispatcher.inspect(), before);
    assert!(dispatcher.declared_events().is_empty());
}

#[test]
fn reentrant_once_runs_exactly_once() {
    let dispatcher: Dispatcher<u32> = test_dispatcher();
    let weak = dispatcher.downgrade();
    let recorder = CallRecorder::new();
    let inner = recorder.callback().clone();

    let cb = Callback::new(move |data: Option<&u32>| {
        inner.call(data);
        let depth = data.copied().unwrap_or(0);
        if depth < 3
            && let Some(dispatcher) = weak.upgrade()
        {
            dispatcher.trigger("ping", Some(depth + 1)).unwrap();
        }
    });

    dispatcher.once("ping", &cb).unwrap();
    dispatcher.trigger("ping", Some(0)).unwrap();

    assert_eq!(recorder.calls(), vec![Some(0)]);
    assert!(dispatcher.is_empty());
}

#[test]
fn panicking_once_callback_is_not_consumed() {
    let dispatcher: Dispatcher<()> = test_dispatcher();
    let bad: Callback<()> = panicking_callback("callback failed");
    let after = CallRecorder::new();

    dispatcher.once("ping", &bad).unwrap();
    dispatcher.on("ping", after.callback()).unwrap();

    for _ in 0..2 {
        let result = catch_unwind(AssertUnwindSafe(|| dispatcher.trigger("ping", None)));
        assert!(result.is_err());
    }
    assert_eq!(after.count(), 0);
    assert!(dispatcher.inspect()["ping"].get(bad.id()).unwrap().once);

    dispatcher.off("ping", &bad).unwrap();
    dispatcher.trigger("ping", None).unwrap();
    assert_eq!(after.count(), 1);
}

#[test]
fn declare_events_with_empty_name_declares_nothing() {
    let dispatcher: Dispatcher<()> = test_dispatcher();

    for batch in [vec!["", "a"], vec!["a", ""], vec!["a", "b", ""]] {
        assert!(dispatcher.declare_events(batch).is_err());
        assert!(dispatcher.declared_events().is_empty());
    }
}
