//! Deferred dispatch through an injected scheduler.

use std::sync::Arc;
use std::time::Duration;

use bullet_events::{Callback, DispatchError, Dispatcher, Scheduler, TokioScheduler};
use bullet_test::{CallRecorder, ManualScheduler, OrderLog, deferred_dispatcher, noop_callback};
use tokio::sync::mpsc;

#[test]
fn trigger_returns_before_callbacks_run() {
    let (dispatcher, scheduler) = deferred_dispatcher::<u32>();
    let recorder = CallRecorder::new();
    dispatcher.on("tick", recorder.callback()).unwrap();

    dispatcher.trigger("tick", Some(7)).unwrap();
    assert_eq!(recorder.count(), 0);
    assert_eq!(scheduler.pending(), 1);

    scheduler.run_pending();
    assert_eq!(recorder.calls(), vec![Some(7)]);
}

#[test]
fn validation_errors_are_returned_synchronously() {
    let (dispatcher, scheduler) = deferred_dispatcher::<()>();
    dispatcher.set_strict_mode(true);

    assert!(matches!(
        dispatcher.trigger("tick", None),
        Err(DispatchError::UndeclaredEvent { .. })
    ));
    dispatcher.declare_event("tick").unwrap();
    assert!(matches!(
        dispatcher.trigger("tick", None),
        Err(DispatchError::UnmappedEvent { .. })
    ));
    assert!(dispatcher.trigger("", None).is_err());
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn unbound_trigger_schedules_nothing() {
    let (dispatcher, scheduler) = deferred_dispatcher::<()>();
    dispatcher.trigger("nobody", None).unwrap();
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn dispatch_sees_registry_at_run_time() {
    let (dispatcher, scheduler) = deferred_dispatcher::<()>();
    let early = CallRecorder::new();
    let late = CallRecorder::new();

    dispatcher.on("tick", early.callback()).unwrap();
    dispatcher.trigger("tick", None).unwrap();

    dispatcher.off("tick", early.callback()).unwrap();
    dispatcher.on("tick", late.callback()).unwrap();
    scheduler.run_pending();

    assert_eq!(early.count(), 0);
    assert_eq!(late.count(), 1);
}

#[test]
fn queued_once_fires_a_single_time() {
    let (dispatcher, scheduler) = deferred_dispatcher::<()>();
    let recorder = CallRecorder::new();
    dispatcher.once("tick", recorder.callback()).unwrap();

    dispatcher.trigger("tick", None).unwrap();
    dispatcher.trigger("tick", None).unwrap();
    assert_eq!(scheduler.pending(), 2);

    scheduler.run_pending();
    assert_eq!(recorder.count(), 1);
    assert!(dispatcher.is_empty());
}

#[test]
fn trigger_many_queues_in_order() {
    let (dispatcher, scheduler) = deferred_dispatcher::<()>();
    let log = OrderLog::new();
    dispatcher.on("a", &log.callback("a")).unwrap();
    dispatcher.on("b", &log.callback("b")).unwrap();

    dispatcher
        .trigger_many([("b", None), ("a", None), ("b", None)])
        .unwrap();
    assert_eq!(scheduler.pending(), 3);

    scheduler.run_pending();
    assert_eq!(log.entries(), vec!["b", "a", "b"]);
}

#[test]
fn async_flag_off_dispatches_inline() {
    let (dispatcher, scheduler) = deferred_dispatcher::<()>();
    let recorder = CallRecorder::new();
    dispatcher.on("tick", recorder.callback()).unwrap();
    assert!(dispatcher.defers_dispatch());

    dispatcher.set_async_dispatch(false);
    assert!(!dispatcher.defers_dispatch());
    dispatcher.trigger("tick", None).unwrap();

    assert_eq!(recorder.count(), 1);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn async_flag_without_scheduler_dispatches_inline() {
    let dispatcher: Dispatcher<()> = Dispatcher::builder().async_dispatch(true).build().unwrap();
    let recorder = CallRecorder::new();
    dispatcher.on("tick", recorder.callback()).unwrap();

    assert!(dispatcher.async_dispatch());
    assert!(!dispatcher.defers_dispatch());
    dispatcher.trigger("tick", None).unwrap();
    assert_eq!(recorder.count(), 1);
}

#[test]
fn queued_job_outlives_dispatcher_handle() {
    let scheduler = Arc::new(ManualScheduler::new());
    let recorder = CallRecorder::new();
    {
        let dispatcher: Dispatcher<()> = Dispatcher::builder()
            .scheduler(Arc::clone(&scheduler) as Arc<dyn Scheduler>)
            .build()
            .unwrap();
        dispatcher.on("tick", recorder.callback()).unwrap();
        dispatcher.trigger("tick", None).unwrap();
    }

    scheduler.run_pending();
    assert_eq!(recorder.count(), 1);
}

#[test]
fn concurrent_triggers_fire_once_registration_once() {
    let dispatcher: Dispatcher<()> = Dispatcher::new();
    let recorder = CallRecorder::new();
    dispatcher.once("tick", recorder.callback()).unwrap();
    dispatcher.on("tick", &noop_callback()).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let dispatcher = dispatcher.clone();
            scope.spawn(move || {
                for _ in 0..16 {
                    dispatcher.trigger("tick", None).unwrap();
                }
            });
        }
    });

    assert_eq!(recorder.count(), 1);
    assert_eq!(dispatcher.listener_count("tick"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn tokio_scheduler_runs_callbacks_on_runtime() {
    let dispatcher: Dispatcher<u32> = Dispatcher::builder().tokio_current().build().unwrap();
    assert!(dispatcher.defers_dispatch());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let cb = Callback::new(move |data: Option<&u32>| {
        let _ = tx.send(data.copied());
    });
    dispatcher.on("tick", &cb).unwrap();

    dispatcher.trigger("tick", Some(1)).unwrap();
    dispatcher.trigger("tick", Some(2)).unwrap();

    let mut received = Vec::new();
    for _ in 0..2 {
        let value = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        received.push(value);
    }
    received.sort();
    assert_eq!(received, vec![Some(1), Some(2)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn tokio_scheduler_contains_callback_panics() {
    let scheduler = Arc::new(TokioScheduler::try_current().unwrap());
    let dispatcher: Dispatcher<()> = Dispatcher::builder()
        .scheduler(scheduler as Arc<dyn Scheduler>)
        .build()
        .unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    dispatcher
        .on("boom", &Callback::new(|_: Option<&()>| panic!("boom")))
        .unwrap();
    dispatcher
        .on(
            "ok",
            &Callback::new(move |_: Option<&()>| {
                let _ = tx.send(());
            }),
        )
        .unwrap();

    dispatcher.trigger("boom", None).unwrap();
    dispatcher.trigger("ok", None).unwrap();

    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
}

#[test]
fn tokio_current_outside_runtime_stays_synchronous() {
    let dispatcher: Dispatcher<()> = Dispatcher::builder().tokio_current().build().unwrap();
    assert!(!dispatcher.defers_dispatch());
}
