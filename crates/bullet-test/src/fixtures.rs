//! Test fixtures for dispatchers and callbacks.

use std::sync::Arc;

use bullet_events::{Callback, Dispatcher, Scheduler};

use crate::mocks::ManualScheduler;

/// Create a synchronous dispatcher with default settings.
#[must_use]
pub fn test_dispatcher<T: Send + 'static>() -> Dispatcher<T> {
    Dispatcher::new()
}

/// Create a strict-mode dispatcher with `events` declared.
///
/// # Panics
///
/// Panics if any event name is empty.
#[must_use]
pub fn strict_dispatcher<T: Send + 'static>(events: &[&str]) -> Dispatcher<T> {
    Dispatcher::builder()
        .strict_mode(true)
        .declare_all(events.iter().copied())
        .build()
        .expect("Failed to build strict dispatcher")
}

/// Create a dispatcher whose triggers are queued on a [`ManualScheduler`].
///
/// # Panics
///
/// Panics if the dispatcher cannot be built.
#[must_use]
pub fn deferred_dispatcher<T: Send + 'static>() -> (Dispatcher<T>, Arc<ManualScheduler>) {
    let scheduler = Arc::new(ManualScheduler::new());
    let dispatcher = Dispatcher::builder()
        .scheduler(Arc::clone(&scheduler) as Arc<dyn Scheduler>)
        .build()
        .expect("Failed to build deferred dispatcher");
    (dispatcher, scheduler)
}

/// Create a callback that does nothing.
#[must_use]
pub fn noop_callback<T>() -> Callback<T> {
    Callback::new(|_: Option<&T>| {})
}

/// Create a callback that panics with `message`.
#[must_use]
pub fn panicking_callback<T>(message: &'static str) -> Callback<T> {
    Callback::new(move |_: Option<&T>| panic!("{message}"))
}
