//! The dispatcher: named-event registration, removal and triggering.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, trace, warn};

use crate::builder::DispatcherBuilder;
use crate::callback::{Callback, CallbackId, Subscription};
use crate::error::{DispatchError, DispatchResult, Operation};
use crate::name::EventName;
use crate::scheduler::Scheduler;
use crate::table::{Binding, EventTable, EventTableSnapshot};

/// Named-event dispatcher.
///
/// Callbacks are registered against event names and invoked, in
/// registration order, when the event is triggered. A registration made with
/// [`once`](Self::once) removes itself after its first successful
/// invocation.
///
/// In strict mode every event name must be declared with
/// [`declare_event`](Self::declare_event) before it can be registered,
/// removed or triggered.
///
/// Dispatch is synchronous unless a [`Scheduler`] was injected through the
/// [`builder`](Self::builder) and deferred dispatch is enabled, in which case
/// each trigger's invocation pass runs as a scheduled job.
///
/// Cloning a `Dispatcher` yields another handle to the same tables.
///
/// **WARNING:** a callback that captures a clone of its own dispatcher forms
/// an `Arc` reference cycle and will never be freed. Capture a
/// [`WeakDispatcher`] (see [`downgrade`](Self::downgrade)) instead.
///
/// # Example
///
/// ```rust
/// use bullet_events::{Callback, Dispatcher};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// # fn main() -> Result<(), bullet_events::DispatchError> {
/// let dispatcher: Dispatcher<u64> = Dispatcher::new();
/// let total = Arc::new(AtomicU64::new(0));
/// let total_clone = Arc::clone(&total);
///
/// let add = Callback::new(move |n: Option<&u64>| {
///     total_clone.fetch_add(n.copied().unwrap_or(0), Ordering::SeqCst);
/// });
///
/// dispatcher.on("add", &add)?;
/// dispatcher.trigger("add", Some(2))?;
/// dispatcher.trigger("add", Some(3))?;
/// assert_eq!(total.load(Ordering::SeqCst), 5);
/// # Ok(())
/// # }
/// ```
pub struct Dispatcher<T = serde_json::Value> {
    inner: Arc<Inner<T>>,
}

/// Non-owning handle to a [`Dispatcher`].
pub struct WeakDispatcher<T = serde_json::Value> {
    inner: Weak<Inner<T>>,
}

struct Inner<T> {
    state: Mutex<State<T>>,
    scheduler: Option<Arc<dyn Scheduler>>,
}

struct State<T> {
    table: EventTable<T>,
    declared: BTreeSet<EventName>,
    strict_mode: bool,
    async_dispatch: bool,
}

impl<T> State<T> {
    fn check_declared(&self, name: &EventName, operation: Operation) -> DispatchResult<()> {
        if self.strict_mode && !self.declared.contains(name) {
            return Err(DispatchError::UndeclaredEvent {
                operation,
                event: name.to_string(),
            });
        }
        Ok(())
    }

    /// Non-empty, and declared when strict.
    fn validate(&self, raw: &str, operation: Operation) -> DispatchResult<EventName> {
        let name = EventName::parse(raw, operation)?;
        self.check_declared(&name, operation)?;
        Ok(name)
    }

    /// Non-empty, bound to at least one callback, and declared when strict.
    fn validate_mapped(&self, raw: &str, operation: Operation) -> DispatchResult<EventName> {
        let name = EventName::parse(raw, operation)?;
        if !self.table.contains(name.as_str()) {
            return Err(DispatchError::UnmappedEvent {
                operation,
                event: name.to_string(),
            });
        }
        self.check_declared(&name, operation)?;
        Ok(name)
    }

    /// Validation shared by `trigger` and `trigger_many`.
    ///
    /// Returns `None` when nothing is bound and strict mode is off.
    fn validate_trigger(
        &self,
        raw: &str,
        operation: Operation,
    ) -> DispatchResult<Option<EventName>> {
        let name = self.validate(raw, operation)?;
        if self.table.contains(name.as_str()) {
            return Ok(Some(name));
        }
        if self.strict_mode {
            return Err(DispatchError::UnmappedEvent {
                operation,
                event: name.to_string(),
            });
        }
        trace!(event = %name, "No callbacks mapped, trigger ignored");
        Ok(None)
    }
}

fn parse_all<I, S>(names: I, operation: Operation) -> DispatchResult<Vec<EventName>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| EventName::parse(n.as_ref(), operation))
        .collect()
}

impl<T> Inner<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        // The lock is never held while user code runs, so a poisoned guard
        // still protects consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one invocation pass over the binding for `event`.
    fn dispatch(&self, event: &EventName, data: Option<&T>) {
        let entries = {
            let state = self.lock();
            match state.table.get(event.as_str()) {
                Some(binding) => binding.entries(),
                None => return,
            }
        };

        trace!(event = %event, callbacks = entries.len(), "Dispatching event");

        for (id, seq) in entries {
            let Some((callback, once)) = self.claim(event.as_str(), id, seq) else {
                continue;
            };

            trace!(event = %event, callback = %id, once, "Invoking callback");

            if once {
                let claim = Claim {
                    inner: self,
                    event: event.as_str(),
                    id,
                    seq,
                    settled: false,
                };
                callback.call(data);
                claim.settle();
            } else {
                callback.call(data);
                self.consume_upgraded(event.as_str(), id, seq);
            }
        }
    }

    /// Fetch a registration for invocation.
    ///
    /// Skips registrations removed earlier in the pass (including ones
    /// removed and added again, which carry a new `seq`) and
    /// once-registrations already being run by another pass.
    /// Once-registrations are marked claimed until [`Claim`] settles or drops.
    fn claim(&self, event: &str, id: CallbackId, seq: u64) -> Option<(Callback<T>, bool)> {
        let mut state = self.lock();
        let registration = state.table.get_mut(event)?.get_mut(id)?;
        if registration.seq != seq || registration.claimed {
            return None;
        }
        if registration.once {
            registration.claimed = true;
        }
        Some((registration.callback.clone(), registration.once))
    }

    /// Release a claim after the callback returned normally.
    ///
    /// Removes the registration if it is still flagged `once`.
    fn consume(&self, event: &str, id: CallbackId, seq: u64) {
        let mut state = self.lock();
        let remove = match state.table.get_mut(event).and_then(|b| b.get_mut(id)) {
            Some(registration) if registration.seq == seq && registration.claimed => {
                registration.claimed = false;
                registration.once
            },
            _ => return,
        };
        if remove {
            state.table.remove_callback(event, id);
            debug!(event = %event, callback = %id, "Once callback consumed");
        }
    }

    /// Remove a registration that was made once-only while its own
    /// callback ran.
    fn consume_upgraded(&self, event: &str, id: CallbackId, seq: u64) {
        let mut state = self.lock();
        let upgraded = state
            .table
            .get_mut(event)
            .and_then(|b| b.get_mut(id))
            .is_some_and(|r| r.seq == seq && r.once && !r.claimed);
        if upgraded {
            state.table.remove_callback(event, id);
            debug!(event = %event, callback = %id, "Once callback consumed");
        }
    }

    /// Release a claim without consuming the registration.
    fn release(&self, event: &str, id: CallbackId, seq: u64) {
        let mut state = self.lock();
        if let Some(registration) = state.table.get_mut(event).and_then(|b| b.get_mut(id))
            && registration.seq == seq
        {
            registration.claimed = false;
        }
    }
}

/// Claim on a once-registration for the duration of its invocation.
///
/// Dropped without [`settle`](Self::settle) only when the callback panicked;
/// the registration then stays in place.
struct Claim<'a, T> {
    inner: &'a Inner<T>,
    event: &'a str,
    id: CallbackId,
    seq: u64,
    settled: bool,
}

impl<T> Claim<'_, T> {
    fn settle(mut self) {
        self.settled = true;
        self.inner.consume(self.event, self.id, self.seq);
    }
}

impl<T> Drop for Claim<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(
                event = %self.event,
                callback = %self.id,
                "Once callback panicked, registration kept"
            );
            self.inner.release(self.event, self.id, self.seq);
        }
    }
}

impl<T> Dispatcher<T>
where
    T: Send + 'static,
{
    /// Create a dispatcher with no scheduler (dispatch is synchronous),
    /// strict mode off and deferred dispatch enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(false, true, Vec::new(), None)
    }

    /// Start building a dispatcher.
    #[must_use]
    pub fn builder() -> DispatcherBuilder<T> {
        DispatcherBuilder::new()
    }

    pub(crate) fn from_parts(
        strict_mode: bool,
        async_dispatch: bool,
        declared: Vec<EventName>,
        scheduler: Option<Arc<dyn Scheduler>>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    table: EventTable::new(),
                    declared: declared.into_iter().collect(),
                    strict_mode,
                    async_dispatch,
                }),
                scheduler,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.inner.lock()
    }

    /// Create a non-owning handle, safe to capture inside callbacks.
    #[must_use]
    pub fn downgrade(&self) -> WeakDispatcher<T> {
        WeakDispatcher {
            inner: Arc::downgrade(&self.inner),
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register `callback` for `event`.
    ///
    /// Registering a callback that is already bound to `event` does not
    /// create a second registration. Its `once` flag is updated when `once`
    /// is `Some`, and left as is when `None`.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::EmptyEventName`] if `event` is empty.
    /// - [`DispatchError::UndeclaredEvent`] in strict mode if `event` is not declared.
    pub fn register(
        &self,
        event: impl AsRef<str>,
        callback: &Callback<T>,
        once: Option<bool>,
    ) -> DispatchResult<Subscription> {
        self.register_as(Operation::On, event.as_ref(), callback, once)
    }

    /// Register `callback` for `event`, keeping any existing `once` flag.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn on(
        &self,
        event: impl AsRef<str>,
        callback: &Callback<T>,
    ) -> DispatchResult<Subscription> {
        self.register_as(Operation::On, event.as_ref(), callback, None)
    }

    /// Register `callback` for `event` so that it fires at most once.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn once(
        &self,
        event: impl AsRef<str>,
        callback: &Callback<T>,
    ) -> DispatchResult<Subscription> {
        self.register_as(Operation::Once, event.as_ref(), callback, Some(true))
    }

    fn register_as(
        &self,
        operation: Operation,
        event: &str,
        callback: &Callback<T>,
        once: Option<bool>,
    ) -> DispatchResult<Subscription> {
        let mut state = self.lock();
        let name = state.validate(event, operation)?;
        let inserted = state.table.register(&name, callback, once);
        drop(state);

        if inserted {
            debug!(event = %name, callback = %callback.id(), ?once, "Callback registered");
        } else {
            debug!(event = %name, callback = %callback.id(), ?once, "Callback already registered");
        }

        Ok(Subscription::new(name, callback.id()))
    }

    /// Register several callbacks at once.
    ///
    /// Every entry is validated before any is registered.
    ///
    /// # Errors
    ///
    /// The first validation failure among the entries; nothing is registered.
    pub fn on_many<I, S>(&self, entries: I) -> DispatchResult<Vec<Subscription>>
    where
        I: IntoIterator<Item = (S, Callback<T>, Option<bool>)>,
        S: AsRef<str>,
    {
        let mut state = self.lock();
        let entries = entries
            .into_iter()
            .map(|(event, callback, once)| {
                state
                    .validate(event.as_ref(), Operation::OnMany)
                    .map(|name| (name, callback, once))
            })
            .collect::<DispatchResult<Vec<_>>>()?;

        let subscriptions = entries
            .into_iter()
            .map(|(name, callback, once)| {
                state.table.register(&name, &callback, once);
                Subscription::new(name, callback.id())
            })
            .collect::<Vec<_>>();
        drop(state);

        debug!(count = subscriptions.len(), "Callbacks registered");
        Ok(subscriptions)
    }

    /// Register one callback for several events.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::EmptyEventNameSequence`] if `events` is empty.
    /// - Any per-name validation failure; nothing is registered.
    pub fn on_any<I, S>(&self, events: I, callback: &Callback<T>) -> DispatchResult<Vec<Subscription>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = self.lock();
        let names = parse_all(events, Operation::OnAny)?;
        if names.is_empty() {
            return Err(DispatchError::EmptyEventNameSequence {
                operation: Operation::OnAny,
            });
        }
        for name in &names {
            state.check_declared(name, Operation::OnAny)?;
        }

        let subscriptions = names
            .into_iter()
            .map(|name| {
                state.table.register(&name, callback, None);
                Subscription::new(name, callback.id())
            })
            .collect::<Vec<_>>();
        drop(state);

        debug!(
            callback = %callback.id(),
            count = subscriptions.len(),
            "Callback registered for several events"
        );
        Ok(subscriptions)
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    /// Remove every binding for every event.
    ///
    /// Never fails, strict mode included. Returns the number of events
    /// that had bindings.
    pub fn off_all(&self) -> usize {
        let removed = self.lock().table.clear();
        debug!(events = removed, "All bindings removed");
        removed
    }

    /// Alias for [`off_all`](Self::off_all).
    pub fn clear(&self) -> usize {
        self.off_all()
    }

    /// Remove every registration for `event`.
    ///
    /// Returns the number of registrations removed; zero when nothing was
    /// bound.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::EmptyEventName`] if `event` is empty.
    /// - [`DispatchError::UndeclaredEvent`] in strict mode if `event` is not declared.
    pub fn off_event(&self, event: impl AsRef<str>) -> DispatchResult<usize> {
        let mut state = self.lock();
        let name = state.validate(event.as_ref(), Operation::Off)?;
        let removed = state.table.remove_event(name.as_str());
        drop(state);

        if removed > 0 {
            debug!(event = %name, callbacks = removed, "Event binding removed");
        }
        Ok(removed)
    }

    /// Remove the registration of `callback` for `event`.
    ///
    /// Returns `true` if a registration was removed. The binding itself is
    /// dropped once its last registration is gone.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::EmptyEventName`] if `event` is empty.
    /// - [`DispatchError::UndeclaredEvent`] in strict mode if `event` is not declared.
    pub fn off(&self, event: impl AsRef<str>, callback: &Callback<T>) -> DispatchResult<bool> {
        let mut state = self.lock();
        let name = state.validate(event.as_ref(), Operation::Off)?;
        let removed = state.table.remove_callback(name.as_str(), callback.id());
        drop(state);

        if removed {
            debug!(event = %name, callback = %callback.id(), "Callback unregistered");
        }
        Ok(removed)
    }

    /// Remove the registration identified by `subscription`.
    ///
    /// # Errors
    ///
    /// [`DispatchError::UndeclaredEvent`] in strict mode if the event has
    /// since been undeclared.
    pub fn unsubscribe(&self, subscription: &Subscription) -> DispatchResult<bool> {
        let mut state = self.lock();
        state.check_declared(subscription.event(), Operation::Off)?;
        let removed = state
            .table
            .remove_callback(subscription.event().as_str(), subscription.callback());
        drop(state);

        if removed {
            debug!(
                event = %subscription.event(),
                callback = %subscription.callback(),
                "Subscription removed"
            );
        }
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Replacement
    // ------------------------------------------------------------------

    /// Replace the registration of `old` for `event` with one for `new`.
    ///
    /// The new registration goes to the end of the invocation order.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::EmptyEventName`] if `event` is empty.
    /// - [`DispatchError::UnmappedEvent`] if `event` has no binding.
    /// - [`DispatchError::UndeclaredEvent`] in strict mode if `event` is not declared.
    pub fn replace_callback(
        &self,
        event: impl AsRef<str>,
        old: &Callback<T>,
        new: &Callback<T>,
        once: Option<bool>,
    ) -> DispatchResult<Subscription> {
        let mut state = self.lock();
        let name = state.validate_mapped(event.as_ref(), Operation::ReplaceCallback)?;
        state.table.remove_callback(name.as_str(), old.id());
        state.table.register(&name, new, once);
        drop(state);

        debug!(event = %name, old = %old.id(), new = %new.id(), "Callback replaced");
        Ok(Subscription::new(name, new.id()))
    }

    /// Replace every registration for `event` with a single one for `new`.
    ///
    /// # Errors
    ///
    /// Same as [`replace_callback`](Self::replace_callback).
    pub fn replace_all_callbacks(
        &self,
        event: impl AsRef<str>,
        new: &Callback<T>,
        once: Option<bool>,
    ) -> DispatchResult<Subscription> {
        let mut state = self.lock();
        let name = state.validate_mapped(event.as_ref(), Operation::ReplaceAllCallbacks)?;
        let removed = state.table.remove_event(name.as_str());
        state.table.register(&name, new, once);
        drop(state);

        debug!(event = %name, removed, new = %new.id(), "All callbacks replaced");
        Ok(Subscription::new(name, new.id()))
    }

    // ------------------------------------------------------------------
    // Triggering
    // ------------------------------------------------------------------

    /// Trigger `event`, passing `data` to every registered callback.
    ///
    /// Callbacks run in registration order. A registration flagged `once`
    /// when its callback returns is removed right away, before the next
    /// callback runs. A callback registered during the pass, or removed and
    /// registered again, is not invoked by it.
    ///
    /// When deferred dispatch is on and a scheduler was injected, the pass
    /// is handed to the scheduler and this call returns immediately.
    ///
    /// A panicking callback is not caught: it aborts the rest of the pass
    /// and unwinds into the caller (or into the scheduler when deferred).
    /// A once-registration whose callback panicked stays registered.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::EmptyEventName`] if `event` is empty.
    /// - [`DispatchError::UndeclaredEvent`] in strict mode if `event` is not declared.
    /// - [`DispatchError::UnmappedEvent`] in strict mode if nothing is bound to `event`.
    ///
    /// Outside strict mode, triggering an event with no binding is a no-op.
    pub fn trigger(&self, event: impl AsRef<str>, data: Option<T>) -> DispatchResult<()> {
        let (name, deferred) = {
            let state = self.lock();
            match state.validate_trigger(event.as_ref(), Operation::Trigger)? {
                Some(name) => (name, state.async_dispatch),
                None => return Ok(()),
            }
        };
        self.fire(name, data, deferred);
        Ok(())
    }

    /// Trigger several events in order, each with its own payload.
    ///
    /// All names are validated before the first event fires.
    ///
    /// # Errors
    ///
    /// The first validation failure, as for [`trigger`](Self::trigger);
    /// nothing fires.
    pub fn trigger_many<I, S>(&self, events: I) -> DispatchResult<()>
    where
        I: IntoIterator<Item = (S, Option<T>)>,
        S: AsRef<str>,
    {
        let (batch, deferred) = {
            let state = self.lock();
            let batch = events
                .into_iter()
                .map(|(event, data)| {
                    state
                        .validate_trigger(event.as_ref(), Operation::TriggerMany)
                        .map(|name| name.map(|n| (n, data)))
                })
                .collect::<DispatchResult<Vec<_>>>()?;
            (batch, state.async_dispatch)
        };

        for (name, data) in batch.into_iter().flatten() {
            self.fire(name, data, deferred);
        }
        Ok(())
    }

    fn fire(&self, name: EventName, data: Option<T>, deferred: bool) {
        match &self.inner.scheduler {
            Some(scheduler) if deferred => {
                debug!(event = %name, scheduler = scheduler.name(), "Dispatch deferred");
                let inner = Arc::clone(&self.inner);
                scheduler.schedule(Box::new(move || inner.dispatch(&name, data.as_ref())));
            },
            _ => self.inner.dispatch(&name, data.as_ref()),
        }
    }

    // ------------------------------------------------------------------
    // Declared events
    // ------------------------------------------------------------------

    /// Declare `event` for use in strict mode.
    ///
    /// # Errors
    ///
    /// [`DispatchError::EmptyEventName`] if `event` is empty.
    pub fn declare_event(&self, event: impl AsRef<str>) -> DispatchResult<()> {
        let name = EventName::parse(event.as_ref(), Operation::DeclareEvent)?;
        let inserted = self.lock().declared.insert(name.clone());
        debug!(event = %name, inserted, "Event declared");
        Ok(())
    }

    /// Remove `event` from the declared set.
    ///
    /// Existing bindings are kept, but strict-mode operations on the name
    /// fail until it is declared again. Returns `true` if it was declared.
    ///
    /// # Errors
    ///
    /// [`DispatchError::EmptyEventName`] if `event` is empty.
    pub fn undeclare_event(&self, event: impl AsRef<str>) -> DispatchResult<bool> {
        let name = EventName::parse(event.as_ref(), Operation::UndeclareEvent)?;
        let removed = self.lock().declared.remove(&name);
        if removed {
            debug!(event = %name, "Event undeclared");
        }
        Ok(removed)
    }

    /// Declare several events.
    ///
    /// The whole sequence is validated first: if any name is invalid,
    /// nothing is declared.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::EmptyEventNameSequence`] if `events` is empty.
    /// - [`DispatchError::EmptyEventName`] if any name is empty.
    pub fn declare_events<I, S>(&self, events: I) -> DispatchResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = parse_all(events, Operation::DeclareEvents)?;
        if names.is_empty() {
            return Err(DispatchError::EmptyEventNameSequence {
                operation: Operation::DeclareEvents,
            });
        }

        debug!(count = names.len(), "Events declared");
        self.lock().declared.extend(names);
        Ok(())
    }

    /// Replace the declared set with `events`.
    ///
    /// An empty sequence undeclares everything.
    ///
    /// # Errors
    ///
    /// [`DispatchError::EmptyEventName`] if any name is empty; the declared
    /// set is then left unchanged.
    pub fn replace_declared_events<I, S>(&self, events: I) -> DispatchResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = parse_all(events, Operation::ReplaceDeclaredEvents)?;
        debug!(count = names.len(), "Declared events replaced");
        self.lock().declared = names.into_iter().collect();
        Ok(())
    }

    /// Undeclare every event. Returns how many were declared.
    pub fn undeclare_all(&self) -> usize {
        let mut state = self.lock();
        let count = state.declared.len();
        state.declared.clear();
        drop(state);

        debug!(count, "All events undeclared");
        count
    }

    /// Whether `event` is declared.
    #[must_use]
    pub fn is_declared(&self, event: impl AsRef<str>) -> bool {
        self.lock().declared.contains(event.as_ref())
    }

    /// The declared events, sorted.
    #[must_use]
    pub fn declared_events(&self) -> Vec<EventName> {
        self.lock().declared.iter().cloned().collect()
    }

    // ------------------------------------------------------------------
    // Modes
    // ------------------------------------------------------------------

    /// Whether strict mode is on.
    #[must_use]
    pub fn strict_mode(&self) -> bool {
        self.lock().strict_mode
    }

    /// Turn strict mode on or off.
    pub fn set_strict_mode(&self, strict_mode: bool) {
        self.lock().strict_mode = strict_mode;
        debug!(strict_mode, "Strict mode changed");
    }

    /// Whether deferred dispatch is enabled.
    ///
    /// Triggers are only deferred if a scheduler was also injected; see
    /// [`defers_dispatch`](Self::defers_dispatch).
    #[must_use]
    pub fn async_dispatch(&self) -> bool {
        self.lock().async_dispatch
    }

    /// Enable or disable deferred dispatch.
    pub fn set_async_dispatch(&self, async_dispatch: bool) {
        self.lock().async_dispatch = async_dispatch;
        debug!(async_dispatch, "Deferred dispatch changed");
    }

    /// Whether triggers currently run on the scheduler rather than inline.
    #[must_use]
    pub fn defers_dispatch(&self) -> bool {
        self.inner.scheduler.is_some() && self.async_dispatch()
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Deep copy of the event table.
    #[must_use]
    pub fn inspect(&self) -> EventTableSnapshot {
        self.lock().table.snapshot()
    }

    /// Number of registrations bound to `event`.
    #[must_use]
    pub fn listener_count(&self, event: impl AsRef<str>) -> usize {
        self.lock()
            .table
            .get(event.as_ref())
            .map_or(0, Binding::len)
    }

    /// Number of events with at least one registration.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.lock().table.len()
    }

    /// Whether no event has any registration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().table.is_empty()
    }
}

impl<T> Default for Dispatcher<T>
where
    T: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Dispatcher")
            .field("events", &state.table.len())
            .field("declared", &state.declared.len())
            .field("strict_mode", &state.strict_mode)
            .field("async_dispatch", &state.async_dispatch)
            .field(
                "scheduler",
                &self.inner.scheduler.as_ref().map(|s| s.name().to_owned()),
            )
            .finish()
    }
}

impl<T> WeakDispatcher<T> {
    /// Get the dispatcher back, if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Dispatcher<T>> {
        self.inner.upgrade().map(|inner| Dispatcher { inner })
    }
}

impl<T> Clone for WeakDispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for WeakDispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakDispatcher")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
