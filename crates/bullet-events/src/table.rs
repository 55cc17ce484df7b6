//! Event table: bindings from event names to ordered registrations.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::callback::{Callback, CallbackId};
use crate::name::EventName;

/// Snapshot of one registration, as returned by
/// [`Dispatcher::inspect`](crate::Dispatcher::inspect).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSnapshot {
    /// Identity of the registered callback.
    pub callback: CallbackId,
    /// Whether the registration removes itself after its first invocation.
    pub once: bool,
}

/// Snapshot of one binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSnapshot {
    /// Registrations in invocation order.
    pub registrations: Vec<RegistrationSnapshot>,
    /// Number of live registrations.
    pub count: usize,
}

impl BindingSnapshot {
    /// Whether a registration for `callback` is present.
    #[must_use]
    pub fn contains(&self, callback: CallbackId) -> bool {
        self.get(callback).is_some()
    }

    /// The registration for `callback`, if present.
    #[must_use]
    pub fn get(&self, callback: CallbackId) -> Option<&RegistrationSnapshot> {
        self.registrations.iter().find(|r| r.callback == callback)
    }
}

/// Deep copy of the dispatcher's event table.
///
/// Owned by the caller; changing it has no effect on the dispatcher.
pub type EventTableSnapshot = BTreeMap<EventName, BindingSnapshot>;

pub(crate) struct Registration<T> {
    pub(crate) callback: Callback<T>,
    pub(crate) once: bool,
    /// Insertion stamp. A registration removed and added again gets a new one.
    pub(crate) seq: u64,
    /// Set while a dispatch pass is running this once-registration.
    pub(crate) claimed: bool,
}

pub(crate) struct Binding<T> {
    registrations: Vec<Registration<T>>,
}

impl<T> Binding<T> {
    fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    fn position(&self, id: CallbackId) -> Option<usize> {
        self.registrations.iter().position(|r| r.callback.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: CallbackId) -> Option<&mut Registration<T>> {
        self.registrations
            .iter_mut()
            .find(|r| r.callback.id() == id)
    }

    /// Insert `callback`, or update its `once` flag when already present.
    ///
    /// Returns `true` if a new registration was created.
    fn upsert(&mut self, callback: &Callback<T>, once: Option<bool>, seq: u64) -> bool {
        if let Some(existing) = self.get_mut(callback.id()) {
            if let Some(once) = once {
                existing.once = once;
            }
            return false;
        }

        self.registrations.push(Registration {
            callback: callback.clone(),
            once: once.unwrap_or(false),
            seq,
            claimed: false,
        });
        true
    }

    fn remove(&mut self, id: CallbackId) -> Option<Registration<T>> {
        self.position(id).map(|idx| self.registrations.remove(idx))
    }

    /// `(id, seq)` of each registration, in invocation order.
    pub(crate) fn entries(&self) -> Vec<(CallbackId, u64)> {
        self.registrations
            .iter()
            .map(|r| (r.callback.id(), r.seq))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.registrations.len()
    }

    fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn snapshot(&self) -> BindingSnapshot {
        BindingSnapshot {
            registrations: self
                .registrations
                .iter()
                .map(|r| RegistrationSnapshot {
                    callback: r.callback.id(),
                    once: r.once,
                })
                .collect(),
            count: self.len(),
        }
    }
}

/// Mapping from event name to binding.
///
/// A binding exists only while it holds at least one registration.
pub(crate) struct EventTable<T> {
    bindings: HashMap<EventName, Binding<T>>,
    next_seq: u64,
}

impl<T> EventTable<T> {
    pub(crate) fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            next_seq: 0,
        }
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Binding<T>> {
        self.bindings.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Binding<T>> {
        self.bindings.get_mut(name)
    }

    /// Returns `true` if a new registration was created.
    pub(crate) fn register(
        &mut self,
        name: &EventName,
        callback: &Callback<T>,
        once: Option<bool>,
    ) -> bool {
        let seq = self.next_seq;
        let inserted = self
            .bindings
            .entry(name.clone())
            .or_insert_with(Binding::new)
            .upsert(callback, once, seq);
        if inserted {
            self.next_seq = self.next_seq.wrapping_add(1);
        }
        inserted
    }

    /// Remove one registration, dropping the binding once it is empty.
    pub(crate) fn remove_callback(&mut self, name: &str, id: CallbackId) -> bool {
        let Some(binding) = self.bindings.get_mut(name) else {
            return false;
        };
        let removed = binding.remove(id).is_some();
        if binding.is_empty() {
            self.bindings.remove(name);
        }
        removed
    }

    /// Remove a whole binding. Returns the number of registrations dropped.
    pub(crate) fn remove_event(&mut self, name: &str) -> usize {
        self.bindings.remove(name).map_or(0, |binding| binding.len())
    }

    /// Remove every binding. Returns the number of bindings dropped.
    pub(crate) fn clear(&mut self) -> usize {
        let count = self.bindings.len();
        self.bindings.clear();
        count
    }

    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub(crate) fn snapshot(&self) -> EventTableSnapshot {
        self.bindings
            .iter()
            .map(|(name, binding)| (name.clone(), binding.snapshot()))
            .collect()
    }
}
