//! Callback handles and subscription tokens.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::name::EventName;

/// Function type wrapped by a [`Callback`].
pub type CallbackFn<T> = dyn Fn(Option<&T>) + Send + Sync;

/// Identity of a [`Callback`].
///
/// Assigned when the callback handle is created and shared by all of its
/// clones. Two handles created separately never compare equal, even when
/// they wrap identical code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CallbackId(Uuid);

impl CallbackId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registrable unit of behavior, invoked with an optional payload.
///
/// Cloning is cheap and preserves identity: registering a clone is the same
/// as registering the original.
///
/// ```rust
/// use bullet_events::Callback;
///
/// let cb: Callback<u32> = Callback::new(|data| {
///     let _ = data;
/// });
/// let same = cb.clone();
/// assert_eq!(cb.id(), same.id());
///
/// let other: Callback<u32> = Callback::new(|data| {
///     let _ = data;
/// });
/// assert_ne!(cb.id(), other.id());
/// ```
pub struct Callback<T> {
    id: CallbackId,
    func: Arc<CallbackFn<T>>,
}

impl<T> Callback<T> {
    /// Wrap a closure in a new callback with a fresh identity.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(Option<&T>) + Send + Sync + 'static,
    {
        Self {
            id: CallbackId::new(),
            func: Arc::new(func),
        }
    }

    /// Wrap an already shared function in a new callback.
    ///
    /// The identity is fresh even if `func` is shared with another callback.
    #[must_use]
    pub fn from_arc(func: Arc<CallbackFn<T>>) -> Self {
        Self {
            id: CallbackId::new(),
            func,
        }
    }

    /// Identity of this callback.
    #[must_use]
    pub fn id(&self) -> CallbackId {
        self.id
    }

    /// Invoke the wrapped function.
    pub fn call(&self, data: Option<&T>) {
        (self.func)(data);
    }
}

impl<T> Clone for Callback<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            func: Arc::clone(&self.func),
        }
    }
}

impl<T> PartialEq for Callback<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Callback<T> {}

impl<T> fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").field("id", &self.id).finish()
    }
}

/// Handle for one registration, returned by the registering operations.
///
/// Pass it to [`Dispatcher::unsubscribe`](crate::Dispatcher::unsubscribe) to
/// remove exactly that registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscription {
    event: EventName,
    callback: CallbackId,
}

impl Subscription {
    pub(crate) fn new(event: EventName, callback: CallbackId) -> Self {
        Self { event, callback }
    }

    /// Event the registration belongs to.
    #[must_use]
    pub fn event(&self) -> &EventName {
        &self.event
    }

    /// Identity of the registered callback.
    #[must_use]
    pub fn callback(&self) -> CallbackId {
        self.callback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_identical_closures_have_distinct_ids() {
        let a: Callback<()> = Callback::new(|_| {});
        let b: Callback<()> = Callback::new(|_| {});
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_arc_gets_fresh_identity() {
        let shared: Arc<CallbackFn<()>> = Arc::new(|_: Option<&()>| {});
        let a = Callback::from_arc(Arc::clone(&shared));
        let b = Callback::from_arc(shared);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_call_passes_data() {
        let total = Arc::new(AtomicUsize::new(0));
        let total_clone = Arc::clone(&total);
        let cb: Callback<usize> = Callback::new(move |data| {
            total_clone.fetch_add(data.copied().unwrap_or(1), Ordering::SeqCst);
        });

        cb.call(Some(&5));
        cb.clone().call(None);
        assert_eq!(total.load(Ordering::SeqCst), 6);
    }
}
