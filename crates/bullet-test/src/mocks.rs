//! Recording callbacks and a manually driven scheduler.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use bullet_events::{Callback, CallbackId, Job, Scheduler};

/// Callback that records every payload it receives.
///
/// The wrapped [`Callback`] is created once, so every registration made with
/// [`callback`](Self::callback) shares one identity.
pub struct CallRecorder<T> {
    calls: Arc<Mutex<Vec<Option<T>>>>,
    callback: Callback<T>,
}

impl<T> CallRecorder<T>
where
    T: Clone + Send + 'static,
{
    /// Create a recorder with no calls.
    #[must_use]
    pub fn new() -> Self {
        let calls: Arc<Mutex<Vec<Option<T>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let callback = Callback::new(move |data: Option<&T>| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(data.cloned());
        });
        Self { calls, callback }
    }

    /// The recording callback.
    #[must_use]
    pub fn callback(&self) -> &Callback<T> {
        &self.callback
    }

    /// Identity of the recording callback.
    #[must_use]
    pub fn id(&self) -> CallbackId {
        self.callback.id()
    }

    /// Payloads received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Option<T>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of invocations so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The most recent payload, if the callback was invoked.
    #[must_use]
    pub fn last(&self) -> Option<Option<T>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Forget recorded calls.
    pub fn reset(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<T> Default for CallRecorder<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CallRecorder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("CallRecorder")
            .field("id", &self.callback.id())
            .field("count", &count)
            .finish()
    }
}

/// Shared log of labels, for asserting invocation order across callbacks.
#[derive(Debug, Clone, Default)]
pub struct OrderLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl OrderLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a callback that appends `label` when invoked.
    #[must_use]
    pub fn callback<T>(&self, label: impl Into<String>) -> Callback<T> {
        let entries = Arc::clone(&self.entries);
        let label = label.into();
        Callback::new(move |_: Option<&T>| {
            entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(label.clone());
        })
    }

    /// Append `label` directly.
    pub fn push(&self, label: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(label.into());
    }

    /// Labels logged so far, in order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget logged labels.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Scheduler that queues jobs until the test runs them.
///
/// Lets tests observe the gap between a deferred trigger and its dispatch
/// without a runtime.
#[derive(Default)]
pub struct ManualScheduler {
    queue: Mutex<VecDeque<Job>>,
}

impl ManualScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued jobs.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Run the oldest queued job. Returns `false` if none was queued.
    pub fn run_one(&self) -> bool {
        let job = self
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match job {
            Some(job) => {
                job();
                true
            },
            None => false,
        }
    }

    /// Run queued jobs until the queue is empty, including jobs queued by
    /// the jobs themselves. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran: usize = 0;
        while self.run_one() {
            ran = ran.saturating_add(1);
        }
        ran
    }

    /// Drop every queued job without running it.
    pub fn discard(&self) -> usize {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let count = queue.len();
        queue.clear();
        count
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, job: Job) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(job);
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "manual"
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}
