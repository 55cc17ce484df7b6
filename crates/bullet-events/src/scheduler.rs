//! Schedulers for deferred dispatch.
//!
//! A [`Scheduler`] runs a zero-argument job "soon, after the current
//! synchronous work". The dispatcher only uses one when deferred dispatch is
//! enabled; without an injected scheduler every trigger runs inline.

#[cfg(feature = "runtime")]
use tracing::error;

/// A unit of deferred work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Capability to run a job later.
pub trait Scheduler: Send + Sync {
    /// Queue `job` to run after the caller's current work completes.
    ///
    /// Must not run the job while holding any lock the caller may need.
    fn schedule(&self, job: Job);

    /// Optional name for debugging.
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "anonymous"
    }
}

/// Scheduler that runs each job inline, making dispatch synchronous.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl Scheduler for Immediate {
    fn schedule(&self, job: Job) {
        job();
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "immediate"
    }
}

/// Scheduler that spawns each job as a task on a Tokio runtime.
///
/// A panic inside a job is caught at the task boundary and logged; the
/// triggering caller never observes it.
#[cfg(feature = "runtime")]
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

#[cfg(feature = "runtime")]
impl TokioScheduler {
    /// Create a scheduler for the given runtime handle.
    #[must_use]
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Create a scheduler for the runtime the caller is running on.
    ///
    /// Returns `None` outside a Tokio runtime.
    #[must_use]
    pub fn try_current() -> Option<Self> {
        tokio::runtime::Handle::try_current().ok().map(Self::new)
    }
}

#[cfg(feature = "runtime")]
impl Scheduler for TokioScheduler {
    fn schedule(&self, job: Job) {
        self.handle.spawn(async move {
            if let Err(panic) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)) {
                error!(error = %panic_message(&*panic), "Deferred dispatch panicked");
            }
        });
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "tokio"
    }
}

#[cfg(feature = "runtime")]
fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
