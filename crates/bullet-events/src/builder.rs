//! Builder for [`Dispatcher`].

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::dispatcher::Dispatcher;
use crate::error::{DispatchResult, Operation};
use crate::name::EventName;
use crate::scheduler::Scheduler;

/// Configures and creates a [`Dispatcher`].
///
/// ```rust
/// use bullet_events::{Dispatcher, Immediate};
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), bullet_events::DispatchError> {
/// let dispatcher: Dispatcher<String> = Dispatcher::builder()
///     .strict_mode(true)
///     .declare_all(["connected", "disconnected"])
///     .scheduler(Arc::new(Immediate))
///     .build()?;
///
/// assert!(dispatcher.strict_mode());
/// assert!(dispatcher.is_declared("connected"));
/// # Ok(())
/// # }
/// ```
pub struct DispatcherBuilder<T = serde_json::Value> {
    strict_mode: bool,
    async_dispatch: bool,
    declared: Vec<String>,
    scheduler: Option<Arc<dyn Scheduler>>,
    _payload: PhantomData<fn(T)>,
}

impl<T> DispatcherBuilder<T>
where
    T: Send + 'static,
{
    /// Defaults: strict mode off, deferred dispatch on, no scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strict_mode: false,
            async_dispatch: true,
            declared: Vec::new(),
            scheduler: None,
            _payload: PhantomData,
        }
    }

    /// Enable or disable strict mode.
    #[must_use]
    pub fn strict_mode(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    /// Enable or disable deferred dispatch.
    ///
    /// Has no effect unless a scheduler is also set.
    #[must_use]
    pub fn async_dispatch(mut self, async_dispatch: bool) -> Self {
        self.async_dispatch = async_dispatch;
        self
    }

    /// Declare an event up front.
    #[must_use]
    pub fn declare(mut self, event: impl Into<String>) -> Self {
        self.declared.push(event.into());
        self
    }

    /// Declare several events up front.
    #[must_use]
    pub fn declare_all<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declared.extend(events.into_iter().map(Into::into));
        self
    }

    /// Inject the scheduler used for deferred dispatch.
    #[must_use]
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Use the Tokio runtime the caller is running on, if any.
    ///
    /// Outside a runtime the builder is left unchanged.
    #[cfg(feature = "runtime")]
    #[must_use]
    pub fn tokio_current(self) -> Self {
        match crate::scheduler::TokioScheduler::try_current() {
            Some(scheduler) => self.scheduler(Arc::new(scheduler)),
            None => self,
        }
    }

    /// Create the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::EmptyEventName`](crate::DispatchError::EmptyEventName)
    /// if an empty name was declared.
    pub fn build(self) -> DispatchResult<Dispatcher<T>> {
        let declared = self
            .declared
            .iter()
            .map(|name| EventName::parse(name, Operation::Build))
            .collect::<DispatchResult<Vec<_>>>()?;

        debug!(
            strict_mode = self.strict_mode,
            async_dispatch = self.async_dispatch,
            declared = declared.len(),
            scheduler = self.scheduler.as_ref().map(|s| s.name()),
            "Dispatcher created"
        );

        Ok(Dispatcher::from_parts(
            self.strict_mode,
            self.async_dispatch,
            declared,
            self.scheduler,
        ))
    }
}

impl<T> Default for DispatcherBuilder<T>
where
    T: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for DispatcherBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("strict_mode", &self.strict_mode)
            .field("async_dispatch", &self.async_dispatch)
            .field("declared", &self.declared)
            .field("scheduler", &self.scheduler.as_ref().map(|s| s.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::Callback;
    use crate::error::DispatchError;
    use crate::scheduler::{Immediate, Job};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scheduler that holds jobs until drained.
    #[derive(Default)]
    struct Queue {
        jobs: Mutex<Vec<Job>>,
    }

    impl Queue {
        fn drain(&self) -> usize {
            let jobs: Vec<Job> = std::mem::take(&mut *self.jobs.lock().unwrap());
            let count = jobs.len();
            for job in jobs {
                job();
            }
            count
        }
    }

    impl Scheduler for Queue {
        fn schedule(&self, job: Job) {
            self.jobs.lock().unwrap().push(job);
        }
    }

    #[test]
    fn test_build_defaults() {
        let dispatcher: Dispatcher<()> = DispatcherBuilder::new().build().unwrap();
        assert!(!dispatcher.strict_mode());
        assert!(dispatcher.async_dispatch());
        assert!(!dispatcher.defers_dispatch());
    }

    #[test]
    fn test_build_with_declarations() {
        let dispatcher: Dispatcher<()> = Dispatcher::builder()
            .strict_mode(true)
            .declare("ping")
            .declare_all(["pong", "ping"])
            .build()
            .unwrap();

        assert!(dispatcher.strict_mode());
        assert_eq!(dispatcher.declared_events().len(), 2);
    }

    #[test]
    fn test_build_rejects_empty_declaration() {
        let err = Dispatcher::<()>::builder().declare("").build().unwrap_err();
        assert_eq!(
            err,
            DispatchError::EmptyEventName {
                operation: Operation::Build
            }
        );
    }

    #[test]
    fn test_injected_scheduler_defers_dispatch() {
        let queue = Arc::new(Queue::default());
        let dispatcher: Dispatcher<()> = Dispatcher::builder()
            .scheduler(Arc::clone(&queue) as Arc<dyn Scheduler>)
            .build()
            .unwrap();
        assert!(dispatcher.defers_dispatch());

        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let cb = Callback::new(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        dispatcher.on("ping", &cb).unwrap();

        dispatcher.trigger("ping", None).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);

        assert_eq!(queue.drain(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_async_dispatch_off_runs_inline() {
        let queue = Arc::new(Queue::default());
        let dispatcher: Dispatcher<()> = Dispatcher::builder()
            .scheduler(Arc::clone(&queue) as Arc<dyn Scheduler>)
            .async_dispatch(false)
            .build()
            .unwrap();
        assert!(!dispatcher.defers_dispatch());

        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let cb = Callback::new(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        dispatcher.on("ping", &cb).unwrap();
        dispatcher.trigger("ping", None).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(queue.drain(), 0);
    }

    #[test]
    fn test_immediate_scheduler() {
        let dispatcher: Dispatcher<()> = Dispatcher::builder()
            .scheduler(Arc::new(Immediate))
            .build()
            .unwrap();
        assert!(dispatcher.defers_dispatch());
        assert!(format!("{dispatcher:?}").contains("immediate"));
    }

    #[cfg(feature = "runtime")]
    #[test]
    fn test_tokio_current_outside_runtime() {
        let builder = Dispatcher::<()>::builder().tokio_current();
        assert!(format!("{builder:?}").contains("scheduler: None"));
    }

    #[cfg(feature = "runtime")]
    #[tokio::test]
    async fn test_tokio_current_inside_runtime() {
        let dispatcher: Dispatcher<()> = Dispatcher::builder().tokio_current().build().unwrap();
        assert!(dispatcher.defers_dispatch());
    }
}
