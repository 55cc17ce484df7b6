//! Construction from `bullet-config` settings.

use bullet_config::DispatcherSection;

use crate::builder::DispatcherBuilder;
use crate::dispatcher::Dispatcher;
use crate::error::DispatchResult;

impl<T> DispatcherBuilder<T>
where
    T: Send + 'static,
{
    /// Start from the `[dispatcher]` section of a loaded configuration.
    ///
    /// A scheduler still has to be injected for deferred dispatch to take
    /// effect.
    #[must_use]
    pub fn from_config(section: &DispatcherSection) -> Self {
        Self::new()
            .strict_mode(section.strict_mode)
            .async_dispatch(section.async_dispatch)
            .declare_all(section.declared_events.iter().cloned())
    }
}

impl<T> Dispatcher<T>
where
    T: Send + 'static,
{
    /// Create a synchronous dispatcher from the `[dispatcher]` section.
    ///
    /// # Errors
    ///
    /// Returns an error if a declared event name is empty.
    pub fn from_config(section: &DispatcherSection) -> DispatchResult<Self> {
        DispatcherBuilder::from_config(section).build()
    }
}
