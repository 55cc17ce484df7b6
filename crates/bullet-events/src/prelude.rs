//! Prelude module - commonly used types for convenient import.
//!
//! Use `use bullet_events::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use bullet_events::prelude::*;
//!
//! # fn main() -> DispatchResult<()> {
//! let dispatcher: Dispatcher<u8> = Dispatcher::new();
//! let cb = Callback::new(|_| {});
//! let sub = dispatcher.on("tick", &cb)?;
//! assert!(dispatcher.unsubscribe(&sub)?);
//! # Ok(())
//! # }
//! ```

// Dispatcher
pub use crate::{Dispatcher, DispatcherBuilder, WeakDispatcher};

// Callbacks and names
pub use crate::{Callback, CallbackId, EventName, Subscription};

// Errors
pub use crate::{DispatchError, DispatchResult, Operation};

// Scheduling
#[cfg(feature = "runtime")]
pub use crate::TokioScheduler;
pub use crate::{Immediate, Scheduler};

// Inspection
pub use crate::EventTableSnapshot;
