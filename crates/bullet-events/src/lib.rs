//! Bullet Events - named-event dispatcher.
//!
//! This crate provides:
//! - Registration of callbacks against named events, with once-only variants
//! - Ordered, synchronous or deferred triggering with an optional payload
//! - Strict mode, where every event name must be declared before use
//! - Inspection of the event table as an owned snapshot
//!
//! # Architecture
//!
//! A [`Dispatcher`] owns an event table mapping each [`EventName`] to the
//! ordered registrations bound to it. Callbacks are wrapped in a
//! [`Callback`] handle whose [`CallbackId`] identifies it for removal and
//! replacement; registering returns a [`Subscription`] that can be passed
//! back to [`Dispatcher::unsubscribe`].
//!
//! Triggering runs inline unless a [`Scheduler`] was injected through the
//! [`DispatcherBuilder`] and deferred dispatch is enabled. With the
//! `runtime` feature, [`TokioScheduler`] defers each pass onto a Tokio task.
//!
//! # Example
//!
//! ```rust
//! use bullet_events::{Callback, Dispatcher};
//! use serde_json::{Value, json};
//! use std::sync::{Arc, Mutex};
//!
//! # fn main() -> Result<(), bullet_events::DispatchError> {
//! let dispatcher: Dispatcher<Value> = Dispatcher::builder()
//!     .strict_mode(true)
//!     .declare("user_joined")
//!     .build()?;
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let seen_clone = Arc::clone(&seen);
//! let greet = Callback::new(move |data: Option<&Value>| {
//!     if let Some(user) = data.and_then(|d| d["name"].as_str()) {
//!         seen_clone.lock().unwrap().push(user.to_string());
//!     }
//! });
//!
//! dispatcher.once("user_joined", &greet)?;
//! dispatcher.trigger("user_joined", Some(json!({ "name": "ada" })))?;
//!
//! // The once-registration is gone; strict mode now rejects the trigger.
//! assert!(dispatcher.trigger("user_joined", None).is_err());
//! assert_eq!(*seen.lock().unwrap(), vec!["ada".to_string()]);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod builder;
mod callback;
#[cfg(feature = "config")]
mod config;
mod dispatcher;
mod error;
mod name;
mod scheduler;
mod table;

pub use builder::DispatcherBuilder;
pub use callback::{Callback, CallbackFn, CallbackId, Subscription};
pub use dispatcher::{Dispatcher, WeakDispatcher};
pub use error::{DispatchError, DispatchResult, Operation};
pub use name::EventName;
#[cfg(feature = "runtime")]
pub use scheduler::TokioScheduler;
pub use scheduler::{Immediate, Job, Scheduler};
pub use table::{BindingSnapshot, EventTableSnapshot, RegistrationSnapshot};
