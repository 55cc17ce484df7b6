//! Bullet Test - Shared test utilities for the Bullet event dispatcher.
//!
//! This crate provides recording callbacks, a manually driven scheduler and
//! test helpers that can be used across Bullet crates as a dev-dependency.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! bullet-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust,ignore
//! use bullet_test::{CallRecorder, test_dispatcher};
//!
//! #[test]
//! fn test_ping() {
//!     let dispatcher = test_dispatcher::<u32>();
//!     let recorder = CallRecorder::new();
//!
//!     dispatcher.on("ping", recorder.callback()).unwrap();
//!     dispatcher.trigger("ping", Some(7)).unwrap();
//!
//!     assert_eq!(recorder.calls(), vec![Some(7)]);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
