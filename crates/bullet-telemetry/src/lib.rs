//! Bullet Telemetry - logging setup for the Bullet event dispatcher.
//!
//! The dispatcher crates only emit `tracing` events. This crate installs a
//! `tracing-subscriber` stack to print them: level and directive filtering,
//! four output formats, and stdout, stderr or rolling-file targets.
//!
//! # Example
//!
//! ```rust,no_run
//! use bullet_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), bullet_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Pretty)
//!     .with_directive("bullet_events=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!("Logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

#[cfg(feature = "config")]
mod config;
mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};
