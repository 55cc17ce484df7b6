//! Dispatcher error types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The dispatcher operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Parsing a raw string into an [`EventName`](crate::EventName).
    ParseEventName,
    /// `register` / `on`.
    On,
    /// `once`.
    Once,
    /// `off`, `off_event`, `unsubscribe`.
    Off,
    /// `replace_callback`.
    ReplaceCallback,
    /// `replace_all_callbacks`.
    ReplaceAllCallbacks,
    /// `trigger`.
    Trigger,
    /// `trigger_many`.
    TriggerMany,
    /// `on_many`.
    OnMany,
    /// `on_any`.
    OnAny,
    /// `declare_event`.
    DeclareEvent,
    /// `undeclare_event`.
    UndeclareEvent,
    /// `declare_events`.
    DeclareEvents,
    /// `replace_declared_events`.
    ReplaceDeclaredEvents,
    /// Building a dispatcher from a builder or configuration.
    Build,
}

impl Operation {
    /// Stable snake-case name of the operation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParseEventName => "parse_event_name",
            Self::On => "on",
            Self::Once => "once",
            Self::Off => "off",
            Self::ReplaceCallback => "replace_callback",
            Self::ReplaceAllCallbacks => "replace_all_callbacks",
            Self::Trigger => "trigger",
            Self::TriggerMany => "trigger_many",
            Self::OnMany => "on_many",
            Self::OnAny => "on_any",
            Self::DeclareEvent => "declare_event",
            Self::UndeclareEvent => "undeclare_event",
            Self::DeclareEvents => "declare_events",
            Self::ReplaceDeclaredEvents => "replace_declared_events",
            Self::Build => "build",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`Dispatcher`](crate::Dispatcher) operations.
///
/// Every variant is a precondition failure. The dispatcher validates all
/// arguments before touching its tables, so an error always leaves state
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// An event name was the empty string.
    #[error("[{operation}] expected event name to be longer than 0 characters")]
    EmptyEventName {
        /// Operation that received the empty name.
        operation: Operation,
    },

    /// A sequence of event names was empty.
    #[error("[{operation}] expected at least one event name, but received none")]
    EmptyEventNameSequence {
        /// Operation that received the empty sequence.
        operation: Operation,
    },

    /// Strict mode is on and the event has not been declared.
    #[error(
        "[{operation}] event \"{event}\" has not been declared; declare it with `declare_event` before use"
    )]
    UndeclaredEvent {
        /// Operation that was rejected.
        operation: Operation,
        /// The undeclared event name.
        event: String,
    },

    /// The operation needs an existing binding and the event has none.
    #[error("[{operation}] event \"{event}\" is not mapped to any callbacks")]
    UnmappedEvent {
        /// Operation that was rejected.
        operation: Operation,
        /// The unmapped event name.
        event: String,
    },
}

impl DispatchError {
    /// The operation that produced this error.
    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            Self::EmptyEventName { operation }
            | Self::EmptyEventNameSequence { operation }
            | Self::UndeclaredEvent { operation, .. }
            | Self::UnmappedEvent { operation, .. } => *operation,
        }
    }

    /// The offending event name, if the error concerns one.
    #[must_use]
    pub fn event(&self) -> Option<&str> {
        match self {
            Self::UndeclaredEvent { event, .. } | Self::UnmappedEvent { event, .. } => Some(event),
            Self::EmptyEventName { .. } | Self::EmptyEventNameSequence { .. } => None,
        }
    }
}

/// Result type for dispatcher operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
