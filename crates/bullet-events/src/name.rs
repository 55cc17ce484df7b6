//! Validated event names.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, DispatchResult, Operation};

/// A non-empty event name.
///
/// Implements `Borrow<str>`, so tables keyed by `EventName` can be queried
/// with a plain `&str`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventName(String);

impl EventName {
    /// Create an event name.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::EmptyEventName`] if `name` is empty.
    pub fn new(name: impl Into<String>) -> DispatchResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DispatchError::EmptyEventName {
                operation: Operation::ParseEventName,
            });
        }
        Ok(Self(name))
    }

    /// Validate `name` on behalf of `operation`.
    pub(crate) fn parse(name: &str, operation: Operation) -> DispatchResult<Self> {
        if name.is_empty() {
            return Err(DispatchError::EmptyEventName { operation });
        }
        Ok(Self(name.to_owned()))
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EventName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EventName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EventName {
    type Error = DispatchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EventName {
    type Error = DispatchError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EventName> for String {
    fn from(name: EventName) -> Self {
        name.0
    }
}

impl PartialEq<str> for EventName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EventName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
