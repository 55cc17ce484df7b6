//! Prelude module - commonly used types for convenient import.
//!
//! Use `use bullet_config::prelude::*;` to import all essential types.

pub use crate::{
    Config, ConfigError, ConfigLayer, ConfigResult, DispatcherSection, LoggingSection,
    ResolvedConfig,
};
