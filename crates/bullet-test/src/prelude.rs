//! Prelude module - commonly used test helpers.
//!
//! Use `use bullet_test::prelude::*;` in test modules.

// Recorders and schedulers
pub use crate::{CallRecorder, ManualScheduler, OrderLog};

// Fixtures
pub use crate::{
    deferred_dispatcher, noop_callback, panicking_callback, strict_dispatcher, test_dispatcher,
};

// Harness
pub use crate::{init_test_logging, test_dir, test_file, test_home_with_config};
