//! Test harness helpers.

use std::path::PathBuf;

use tempfile::{NamedTempFile, TempDir};
use tracing_subscriber::EnvFilter;

/// Create a temporary directory for testing.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
pub fn test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Create a temporary file with the given content.
///
/// Returns the `NamedTempFile` which will be cleaned up when dropped.
///
/// # Panics
///
/// Panics if the file cannot be created or written.
#[must_use]
pub fn test_file(content: &str) -> NamedTempFile {
    use std::io::Write;

    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Create a temporary home directory holding `.bullet/config.toml`.
///
/// # Panics
///
/// Panics if the directory or file cannot be created.
#[must_use]
pub fn test_home_with_config(content: &str) -> TempDir {
    let home = test_dir();
    let path = user_config_path(&home);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create config directory");
    }
    std::fs::write(&path, content).expect("Failed to write user config");
    home
}

/// Path of the user config file under a test home directory.
#[must_use]
pub fn user_config_path(home: &TempDir) -> PathBuf {
    home.path().join(".bullet").join("config.toml")
}

/// Set up test logging with the given filter.
///
/// Output goes through the test writer, so it is only shown for failing
/// tests. Later calls are ignored.
///
/// ```rust,ignore
/// use bullet_test::init_test_logging;
///
/// #[test]
/// fn my_test() {
///     init_test_logging("bullet_events=trace");
///     // ... test code
/// }
/// ```
pub fn init_test_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}
