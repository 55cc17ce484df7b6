#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Layered configuration for the Bullet event dispatcher.
//!
//! # Usage
//!
//! ```rust,no_run
//! use bullet_config::Config;
//!
//! // Defaults → ~/.bullet/config.toml → explicit file → env fallbacks.
//! let resolved = Config::load(Some(std::path::Path::new("bullet.toml"))).unwrap();
//! println!("strict mode: {}", resolved.config.dispatcher.strict_mode);
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Explicit file** passed to [`Config::load`]
//! 2. **User** (`~/.bullet/config.toml`)
//! 3. **Environment variables** (`BULLET_*`), fallback only
//! 4. **Embedded defaults** (`defaults.toml` compiled into binary)
//!
//! # Design
//!
//! This crate has **no dependencies on other internal bullet crates**.
//! Dispatcher and logging setup convert from these types at their own
//! boundary (`bullet-events` and `bullet-telemetry`, feature `config`).

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered configuration merging with precedence.
pub mod merge;
/// Commonly used types.
pub mod prelude;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

// Re-export primary types at the crate root.
pub use error::{ConfigError, ConfigResult};
pub use loader::ResolvedConfig;
pub use merge::{ConfigLayer, FieldSources};
pub use types::*;

impl Config {
    /// Load configuration with the full precedence chain.
    ///
    /// See [`loader::load`] for the full algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load(explicit: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit)
    }

    /// Load configuration with an explicit home directory.
    ///
    /// Environment fallbacks still come from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load_with_home(
        explicit: Option<&std::path::Path>,
        home_dir: &std::path::Path,
    ) -> ConfigResult<ResolvedConfig> {
        loader::load_layers(home_dir, explicit, &env::collect_env_vars())
    }

    /// Load a single file without layering.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed or
    /// validated.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }

    /// Parse configuration from a TOML string over the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if parsing or validation fails.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        loader::from_toml_str(content)
    }

    /// Serialize the configuration back to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_string_round_trip() {
        let mut config = Config::default();
        config.dispatcher.declared_events = vec!["ping".to_owned()];
        config.logging.format = "json".to_owned();

        let text = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }
}
