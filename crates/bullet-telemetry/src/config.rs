//! Construction from `bullet-config` settings.

use bullet_config::LoggingSection;

use crate::error::TelemetryResult;
use crate::logging::LogConfig;

impl LogConfig {
    /// Build a log config from the `[logging]` section.
    ///
    /// Output goes to stderr; all other options keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::UnknownFormat`](crate::TelemetryError::UnknownFormat)
    /// if the format name is unknown.
    pub fn from_section(section: &LoggingSection) -> TelemetryResult<Self> {
        let config = Self {
            level: section.level.clone(),
            format: section.format.parse()?,
            directives: section.directives.clone(),
            ..Self::default()
        };
        Ok(config)
    }
}
