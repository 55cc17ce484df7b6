//! Layered merging with per-field source tracking.

use std::collections::HashMap;
use std::fmt;

/// Which configuration layer a value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLayer {
    /// Compiled-in defaults (`defaults.toml`).
    Defaults,
    /// User-level configuration (`~/.bullet/config.toml`).
    User,
    /// Config file passed explicitly by the caller.
    File,
    /// Environment variable fallback.
    Environment,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defaults => write!(f, "defaults"),
            Self::User => write!(f, "user (~/.bullet/config.toml)"),
            Self::File => write!(f, "explicit file"),
            Self::Environment => write!(f, "environment variable"),
        }
    }
}

/// Tracks which layer set each field's value.
pub type FieldSources = HashMap<String, ConfigLayer>;

/// Recursively deep-merge `overlay` into `base`.
///
/// - Tables merge recursively per-field.
/// - Scalars and arrays from the overlay **replace** the base value.
pub fn deep_merge(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                if let Some(base_val) = base_table.get_mut(key) {
                    deep_merge(base_val, overlay_val);
                } else {
                    base_table.insert(key.clone(), overlay_val.clone());
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
        },
    }
}

/// Deep-merge `overlay` into `base`, recording `layer` as the source of every
/// leaf the overlay sets.
pub fn deep_merge_tracking(
    base: &mut toml::Value,
    overlay: &toml::Value,
    prefix: &str,
    layer: &ConfigLayer,
    sources: &mut FieldSources,
) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let path = join(prefix, key);
                if let Some(base_val) = base_table.get_mut(key) {
                    if overlay_val.is_table() {
                        deep_merge_tracking(base_val, overlay_val, &path, layer, sources);
                    } else {
                        *base_val = overlay_val.clone();
                        sources.insert(path, layer.clone());
                    }
                } else {
                    base_table.insert(key.clone(), overlay_val.clone());
                    record_leaves(overlay_val, &path, layer, sources);
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
            sources.insert(prefix.to_owned(), layer.clone());
        },
    }
}

/// Walk a value tree and record every leaf path with `layer`.
pub fn record_leaves(
    val: &toml::Value,
    prefix: &str,
    layer: &ConfigLayer,
    sources: &mut FieldSources,
) {
    if let toml::Value::Table(table) = val {
        for (key, child) in table {
            record_leaves(child, &join(prefix, key), layer, sources);
        }
    } else {
        sources.insert(prefix.to_owned(), layer.clone());
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn test_deep_merge_tables() {
        let mut base = parse("[dispatcher]\nstrict_mode = false\nasync_dispatch = true");
        let overlay = parse("[dispatcher]\nstrict_mode = true");
        deep_merge(&mut base, &overlay);

        assert_eq!(base["dispatcher"]["strict_mode"].as_bool(), Some(true));
        assert_eq!(base["dispatcher"]["async_dispatch"].as_bool(), Some(true));
    }

    #[test]
    fn test_arrays_replace() {
        let mut base = parse("[dispatcher]\ndeclared_events = [\"a\", \"b\"]");
        let overlay = parse("[dispatcher]\ndeclared_events = [\"c\"]");
        deep_merge(&mut base, &overlay);

        let events = base["dispatcher"]["declared_events"].as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_str(), Some("c"));
    }

    #[test]
    fn test_tracking_records_overlay_leaves() {
        let mut base = parse("[logging]\nlevel = \"info\"");
        let mut sources = FieldSources::new();
        record_leaves(&base, "", &ConfigLayer::Defaults, &mut sources);

        let overlay = parse("[logging]\nlevel = \"debug\"\n[dispatcher]\nstrict_mode = true");
        deep_merge_tracking(&mut base, &overlay, "", &ConfigLayer::User, &mut sources);

        assert_eq!(sources.get("logging.level"), Some(&ConfigLayer::User));
        assert_eq!(
            sources.get("dispatcher.strict_mode"),
            Some(&ConfigLayer::User)
        );
        assert_eq!(base["logging"]["level"].as_str(), Some("debug"));
    }
}
