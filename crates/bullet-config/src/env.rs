//! Environment variable fallbacks.
//!
//! Env vars are **fallback**, not override: they only apply to fields that no
//! config file set.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources};

/// How an env var value is turned into a TOML value.
#[derive(Clone, Copy)]
enum FieldKind {
    Bool,
    String,
}

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
    kind: FieldKind,
}

/// All supported `BULLET_*` env var mappings.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "BULLET_STRICT_MODE",
        field_path: "dispatcher.strict_mode",
        kind: FieldKind::Bool,
    },
    EnvMapping {
        var_name: "BULLET_ASYNC_DISPATCH",
        field_path: "dispatcher.async_dispatch",
        kind: FieldKind::Bool,
    },
    EnvMapping {
        var_name: "BULLET_LOG_LEVEL",
        field_path: "logging.level",
        kind: FieldKind::String,
    },
    EnvMapping {
        var_name: "BULLET_LOG_FORMAT",
        field_path: "logging.format",
        kind: FieldKind::String,
    },
];

/// Apply environment variable fallbacks to fields that were **not** set by
/// any config file layer.
///
/// Returns the number of env vars applied.
///
/// # Errors
///
/// Returns [`ConfigError::EnvError`] if a boolean variable holds anything
/// other than `true`, `false`, `1` or `0`.
pub fn apply_env_fallbacks<S: ::std::hash::BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<usize> {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        // Defaults may be replaced; anything a file set may not.
        if sources
            .get(mapping.field_path)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults)
        {
            continue;
        }

        if let Some(val) = env_vars.get(mapping.var_name) {
            debug!(
                var = mapping.var_name,
                field = mapping.field_path,
                "applying env var fallback"
            );

            let value = coerce(mapping, val)?;
            set_field(merged, mapping.field_path, value);
            sources.insert(mapping.field_path.to_owned(), ConfigLayer::Environment);
            count = count.saturating_add(1);
        }
    }

    Ok(count)
}

fn coerce(mapping: &EnvMapping, val: &str) -> ConfigResult<toml::Value> {
    match mapping.kind {
        FieldKind::String => Ok(toml::Value::String(val.trim().to_owned())),
        FieldKind::Bool => match val.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(toml::Value::Boolean(true)),
            "false" | "0" => Ok(toml::Value::Boolean(false)),
            other => Err(ConfigError::EnvError {
                var_name: mapping.var_name.to_owned(),
                message: format!("expected a boolean (true/false/1/0), got '{other}'"),
            }),
        },
    }
}

/// Set a dotted `section.field` path in the TOML tree, creating the section
/// table when missing.
fn set_field(root: &mut toml::Value, path: &str, value: toml::Value) {
    let Some((section, field)) = path.split_once('.') else {
        return;
    };
    let Some(root) = root.as_table_mut() else {
        return;
    };

    let entry = root
        .entry(section.to_owned())
        .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    if let Some(table) = entry.as_table_mut() {
        table.insert(field.to_owned(), value);
    }
}

/// Collect all current environment variables into a map.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}
