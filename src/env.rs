//! Environment variable names used to configure the formatter from a
//! service's environment.
//!
//! These are helpers; [`RenderConfig`] itself never touches the process
//! environment.

use crate::config::RenderConfig;

/// Comma separated list of field names printed first.
pub const LOG_FORMAT_FIELDS_ORDER_ENV: &str = "LOG_FORMAT_FIELDS_ORDER";

/// strftime timestamp specifier.
pub const LOG_FORMAT_TIMESTAMP_ENV: &str = "LOG_FORMAT_TIMESTAMP";

pub const LOG_FORMAT_HIDE_KEYS_ENV: &str = "LOG_FORMAT_HIDE_KEYS";
pub const LOG_FORMAT_NO_COLORS_ENV: &str = "LOG_FORMAT_NO_COLORS";
pub const LOG_FORMAT_NO_FIELDS_COLORS_ENV: &str = "LOG_FORMAT_NO_FIELDS_COLORS";
pub const LOG_FORMAT_NO_FIELDS_SPACE_ENV: &str = "LOG_FORMAT_NO_FIELDS_SPACE";
pub const LOG_FORMAT_FULL_LEVEL_ENV: &str = "LOG_FORMAT_FULL_LEVEL";
pub const LOG_FORMAT_NO_UPPERCASE_LEVEL_ENV: &str = "LOG_FORMAT_NO_UPPERCASE_LEVEL";
pub const LOG_FORMAT_TRIM_MESSAGES_ENV: &str = "LOG_FORMAT_TRIM_MESSAGES";
pub const LOG_FORMAT_CALLER_FIRST_ENV: &str = "LOG_FORMAT_CALLER_FIRST";

/// Name of the field rendered as the module segment.
pub const LOG_FORMAT_MODULE_ENV: &str = "LOG_FORMAT_MODULE";

/// Any non-empty value disables colors (see <https://no-color.org>).
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// Error returned when an environment value cannot be interpreted.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum EnvConfigError {
    #[error("invalid boolean for {key}: {value:?}")]
    InvalidBool { key: String, value: String },
}

fn parse_bool(key: &str, value: &str) -> Result<bool, EnvConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(EnvConfigError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

impl RenderConfig {
    /// Build a config from the process environment.
    pub fn from_env() -> Result<Self, EnvConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys keep their
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EnvConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| -> Result<bool, EnvConfigError> {
            match lookup(key) {
                Some(value) => parse_bool(key, &value),
                None => Ok(false),
            }
        };

        let mut cfg = RenderConfig {
            hide_keys: flag(LOG_FORMAT_HIDE_KEYS_ENV)?,
            no_colors: flag(LOG_FORMAT_NO_COLORS_ENV)?,
            no_fields_colors: flag(LOG_FORMAT_NO_FIELDS_COLORS_ENV)?,
            no_fields_space: flag(LOG_FORMAT_NO_FIELDS_SPACE_ENV)?,
            show_full_level: flag(LOG_FORMAT_FULL_LEVEL_ENV)?,
            no_uppercase_level: flag(LOG_FORMAT_NO_UPPERCASE_LEVEL_ENV)?,
            trim_messages: flag(LOG_FORMAT_TRIM_MESSAGES_ENV)?,
            caller_first: flag(LOG_FORMAT_CALLER_FIRST_ENV)?,
            ..RenderConfig::default()
        };

        if let Some(order) = lookup(LOG_FORMAT_FIELDS_ORDER_ENV) {
            cfg.fields_order = order
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(format) = lookup(LOG_FORMAT_TIMESTAMP_ENV) {
            cfg.timestamp_format = format;
        }
        if let Some(module) = lookup(LOG_FORMAT_MODULE_ENV).filter(|m| !m.is_empty()) {
            cfg.module_name = Some(module);
        }
        if lookup(NO_COLOR_ENV).map_or(false, |v| !v.is_empty()) {
            cfg.no_colors = true;
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn reads_all_options() {
        let cfg = RenderConfig::from_lookup(lookup(&[
            (LOG_FORMAT_FIELDS_ORDER_ENV, "component, category,,req"),
            (LOG_FORMAT_TIMESTAMP_ENV, "%H:%M"),
            (LOG_FORMAT_HIDE_KEYS_ENV, "yes"),
            (LOG_FORMAT_NO_FIELDS_SPACE_ENV, "1"),
            (LOG_FORMAT_FULL_LEVEL_ENV, "TRUE"),
            (LOG_FORMAT_MODULE_ENV, "mod"),
        ]))
        .unwrap();

        assert_eq!(cfg.fields_order, vec!["component", "category", "req"]);
        assert_eq!(cfg.timestamp_format, "%H:%M");
        assert!(cfg.hide_keys);
        assert!(cfg.no_fields_space);
        assert!(cfg.show_full_level);
        assert!(!cfg.no_colors);
        assert_eq!(cfg.module_key(), Some("mod"));
    }

    #[test]
    fn no_color_forces_plain_output() {
        let cfg = RenderConfig::from_lookup(lookup(&[(NO_COLOR_ENV, "1")])).unwrap();
        assert!(cfg.no_colors);

        let cfg = RenderConfig::from_lookup(lookup(&[(NO_COLOR_ENV, "")])).unwrap();
        assert!(!cfg.no_colors);
    }

    #[test]
    fn rejects_garbage_bool() {
        let err = RenderConfig::from_lookup(lookup(&[(LOG_FORMAT_NO_COLORS_ENV, "maybe")]))
            .unwrap_err();
        assert_eq!(
            err,
            EnvConfigError::InvalidBool {
                key: LOG_FORMAT_NO_COLORS_ENV.to_string(),
                value: "maybe".to_string(),
            }
        );
    }
}
