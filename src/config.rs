use crate::record::Caller;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Default timestamp layout: month abbreviation, space-padded day and
/// milliseconds, e.g. `Jan  2 15:04:05.000`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%b %e %H:%M:%S%.3f";

/// Replaces the default `(file:line function)` caller text.
///
/// Returning an empty string suppresses the caller segment for that event.
pub type CallerFormatter = Arc<dyn Fn(&Caller) -> String + Send + Sync>;

/// Rendering options for [`LineRenderer`](crate::render::LineRenderer).
///
/// Built once and shared read-only by every render call. All switches
/// default to off; an empty `timestamp_format` falls back to
/// [`DEFAULT_TIMESTAMP_FORMAT`].
///
/// **Fields**
/// - `fields_order`: field names printed first, in this order. Remaining
///   fields follow alphabetically. Empty means alphabetical only.
/// - `timestamp_format`: `chrono` strftime specifier.
/// - `hide_keys`: print `[value]` instead of `[key:value]`.
/// - `no_colors`: never write ANSI escapes.
/// - `no_fields_colors`: color the level tag only.
/// - `no_fields_space`: no space between adjacent field brackets.
/// - `show_full_level`: `[WARNING]` instead of `[WARN]`.
/// - `no_uppercase_level`: keep the level's natural lowercase.
/// - `trim_messages`: strip surrounding whitespace from the message.
/// - `caller_first`: print the caller before the level tag.
/// - `module_name`: field rendered as `[value]` right after the level.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub fields_order: Vec<String>,
    pub timestamp_format: String,
    pub hide_keys: bool,
    pub no_colors: bool,
    pub no_fields_colors: bool,
    pub no_fields_space: bool,
    pub show_full_level: bool,
    pub no_uppercase_level: bool,
    pub trim_messages: bool,
    pub caller_first: bool,
    #[serde(skip)]
    pub custom_caller_formatter: Option<CallerFormatter>,
    pub module_name: Option<String>,
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("fields_order", &self.fields_order)
            .field("timestamp_format", &self.timestamp_format)
            .field("hide_keys", &self.hide_keys)
            .field("no_colors", &self.no_colors)
            .field("no_fields_colors", &self.no_fields_colors)
            .field("no_fields_space", &self.no_fields_space)
            .field("show_full_level", &self.show_full_level)
            .field("no_uppercase_level", &self.no_uppercase_level)
            .field("trim_messages", &self.trim_messages)
            .field("caller_first", &self.caller_first)
            .field("custom_caller_formatter", &self.custom_caller_formatter.is_some())
            .field("module_name", &self.module_name)
            .finish()
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields_order = order.into_iter().map(Into::into).collect();
        self
    }

    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub fn hide_keys(mut self, on: bool) -> Self {
        self.hide_keys = on;
        self
    }

    pub fn no_colors(mut self, on: bool) -> Self {
        self.no_colors = on;
        self
    }

    pub fn no_fields_colors(mut self, on: bool) -> Self {
        self.no_fields_colors = on;
        self
    }

    pub fn no_fields_space(mut self, on: bool) -> Self {
        self.no_fields_space = on;
        self
    }

    pub fn show_full_level(mut self, on: bool) -> Self {
        self.show_full_level = on;
        self
    }

    pub fn no_uppercase_level(mut self, on: bool) -> Self {
        self.no_uppercase_level = on;
        self
    }

    pub fn trim_messages(mut self, on: bool) -> Self {
        self.trim_messages = on;
        self
    }

    pub fn caller_first(mut self, on: bool) -> Self {
        self.caller_first = on;
        self
    }

    pub fn custom_caller_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Caller) -> String + Send + Sync + 'static,
    {
        self.custom_caller_formatter = Some(Arc::new(formatter));
        self
    }

    pub fn module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = Some(name.into());
        self
    }

    /// Timestamp format in effect, honoring the default.
    pub fn effective_timestamp_format(&self) -> &str {
        if self.timestamp_format.is_empty() {
            DEFAULT_TIMESTAMP_FORMAT
        } else {
            &self.timestamp_format
        }
    }

    /// Module field name, if one is configured and non-empty.
    pub fn module_key(&self) -> Option<&str> {
        self.module_name.as_deref().filter(|name| !name.is_empty())
    }
}
