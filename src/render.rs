use crate::config::RenderConfig;
use crate::record::{Level, LogEvent};
use chrono::format::{Item, StrftimeItems};
use std::collections::HashSet;
use std::fmt::{self, Write};

const RESET: &str = "\x1b[0m";

/// Color used for one event, chosen from its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Yellow,
    Blue,
    Gray,
}

impl Color {
    pub fn for_level(level: Level) -> Self {
        match level {
            Level::Trace | Level::Debug => Color::Gray,
            Level::Warn => Color::Yellow,
            Level::Error | Level::Fatal | Level::Panic => Color::Red,
            Level::Info => Color::Blue,
        }
    }

    pub fn escape(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[36m",
            Color::Gray => "\x1b[37m",
        }
    }
}

/// Error returned when an event cannot be rendered.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("invalid timestamp format: {0:?}")]
    InvalidTimestampFormat(String),

    #[error("formatting failed: {0}")]
    Fmt(#[from] fmt::Error),
}

/// Renders [`LogEvent`]s into single bracketed text lines:
///
/// ```text
/// <timestamp>[ <caller>] [LEVEL] [module] [k:v] [k:v] <message>[ <caller>]
/// ```
///
/// The renderer owns its [`RenderConfig`] and never mutates it, so one
/// instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct LineRenderer {
    config: RenderConfig,
}

impl LineRenderer {
    pub fn new(config: RenderConfig) -> Self {
        LineRenderer { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render one event, newline included.
    pub fn render(&self, event: &LogEvent) -> Result<Vec<u8>, RenderError> {
        let mut buf = String::with_capacity(128);
        self.render_into(&mut buf, event)?;
        Ok(buf.into_bytes())
    }

    /// Append the rendered line to `buf`. On error `buf` may hold a partial
    /// line and should be discarded.
    pub fn render_into(&self, buf: &mut String, event: &LogEvent) -> Result<(), RenderError> {
        self.write_timestamp(buf, event)?;

        if self.config.caller_first {
            self.write_caller(buf, event)?;
        }

        let color = Color::for_level(event.level);
        self.write_level(buf, event.level, color);
        self.write_module(buf, event, color)?;
        self.write_fields(buf, event, color)?;

        buf.push(' ');
        if self.config.trim_messages {
            buf.push_str(event.message.trim());
        } else {
            buf.push_str(&event.message);
        }

        if !self.config.caller_first {
            self.write_caller(buf, event)?;
        }

        buf.push('\n');
        Ok(())
    }

    fn write_timestamp(&self, buf: &mut String, event: &LogEvent) -> Result<(), RenderError> {
        let format = self.config.effective_timestamp_format();
        let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return Err(RenderError::InvalidTimestampFormat(format.to_string()));
        }
        write!(buf, "{}", event.timestamp.format_with_items(items.iter()))?;
        Ok(())
    }

    fn write_caller(&self, buf: &mut String, event: &LogEvent) -> fmt::Result {
        let caller = match &event.caller {
            Some(caller) => caller,
            None => return Ok(()),
        };

        match &self.config.custom_caller_formatter {
            Some(formatter) => {
                // Empty output opts this event out of the caller segment.
                let text = formatter(caller);
                if !text.is_empty() {
                    buf.push(' ');
                    buf.push_str(&text);
                }
                Ok(())
            }
            None => write!(buf, " ({}:{} {})", caller.file, caller.line, caller.function),
        }
    }

    fn write_level(&self, buf: &mut String, level: Level, color: Color) {
        let name = level.as_str();
        let name = if self.config.show_full_level {
            name
        } else {
            name.get(..4).unwrap_or(name)
        };

        buf.push(' ');
        self.start_color(buf, color, true);
        buf.push('[');
        if self.config.no_uppercase_level {
            buf.push_str(name);
        } else {
            buf.push_str(&name.to_uppercase());
        }
        buf.push(']');
        self.stop_color(buf, true);
    }

    fn write_module(&self, buf: &mut String, event: &LogEvent, color: Color) -> fmt::Result {
        let value = match self.config.module_key().and_then(|key| event.fields.get(key)) {
            Some(value) => value,
            None => return Ok(()),
        };

        let colored = !self.config.no_fields_colors;
        buf.push(' ');
        self.start_color(buf, color, colored);
        write!(buf, "[{}]", value)?;
        self.stop_color(buf, colored);
        Ok(())
    }

    /// Keys to print, in print order: configured order first, then the rest
    /// alphabetically. The module field never appears here.
    fn field_keys<'e>(&self, event: &'e LogEvent) -> Vec<&'e str> {
        let module = self.config.module_key();
        let mut keys: Vec<&'e str> = Vec::with_capacity(event.fields.len());
        let mut seen: HashSet<&str> = HashSet::new();

        for name in &self.config.fields_order {
            if Some(name.as_str()) == module {
                continue;
            }
            if let Some((key, _)) = event.fields.get_key_value(name.as_str()) {
                if seen.insert(key.as_str()) {
                    keys.push(key.as_str());
                }
            }
        }

        // BTreeMap iterates in ascending key order.
        for key in event.fields.keys() {
            if Some(key.as_str()) == module || seen.contains(key.as_str()) {
                continue;
            }
            keys.push(key.as_str());
        }

        keys
    }

    fn write_fields(&self, buf: &mut String, event: &LogEvent, color: Color) -> fmt::Result {
        let keys = self.field_keys(event);
        if keys.is_empty() {
            return Ok(());
        }

        let colored = !self.config.no_fields_colors;
        buf.push(' ');
        self.start_color(buf, color, colored);
        for (i, key) in keys.iter().enumerate() {
            if i > 0 && !self.config.no_fields_space {
                buf.push(' ');
            }
            let value = &event.fields[*key];
            if self.config.hide_keys {
                write!(buf, "[{}]", value)?;
            } else {
                write!(buf, "[{}:{}]", key, value)?;
            }
        }
        self.stop_color(buf, colored);
        Ok(())
    }

    fn start_color(&self, buf: &mut String, color: Color, enabled: bool) {
        if !self.config.no_colors && enabled {
            buf.push_str(color.escape());
        }
    }

    fn stop_color(&self, buf: &mut String, enabled: bool) {
        if !self.config.no_colors && enabled {
            buf.push_str(RESET);
        }
    }
}
