use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;
use std::fmt;

/// Severity of a [`LogEvent`].
///
/// Only used to pick the level text and color; the renderer never filters
/// or sorts by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl Level {
    /// Natural (lowercase) name of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warning",
            Level::Error => "error",
            Level::Fatal => "fatal",
            Level::Panic => "panic",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&tracing::Level> for Level {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Call-site of a log statement as captured by the host framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: String,
    pub line: u32,
    pub function: String,
}

impl Caller {
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        Caller {
            file: file.into(),
            line,
            function: function.into(),
        }
    }
}

/// Value of a context field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    /// Pre-rendered text of a value only available through `Debug`.
    Other(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) | FieldValue::Other(s) => f.write_str(s),
            FieldValue::I64(v) => write!(f, "{}", v),
            FieldValue::U64(v) => write!(f, "{}", v),
            FieldValue::F64(v) => write!(f, "{}", v),
            FieldValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::F64(v)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(v: $t) -> Self {
                FieldValue::I64(v as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(v: $t) -> Self {
                FieldValue::U64(v as u64)
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

#[cfg(feature = "json")]
impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::String(s) => FieldValue::Str(s),
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::I64(i)
                } else if let Some(u) = n.as_u64() {
                    FieldValue::U64(u)
                } else {
                    FieldValue::F64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            other => FieldValue::Other(other.to_string()),
        }
    }
}

/// A single log event handed to the renderer.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<FixedOffset>,
    pub level: Level,
    pub message: String,
    pub fields: BTreeMap<String, FieldValue>,
    pub caller: Option<Caller>,
}

impl LogEvent {
    pub fn new(timestamp: DateTime<FixedOffset>, level: Level, message: impl Into<String>) -> Self {
        LogEvent {
            timestamp,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
            caller: None,
        }
    }

    /// Add (or replace) a context field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }
}
