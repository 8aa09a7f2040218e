pub mod record;
pub mod config;
pub mod env;
pub mod render;
pub mod sink;
pub mod layer;
pub mod init;

pub use config::RenderConfig;
pub use record::{Caller, FieldValue, Level, LogEvent};
pub use render::{LineRenderer, RenderError};
pub use sink::LineFormat;
