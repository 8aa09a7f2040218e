use crate::record::LogEvent;
use crate::render::{LineRenderer, RenderError};

/// Something that turns a [`LogEvent`] into the bytes of one output line.
///
/// This is the seam between a host logging framework and the formatter:
/// an adapter translates the framework's native event into a [`LogEvent`]
/// and hands it to `format`, then writes the returned bytes to its own
/// sink. Implementations must be usable from many threads at once.
pub trait LineFormat: Send + Sync {
    /// Format a single event.
    ///
    /// **Returns**
    /// - `Ok(bytes)`: the full line, trailing newline included.
    /// - `Err(..)`: the event could not be rendered; no partial output is
    ///   returned and the caller decides whether to drop the event.
    fn format(&self, event: &LogEvent) -> Result<Vec<u8>, RenderError>;
}

impl LineFormat for LineRenderer {
    fn format(&self, event: &LogEvent) -> Result<Vec<u8>, RenderError> {
        self.render(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::record::Level;
    use chrono::{FixedOffset, TimeZone};
    use std::sync::Arc;

    #[test]
    fn renderer_behind_trait_object() {
        let formatter: Arc<dyn LineFormat> =
            Arc::new(LineRenderer::new(RenderConfig::new().no_colors(true).timestamp_format("-")));
        let ts = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 6, 7, 8, 9)
            .unwrap();
        let event = LogEvent::new(ts, Level::Error, "boom").with_field("code", 500);
        assert_eq!(formatter.format(&event).unwrap(), b"- [ERRO] [code:500] boom\n".to_vec());
    }
}
