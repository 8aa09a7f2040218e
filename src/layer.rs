use crate::config::RenderConfig;
use crate::record::{Caller, FieldValue, Level, LogEvent};
use crate::render::LineRenderer;
use chrono::{DateTime, FixedOffset, Local};
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Fields recorded on a span, stored in the span's extensions by
/// [`SpanFieldsLayer`].
#[derive(Debug, Clone, Default)]
pub struct SpanFields(pub BTreeMap<String, FieldValue>);

/// Layer that remembers span fields so [`NestedFormat`] can merge them
/// into the field bag of every event inside the span.
///
/// Without it only the event's own fields are rendered. A span has no
/// message of its own, so a span field named `message` is kept as an
/// ordinary field.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanFieldsLayer;

impl<S> Layer<S> for SpanFieldsLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let span = match ctx.span(id) {
            Some(span) => span,
            None => return,
        };

        let mut fields = BTreeMap::new();
        attrs.record(&mut FieldVisitor {
            fields: &mut fields,
            message: None,
        });

        span.extensions_mut().insert(SpanFields(fields));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let span = match ctx.span(id) {
            Some(span) => span,
            None => return,
        };

        let mut extensions = span.extensions_mut();
        if let Some(span_fields) = extensions.get_mut::<SpanFields>() {
            values.record(&mut FieldVisitor {
                fields: &mut span_fields.0,
                message: None,
            });
        }
    }
}

/// `tracing_subscriber` event formatter that renders every event through a
/// [`LineRenderer`].
///
/// ```rust,ignore
/// use tracing_nested_formatter::{config::RenderConfig, layer::{NestedFormat, SpanFieldsLayer}};
/// use tracing_subscriber::prelude::*;
///
/// let format = NestedFormat::new(RenderConfig::new().module_name("mod"));
/// tracing_subscriber::registry()
///     .with(SpanFieldsLayer)
///     .with(tracing_subscriber::fmt::layer().event_format(format))
///     .init();
/// ```
#[derive(Debug, Clone)]
pub struct NestedFormat {
    renderer: LineRenderer,
    with_caller: bool,
}

impl NestedFormat {
    pub fn new(config: RenderConfig) -> Self {
        NestedFormat {
            renderer: LineRenderer::new(config),
            with_caller: false,
        }
    }

    /// Attach file, line and module path of the call-site to each event.
    pub fn with_caller(mut self, on: bool) -> Self {
        self.with_caller = on;
        self
    }

    pub fn renderer(&self) -> &LineRenderer {
        &self.renderer
    }

    /// Translate a `tracing` event into a [`LogEvent`]. `inherited` holds
    /// span fields; the event's own fields override them.
    pub fn to_log_event(
        &self,
        event: &Event<'_>,
        inherited: BTreeMap<String, FieldValue>,
        timestamp: DateTime<FixedOffset>,
    ) -> LogEvent {
        let mut fields = inherited;
        let mut message = None;
        event.record(&mut FieldVisitor {
            fields: &mut fields,
            message: Some(&mut message),
        });

        let meta = event.metadata();
        let caller = if self.with_caller {
            meta.file().map(|file| {
                Caller::new(
                    file,
                    meta.line().unwrap_or(0),
                    meta.module_path().unwrap_or_else(|| meta.target()),
                )
            })
        } else {
            None
        };

        LogEvent {
            timestamp,
            level: Level::from(meta.level()),
            message: message.unwrap_or_default(),
            fields,
            caller,
        }
    }
}

impl<S, N> FormatEvent<S, N> for NestedFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut inherited = BTreeMap::new();
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                let extensions = span.extensions();
                if let Some(span_fields) = extensions.get::<SpanFields>() {
                    inherited.extend(span_fields.0.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }

        let now: DateTime<FixedOffset> = Local::now().into();
        let record = self.to_log_event(event, inherited, now);

        let mut line = String::with_capacity(128);
        if let Err(e) = self.renderer.render_into(&mut line, &record) {
            eprintln!("failed to render log event, dropping it: {}", e);
            return Err(fmt::Error);
        }
        writer.write_str(&line)
    }
}

/// Collects `tracing` field values into a field bag. When `message` is set,
/// the `message` field is rendered to text and stored there instead.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, FieldValue>,
    pub message: Option<&'a mut Option<String>>,
}

impl<'a> FieldVisitor<'a> {
    fn insert(&mut self, field: &Field, value: FieldValue) {
        match self.message.as_deref_mut() {
            Some(message) if field.name() == "message" => *message = Some(value.to_string()),
            _ => {
                self.fields.insert(field.name().to_string(), value);
            }
        }
    }
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, FieldValue::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, FieldValue::I64(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, FieldValue::U64(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, FieldValue::F64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, FieldValue::Bool(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, FieldValue::Other(format!("{:?}", value)));
    }
}
