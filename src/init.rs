use crate::config::RenderConfig;
use crate::env::EnvConfigError;
use crate::layer::{NestedFormat, SpanFieldsLayer};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the subscriber installed by [`init_tracing_with_config`].
///
/// **Fields**
/// - `render`: [`RenderConfig`] used for every line.
/// - `report_caller`: attach file, line and module path to each event.
#[derive(Clone, Debug, Default)]
pub struct InitConfig {
    pub render: RenderConfig,
    pub report_caller: bool,
}

/// Error returned when the global subscriber cannot be installed.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("invalid formatter environment: {0}")]
    Env(#[from] EnvConfigError),

    #[error("global subscriber already set: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Build a subscriber that writes formatted lines to `writer`.
///
/// The subscriber is a [`Registry`] with [`SpanFieldsLayer`] and a `fmt`
/// layer using [`NestedFormat`]. Useful with
/// `tracing::subscriber::with_default` or when the caller wants to own
/// installation.
///
/// Render failures are reported on stderr by the formatter itself, so the
/// `fmt` layer's own error line is disabled.
pub fn subscriber_with_writer<W>(config: InitConfig, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let format = NestedFormat::new(config.render).with_caller(config.report_caller);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_writer(writer)
        .log_internal_errors(false);
    Registry::default().with(SpanFieldsLayer).with(fmt_layer)
}

/// Install a stdout subscriber using the provided [`InitConfig`] as the
/// global default.
pub fn init_tracing_with_config(config: InitConfig) -> Result<(), InitError> {
    let subscriber = subscriber_with_writer(config, std::io::stdout);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Install a stdout subscriber configured from `LOG_FORMAT_*` environment
/// variables (see [`crate::env`]).
pub fn init_tracing() -> Result<(), InitError> {
    let render = RenderConfig::from_env()?;
    init_tracing_with_config(InitConfig {
        render,
        report_caller: false,
    })
}
