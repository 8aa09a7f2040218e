use tracing_nested_formatter::config::RenderConfig;
use tracing_nested_formatter::init::{init_tracing_with_config, InitConfig, InitError};

// Runs in its own test binary: it owns the process-wide subscriber.
#[test]
fn second_global_install_is_rejected() {
    let config = || InitConfig {
        render: RenderConfig::new().no_colors(true),
        report_caller: false,
    };

    init_tracing_with_config(config()).unwrap();
    tracing::info!("installed");

    let err = init_tracing_with_config(config()).unwrap_err();
    assert!(matches!(err, InitError::SetGlobal(_)), "{}", err);
}
