use tracing::{error, info, info_span, warn};

use tracing_nested_formatter::config::RenderConfig;
use tracing_nested_formatter::init::{init_tracing_with_config, InitConfig};

fn main() {
    let render = RenderConfig::new()
        .fields_order(["component", "category", "req"])
        .module_name("module")
        .timestamp_format("%Y-%m-%d %H:%M:%S%.3f")
        .no_fields_space(true);

    if let Err(e) = init_tracing_with_config(InitConfig {
        render,
        report_caller: false,
    }) {
        eprintln!("failed to install subscriber: {}", e);
        return;
    }

    info!("this is nested formatter demo");

    let web_server = info_span!("web", module = "web-server");
    {
        let _web = web_server.enter();
        info!("starting...");

        let request = info_span!("request", req = "GET /api/stats", reqId = "#1");
        let _request = request.enter();
        info!("params: startYear=2048");
        error!("response: 400 Bad Request");
    }

    let db = info_span!("db", module = "db-connector");
    {
        let _db = db.enter();
        info!("connecting to db on 10.10.10.13...");
        warn!("connection took 10s");
    }

    info!("demo end.");
}
