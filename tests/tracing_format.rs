use std::io;
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info, info_span, warn};
use tracing_nested_formatter::config::RenderConfig;
use tracing_nested_formatter::init::{subscriber_with_writer, InitConfig};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture<F: FnOnce()>(config: InitConfig, f: F) -> String {
    let out = Captured::default();
    let writer = out.clone();
    let subscriber = subscriber_with_writer(config, move || writer.clone());
    tracing::subscriber::with_default(subscriber, f);
    out.text()
}

fn plain() -> RenderConfig {
    RenderConfig::new().no_colors(true).timestamp_format("-")
}

fn with(render: RenderConfig) -> InitConfig {
    InitConfig {
        render,
        report_caller: false,
    }
}

#[test]
fn levels_through_tracing() {
    let out = capture(with(plain()), || {
        debug!("test1");
        info!("test2");
        warn!("test3");
        error!("test4");
    });
    assert_eq!(out, "- [DEBU] test1\n- [INFO] test2\n- [WARN] test3\n- [ERRO] test4\n");
}

#[test]
fn full_level_through_tracing() {
    let out = capture(with(plain().show_full_level(true)), || {
        warn!("test3");
        error!("test4");
    });
    assert_eq!(out, "- [WARNING] test3\n- [ERROR] test4\n");
}

#[test]
fn event_fields_are_sorted() {
    let out = capture(with(plain()), || {
        info!(d = true, b = "main", c = 100, a = "rest", "test1");
    });
    assert_eq!(out, "- [INFO] [a:rest] [b:main] [c:100] [d:true] test1\n");
}

#[test]
fn ordered_fields_and_module() {
    let render = plain().module_name("module").fields_order(["req", "reqId"]);
    let out = capture(with(render), || {
        info!(module = "web-server", reqId = "#1", req = "GET /api/stats", extra = 1.5, "params");
    });
    assert_eq!(
        out,
        "- [INFO] [web-server] [req:GET /api/stats] [reqId:#1] [extra:1.5] params\n"
    );
}

#[test]
fn span_fields_are_inherited() {
    let out = capture(with(plain().module_name("module")), || {
        let server = info_span!("server", module = "web-server");
        let _server = server.enter();
        info!("starting...");

        let request = info_span!("request", req = "GET /api/stats", reqId = "#1");
        let _request = request.enter();
        error!(reqId = "#2", "response: 400 Bad Request");
    });
    assert_eq!(
        out,
        "- [INFO] [web-server] starting...\n\
         - [ERRO] [web-server] [req:GET /api/stats] [reqId:#2] response: 400 Bad Request\n"
    );
}

#[test]
fn recorded_span_fields_show_up() {
    let out = capture(with(plain()), || {
        let span = info_span!("job", state = tracing::field::Empty);
        span.record("state", "running");
        let _guard = span.enter();
        info!("tick");
    });
    assert_eq!(out, "- [INFO] [state:running] tick\n");
}

#[test]
fn debug_values_use_debug_text() {
    let out = capture(with(plain()), || {
        info!(opt = ?Some(3), "dbg");
    });
    assert_eq!(out, "- [INFO] [opt:Some(3)] dbg\n");
}

#[test]
fn caller_is_reported_when_enabled() {
    let config = InitConfig {
        render: plain(),
        report_caller: true,
    };
    let out = capture(config, || info!("here"));
    assert!(out.starts_with("- [INFO] here (tests/tracing_format.rs:"), "{}", out);
    assert!(out.ends_with(" tracing_format)\n"), "{}", out);
}

#[test]
fn caller_first_with_custom_formatter() {
    let render = plain()
        .caller_first(true)
        .custom_caller_formatter(|c| format!("[{}]", c.function));
    let config = InitConfig {
        render,
        report_caller: true,
    };
    let out = capture(config, || info!("here"));
    assert_eq!(out, "- [tracing_format] [INFO] here\n");
}

#[test]
fn colored_output_through_tracing() {
    let render = RenderConfig::new().timestamp_format("-").module_name("module");
    let out = capture(with(render), || {
        info!(module = "test_mod", b = "world", a = "hello", "test1");
    });
    assert_eq!(
        out,
        "- \x1b[36m[INFO]\x1b[0m \x1b[36m[test_mod]\x1b[0m \x1b[36m[a:hello] [b:world]\x1b[0m test1\n"
    );
}

#[test]
fn invalid_timestamp_drops_event() {
    let out = capture(with(plain().timestamp_format("%Q")), || info!("lost"));
    assert_eq!(out, "");
}

#[test]
fn typed_message_becomes_the_message() {
    let out = capture(with(plain()), || {
        info!(message = 5i64);
        info!(message = 7u64, x = 1);
        info!(message = 2.5);
        info!(message = false);
    });
    assert_eq!(
        out,
        "- [INFO] 5\n- [INFO] [x:1] 7\n- [INFO] 2.5\n- [INFO] false\n"
    );
}

#[test]
fn span_message_field_stays_a_field() {
    let out = capture(with(plain()), || {
        let span = info_span!("s", message = "outer");
        let _guard = span.enter();
        info!("inner");
    });
    assert_eq!(out, "- [INFO] [message:outer] inner\n");
}
