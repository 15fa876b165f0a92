use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "brain=info";

/// JSON logs on stderr so stdout stays for command output. `RUST_LOG`
/// overrides the default filter. Keep the guard alive until exit or the last
/// lines are lost.
pub fn init() -> WorkerGuard {
    let (writer, guard) = non_blocking(std::io::stderr());
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .log_internal_errors(true)
                .with_file(true)
                .with_line_number(true)
                .with_current_span(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true),
        );
    // A second init, as in tests, keeps the first subscriber.
    let _ = subscriber.try_init();
    guard
}
