use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Used when `LOG_LEVEL` is unset or unparsable.
const DEFAULT_FILTER: &str = "info,tower_http=debug,sqlx=warn";

/// Installs the global subscriber. `LOG_LEVEL` takes any `EnvFilter` directive;
/// `INCLUDE_SPAN_EVENTS=true` also logs span enter/exit.
pub fn init_tracing() {
    let fmt_layer = fmt::layer().with_span_events(span_events(
        std::env::var("INCLUDE_SPAN_EVENTS").ok().as_deref(),
    ));
    let filter_layer =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if let Err(err) = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
    {
        eprintln!("tracing already initialised: {err}");
    }
}

fn span_events(flag: Option<&str>) -> FmtSpan {
    match flag {
        Some(value) if value.eq_ignore_ascii_case("true") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::NONE,
    }
}
