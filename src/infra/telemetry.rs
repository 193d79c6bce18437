use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    filter::Directive,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

/// Chatty dependencies are capped unless `RUST_LOG` says otherwise.
const QUIET_DIRECTIVES: &[&str] = &["sqlx::query=warn", "hyper=warn", "tower_http=warn"];

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    let env_filter = build_filter(logging)?;

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn build_filter(logging: &LoggingSettings) -> Result<EnvFilter, InfraError> {
    let mut filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() {
        for raw in QUIET_DIRECTIVES {
            let directive: Directive = raw.parse().map_err(|err| {
                InfraError::telemetry(format!("invalid log directive `{raw}`: {err}"))
            })?;
            filter = filter.add_directive(directive);
        }
    }

    Ok(filter)
}
