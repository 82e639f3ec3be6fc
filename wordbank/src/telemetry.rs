use crate::config::CommonConfig;
use metrics_exporter_statsd::{StatsdBuilder, StatsdError};
use shared::metrics_defs::describe_all;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

const METRICS_PREFIX: &str = "wordbank";

#[derive(thiserror::Error, Debug)]
pub enum TelemetryError {
    #[error("could not build statsd recorder: {0}")]
    Statsd(#[from] StatsdError),
    #[error("a metrics recorder is already installed")]
    RecorderInstalled,
    #[error("could not install log subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

/// Keeps the sentry client alive; events are flushed when it is dropped.
pub struct TelemetryGuard {
    _sentry: Option<sentry::ClientInitGuard>,
}

/// Installs the log subscriber, sentry and the statsd metrics recorder.
///
/// `RUST_LOG` takes precedence over the configured log level.
pub fn init(common: &CommonConfig) -> Result<TelemetryGuard, TelemetryError> {
    let level = common
        .logging
        .as_ref()
        .map_or("info", |logging| logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let sentry_guard = common.logging.as_ref().map(|logging| {
        sentry::init((
            logging.sentry_dsn.as_str(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            sentry_guard
                .as_ref()
                .map(|_| sentry::integrations::tracing::layer()),
        )
        .try_init()?;

    if let Some(metrics) = &common.metrics {
        let recorder = StatsdBuilder::from(metrics.statsd_host.clone(), metrics.statsd_port)
            .build(Some(METRICS_PREFIX))?;
        metrics::set_global_recorder(recorder).map_err(|_| TelemetryError::RecorderInstalled)?;

        describe_all(letter_store::metrics_defs::ALL_METRICS);
        describe_all(upload_api::metrics_defs::ALL_METRICS);
        tracing::info!(
            host = %metrics.statsd_host,
            port = metrics.statsd_port,
            "Sending metrics to statsd"
        );
    }

    Ok(TelemetryGuard {
        _sentry: sentry_guard,
    })
}
