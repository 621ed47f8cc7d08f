use crate::cli::ServeArgs;
use crate::infra::{Adapters, AppState};
use crate::routes::build_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use launchpad::config::AppConfig;
use launchpad::error::AppError;
use launchpad::profiles::{Sessions, StaticSessionResolver};
use launchpad::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let resolver = StaticSessionResolver::parse(&config.auth.sessions)?;
    if resolver.is_empty() {
        warn!("APP_SESSIONS is empty; every authenticated route will answer 401");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let adapters = Adapters::in_memory(&config.media.public_base_url);
    let app = build_router(&config, &adapters, Sessions(Arc::new(resolver)))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "launchpad directory ready");

    axum::serve(listener, app).await?;
    Ok(())
}
