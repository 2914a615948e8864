use axum::extract::DefaultBodyLimit;
use axum::Router;
use tracing::info;

use crate::config::Settings;
use crate::{access_log, router, security, AppState};

/// Assemble the routed application with its state, before HTTP layers.
pub(crate) fn build(settings: &Settings) -> Router<()> {
    let (router, endpoints) = router::build_router();
    let state = AppState::new(&settings.web_dir, &settings.console_dir).with_endpoints(endpoints);
    info!(
        web_dir = %settings.web_dir.display(),
        console_dir = %settings.console_dir.display(),
        "workspace ready"
    );
    router
        .layer(DefaultBodyLimit::max(settings.upload_limit_bytes))
        .with_state(state)
}

pub(crate) fn attach_http_layers(router: Router<()>, concurrency_limit: usize) -> Router<()> {
    use tower::limit::ConcurrencyLimitLayer;
    use tower_http::{compression::CompressionLayer, trace::TraceLayer};

    router
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(concurrency_limit))
}

pub(crate) fn attach_global_layers(router: Router<()>) -> Router<()> {
    router
        .layer(axum::middleware::from_fn(access_log::access_log_mw))
        .layer(axum::middleware::from_fn(security::headers_mw))
}
