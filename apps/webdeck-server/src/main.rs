use std::net::SocketAddr;

use anyhow::Context;
use tracing::{error, info};

mod access_log;
mod api;
mod app_state;
mod bootstrap;
mod config;
mod matrix;
mod responses;
mod router;
mod security;

pub(crate) use app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    webdeck_otel::init();
    let settings = config::settings_from_env()?;

    let app = bootstrap::attach_global_layers(bootstrap::attach_http_layers(
        bootstrap::build(&settings),
        settings.concurrency_limit,
    ));

    let listener = tokio::net::TcpListener::bind(settings.addr)
        .await
        .with_context(|| format!("bind server socket {}", settings.addr))?;
    info!(addr = %settings.addr, "webdeck listening");

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal());

    if let Err(err) = server.await {
        error!("http server exited with error: {err}");
        return Err(err.into());
    }
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    info!("shutdown signal listener active");
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                error!("failed to install SIGTERM handler: {err}");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("shutdown signal received");
}
