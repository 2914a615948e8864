use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use axum::extract::{ConnectInfo, MatchedPath};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use once_cell::sync::Lazy;
use webdeck_core::util::{env_bool, env_nonempty};

#[derive(Clone, Debug)]
struct Cfg {
    enabled: bool,
    sample_n: u64,
    ua: bool,
}

static CFG: Lazy<Cfg> = Lazy::new(|| Cfg {
    enabled: env_bool("WEBDECK_ACCESS_LOG").unwrap_or(true),
    sample_n: env_nonempty("WEBDECK_ACCESS_SAMPLE_N")
        .and_then(|s| s.parse().ok())
        .unwrap_or(1)
        .max(1),
    ua: env_bool("WEBDECK_ACCESS_UA").unwrap_or(false),
});

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn sampled(n: u64, sample_n: u64) -> bool {
    sample_n <= 1 || n % sample_n == 0
}

pub async fn access_log_mw(req: Request<axum::body::Body>, next: Next) -> Response {
    if !CFG.enabled {
        return next.run(req).await;
    }
    let started = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|c| c.0.ip().to_string())
        .unwrap_or_default();
    let ua = if CFG.ua {
        req.headers()
            .get(axum::http::header::USER_AGENT)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
    } else {
        None
    };
    let res = next.run(req).await;
    let n = COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    if !sampled(n, CFG.sample_n) {
        return res;
    }
    let dur_ms = started.elapsed().as_millis() as u64;
    tracing::info!(
        target: webdeck_otel::ACCESS_TARGET,
        method = %method,
        path = %path,
        status = res.status().as_u16(),
        dur_ms,
        remote = %remote,
        ua = ua.as_deref().unwrap_or(""),
        "request"
    );
    res
}
