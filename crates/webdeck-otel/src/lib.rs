use once_cell::sync::OnceCell;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{
    fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};
use webdeck_core::util::{env_bool, env_nonempty};

/// Target used for per-request access lines.
pub const ACCESS_TARGET: &str = "http.access";

static ACCESS_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rotation {
    Minutely,
    Hourly,
    Daily,
}

impl Rotation {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hourly" => Rotation::Hourly,
            "minutely" => Rotation::Minutely,
            _ => Rotation::Daily,
        }
    }
}

/// Install the global tracing subscriber.
///
/// Console output honours `RUST_LOG` (default `info`). With
/// `WEBDECK_ACCESS_LOG_ROLL=1` access lines are also written to a rolling
/// file under `WEBDECK_ACCESS_LOG_DIR` (default `logs`).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer();
    let registry = tracing_subscriber::registry().with(fmt_layer.with_filter(filter));
    if env_bool("WEBDECK_ACCESS_LOG_ROLL") == Some(true) {
        let dir = env_nonempty("WEBDECK_ACCESS_LOG_DIR").unwrap_or_else(|| "logs".to_string());
        let prefix =
            env_nonempty("WEBDECK_ACCESS_LOG_PREFIX").unwrap_or_else(|| "http-access".into());
        let rotation = Rotation::parse(
            &env_nonempty("WEBDECK_ACCESS_LOG_ROTATION").unwrap_or_else(|| "daily".into()),
        );
        if std::fs::create_dir_all(&dir).is_err() {
            tracing::warn!(directory = %dir, "failed to create access log directory");
        }
        let writer = match rotation {
            Rotation::Hourly => tracing_appender::rolling::hourly(&dir, &prefix),
            Rotation::Minutely => tracing_appender::rolling::minutely(&dir, &prefix),
            Rotation::Daily => tracing_appender::rolling::daily(&dir, &prefix),
        };
        let (nb, guard) = tracing_appender::non_blocking(writer);
        let _ = ACCESS_GUARD.set(guard);
        let targets = Targets::new().with_target(ACCESS_TARGET, tracing::Level::INFO);
        let access_layer = fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(nb)
            .with_filter(targets);
        let _ = registry.with(access_layer).try_init();
    } else {
        let _ = registry.try_init();
    }
}
