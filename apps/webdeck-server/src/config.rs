use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::{info, warn};
use webdeck_core::util::env_nonempty;
use webdeck_core::{load_config, Config};

const DEFAULT_BIND: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_CONC: usize = 1024;
const DEFAULT_UPLOAD_MAX_MB: u64 = 64;
const DEFAULT_WEB_DIR: &str = "web";
const DEFAULT_CONSOLE_DIR: &str = "hack";

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("invalid WEBDECK_HTTP_MAX_CONC: {0}")]
    InvalidConcurrency(String),
    #[error("invalid WEBDECK_PORT: {0}")]
    InvalidPort(String),
    #[error("invalid WEBDECK_BIND: {0}")]
    InvalidBind(String),
    #[error("invalid WEBDECK_UPLOAD_MAX_MB: {0}")]
    InvalidUploadLimit(String),
    #[error("failed to load config file {path}: {reason}")]
    File { path: String, reason: String },
}

/// Effective server settings: environment over config file over defaults.
#[derive(Clone, Debug)]
pub(crate) struct Settings {
    pub addr: SocketAddr,
    pub concurrency_limit: usize,
    pub upload_limit_bytes: usize,
    pub web_dir: PathBuf,
    pub console_dir: PathBuf,
}

pub(crate) fn settings_from_env() -> Result<Settings, ConfigError> {
    let file = match env_nonempty("WEBDECK_CONFIG") {
        Some(path) => {
            let cfg = load_config(&path).map_err(|err| ConfigError::File {
                path: path.clone(),
                reason: err.to_string(),
            })?;
            info!(config_source = %path, "loaded config file");
            cfg
        }
        None => Config::default(),
    };
    resolve(file)
}

fn parse_env<T: std::str::FromStr>(
    key: &str,
    fallback: Option<T>,
    default: T,
    err: fn(String) -> ConfigError,
) -> Result<T, ConfigError> {
    match env_nonempty(key) {
        Some(raw) => raw.trim().parse().map_err(|_| err(raw)),
        None => Ok(fallback.unwrap_or(default)),
    }
}

fn resolve(file: Config) -> Result<Settings, ConfigError> {
    let concurrency_limit = parse_env(
        "WEBDECK_HTTP_MAX_CONC",
        file.server.max_concurrency,
        DEFAULT_MAX_CONC,
        ConfigError::InvalidConcurrency,
    )?;
    if concurrency_limit == 0 {
        return Err(ConfigError::InvalidConcurrency("0".into()));
    }
    let port = parse_env(
        "WEBDECK_PORT",
        file.server.port,
        DEFAULT_PORT,
        ConfigError::InvalidPort,
    )?;
    let upload_mb = parse_env(
        "WEBDECK_UPLOAD_MAX_MB",
        file.server.upload_max_mb,
        DEFAULT_UPLOAD_MAX_MB,
        ConfigError::InvalidUploadLimit,
    )?;
    let upload_limit_bytes = usize::try_from(upload_mb.saturating_mul(1024 * 1024))
        .map_err(|_| ConfigError::InvalidUploadLimit(upload_mb.to_string()))?;

    let bind = env_nonempty("WEBDECK_BIND")
        .or(file.server.bind)
        .unwrap_or_else(|| DEFAULT_BIND.into());
    warn_if_public(&bind);
    let addr = format!("{}:{}", host_for_socket(&bind), port)
        .parse()
        .map_err(|_| ConfigError::InvalidBind(bind.clone()))?;

    let web_dir = env_nonempty("WEBDECK_WEB_DIR")
        .or(file.workspace.web_dir)
        .unwrap_or_else(|| DEFAULT_WEB_DIR.into());
    let console_dir = env_nonempty("WEBDECK_CONSOLE_DIR")
        .or(file.workspace.console_dir)
        .unwrap_or_else(|| DEFAULT_CONSOLE_DIR.into());

    Ok(Settings {
        addr,
        concurrency_limit,
        upload_limit_bytes,
        web_dir: PathBuf::from(web_dir),
        console_dir: PathBuf::from(console_dir),
    })
}

/// Host part of a `host:port` string: `localhost` becomes `127.0.0.1` and
/// bare IPv6 addresses get brackets.
fn host_for_socket(bind: &str) -> String {
    let host = bind.trim();
    if host.eq_ignore_ascii_case("localhost") {
        return "127.0.0.1".to_string();
    }
    if host.contains(':') && !host.starts_with('[') {
        return format!("[{host}]");
    }
    host.to_string()
}

/// There is no authentication layer, so anything beyond loopback is
/// reachable by whoever can route to it.
fn warn_if_public(bind: &str) {
    let bind_lower = bind.trim().to_ascii_lowercase();
    let is_loopback = matches!(
        bind_lower.as_str(),
        "127.0.0.1" | "::1" | "[::1]" | "localhost"
    );
    if !is_loopback {
        warn!(
            bind = %bind,
            "binding a non-loopback address; projects can be modified by anyone who can reach it"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webdeck_core::parse_config;
    use webdeck_core::test_support::env;

    const KEYS: &[&str] = &[
        "WEBDECK_CONFIG",
        "WEBDECK_HTTP_MAX_CONC",
        "WEBDECK_PORT",
        "WEBDECK_BIND",
        "WEBDECK_UPLOAD_MAX_MB",
        "WEBDECK_WEB_DIR",
        "WEBDECK_CONSOLE_DIR",
    ];

    #[test]
    fn defaults_without_env_or_file() {
        let mut guard = env::guard();
        guard.clear_keys(KEYS);
        let s = settings_from_env().expect("settings");
        assert_eq!(s.addr, "127.0.0.1:8000".parse().expect("addr"));
        assert_eq!(s.concurrency_limit, 1024);
        assert_eq!(s.upload_limit_bytes, 64 * 1024 * 1024);
        assert_eq!(s.web_dir, PathBuf::from("web"));
        assert_eq!(s.console_dir, PathBuf::from("hack"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut guard = env::guard();
        guard.clear_keys(KEYS);
        guard.set("WEBDECK_PORT", "9100");
        guard.set("WEBDECK_WEB_DIR", "/tmp/projects");
        let file = parse_config("[server]\nport = 9000\nbind = \"0.0.0.0\"\n[workspace]\nweb_dir = \"/srv\"\n")
            .expect("file");
        let s = resolve(file).expect("settings");
        assert_eq!(s.addr, "0.0.0.0:9100".parse().expect("addr"));
        assert_eq!(s.web_dir, PathBuf::from("/tmp/projects"));
    }

    #[test]
    fn invalid_numbers_are_errors() {
        let mut guard = env::guard();
        guard.clear_keys(KEYS);
        guard.set("WEBDECK_PORT", "eighty");
        assert!(matches!(
            settings_from_env(),
            Err(ConfigError::InvalidPort(_))
        ));
        guard.remove("WEBDECK_PORT");
        guard.set("WEBDECK_HTTP_MAX_CONC", "0");
        assert!(matches!(
            settings_from_env(),
            Err(ConfigError::InvalidConcurrency(_))
        ));
        guard.remove("WEBDECK_HTTP_MAX_CONC");
        guard.set("WEBDECK_BIND", "not an ip");
        assert!(matches!(
            settings_from_env(),
            Err(ConfigError::InvalidBind(_))
        ));
    }

    #[test]
    fn loopback_spellings_all_bind() {
        let mut guard = env::guard();
        guard.clear_keys(KEYS);
        for (bind, expected) in [
            ("localhost", "127.0.0.1:8000"),
            ("::1", "[::1]:8000"),
            ("[::1]", "[::1]:8000"),
            ("127.0.0.1", "127.0.0.1:8000"),
        ] {
            guard.set("WEBDECK_BIND", bind);
            let s = settings_from_env().expect("settings");
            assert_eq!(s.addr, expected.parse().expect("addr"), "bind {bind}");
        }
    }

    #[test]
    fn missing_config_file_is_reported() {
        let mut guard = env::guard();
        guard.clear_keys(KEYS);
        guard.set("WEBDECK_CONFIG", "/definitely/not/here.toml");
        assert!(matches!(
            settings_from_env(),
            Err(ConfigError::File { .. })
        ));
    }
}
