//! Application settings loaded via OrthoConfig.
//!
//! Values layer CLI arguments, `SOAPBOX_*` environment variables, and an
//! optional configuration file. Every field is optional; the accessors
//! apply the defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

/// Address the HTTP server binds to by default.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
/// Directory static documents are read from by default.
pub const DEFAULT_STATIC_DIR: &str = "./public";
/// Default `Access-Control-Allow-Origin` value.
pub const DEFAULT_CORS_ALLOW_ORIGIN: &str = "*";
/// Default connection pool size.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
/// Default timeout for fetching documents from a static origin.
pub const DEFAULT_STATIC_FETCH_TIMEOUT_SECS: u64 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("bind_addr {value:?} is not a socket address")]
    BindAddr { value: String },
    #[error("{field} {value:?} is not an absolute URL")]
    Url { field: &'static str, value: String },
    #[error("database_max_connections must be at least 1")]
    MaxConnections,
}

/// Where static front-end documents come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticSource {
    Directory(PathBuf),
    Origin(Url),
}

/// Configuration values for the Soapbox server.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SOAPBOX")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub database_max_connections: Option<u32>,
    /// Directory for media blobs; an in-memory blob store is used when absent.
    pub media_dir: Option<PathBuf>,
    /// Directory holding `index.html` and `/assets`.
    pub static_dir: Option<PathBuf>,
    /// HTTP origin serving the static documents; wins over `static_dir`.
    pub static_origin: Option<String>,
    /// Public origin used in share links and meta tags.
    pub public_base_url: Option<String>,
    /// `Access-Control-Allow-Origin` value.
    pub cors_allow_origin: Option<String>,
    /// Timeout in seconds for static origin fetches.
    pub static_fetch_timeout_secs: Option<u64>,
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|_| SettingsError::Url {
        field,
        value: value.to_owned(),
    })
}

impl AppSettings {
    /// Socket address to bind, falling back to [`DEFAULT_BIND_ADDR`].
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    pub fn database_max_connections(&self) -> Result<u32, SettingsError> {
        match self.database_max_connections {
            Some(0) => Err(SettingsError::MaxConnections),
            Some(value) => Ok(value),
            None => Ok(DEFAULT_MAX_CONNECTIONS),
        }
    }

    /// Static document source; an origin URL takes precedence.
    pub fn static_source(&self) -> Result<StaticSource, SettingsError> {
        if let Some(origin) = self.static_origin.as_deref() {
            return parse_url("static_origin", origin).map(StaticSource::Origin);
        }
        Ok(StaticSource::Directory(
            self.static_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        ))
    }

    pub fn public_base_url(&self) -> Result<Option<Url>, SettingsError> {
        self.public_base_url
            .as_deref()
            .map(|raw| parse_url("public_base_url", raw))
            .transpose()
    }

    pub fn cors_allow_origin(&self) -> &str {
        self.cors_allow_origin
            .as_deref()
            .unwrap_or(DEFAULT_CORS_ALLOW_ORIGIN)
    }

    pub fn static_fetch_timeout(&self) -> Duration {
        Duration::from_secs(
            self.static_fetch_timeout_secs
                .unwrap_or(DEFAULT_STATIC_FETCH_TIMEOUT_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 9] = [
        "SOAPBOX_BIND_ADDR",
        "SOAPBOX_DATABASE_URL",
        "SOAPBOX_DATABASE_MAX_CONNECTIONS",
        "SOAPBOX_MEDIA_DIR",
        "SOAPBOX_STATIC_DIR",
        "SOAPBOX_STATIC_ORIGIN",
        "SOAPBOX_PUBLIC_BASE_URL",
        "SOAPBOX_CORS_ALLOW_ORIGIN",
        "SOAPBOX_STATIC_FETCH_TIMEOUT_SECS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("soapbox")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("default addr")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(
            settings.database_max_connections().expect("pool size"),
            DEFAULT_MAX_CONNECTIONS
        );
        assert_eq!(
            settings.static_source().expect("source"),
            StaticSource::Directory(PathBuf::from(DEFAULT_STATIC_DIR))
        );
        assert_eq!(settings.cors_allow_origin(), "*");
        assert_eq!(settings.static_fetch_timeout(), Duration::from_secs(10));
        assert_eq!(settings.public_base_url().expect("base url"), None);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = KEYS.map(|key| (key, None::<String>));
        vars[0].1 = Some("127.0.0.1:9000".to_owned());
        vars[2].1 = Some("4".to_owned());
        vars[5].1 = Some("https://cdn.example.org/app/".to_owned());
        vars[6].1 = Some("https://soapbox.example/".to_owned());
        vars[7].1 = Some("https://soapbox.example".to_owned());
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("bind addr").port(),
            9000
        );
        assert_eq!(settings.database_max_connections().expect("pool size"), 4);
        assert!(matches!(
            settings.static_source().expect("source"),
            StaticSource::Origin(url) if url.host_str() == Some("cdn.example.org")
        ));
        assert_eq!(settings.cors_allow_origin(), "https://soapbox.example");
        assert!(settings.public_base_url().expect("base url").is_some());
    }

    #[rstest]
    #[case(AppSettings { bind_addr: Some("nowhere".into()), ..AppSettings::default() })]
    fn invalid_bind_addresses_are_reported(#[case] settings: AppSettings) {
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    fn zero_pool_size_is_rejected() {
        let settings = AppSettings {
            database_max_connections: Some(0),
            ..AppSettings::default()
        };
        assert_eq!(
            settings.database_max_connections(),
            Err(SettingsError::MaxConnections)
        );
    }

    #[rstest]
    fn relative_public_base_url_is_rejected() {
        let settings = AppSettings {
            public_base_url: Some("/share".into()),
            ..AppSettings::default()
        };
        assert!(matches!(
            settings.public_base_url(),
            Err(SettingsError::Url { field: "public_base_url", .. })
        ));
    }
}
