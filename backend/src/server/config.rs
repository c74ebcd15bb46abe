//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::middleware::RouterPolicy;
use crate::outbound::persistence::DbPool;
use crate::settings::{DEFAULT_STATIC_FETCH_TIMEOUT_SECS, StaticSource};

/// Builder-style configuration for creating the HTTP server.
#[derive(Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) media_dir: Option<PathBuf>,
    pub(crate) static_source: StaticSource,
    pub(crate) static_fetch_timeout: Duration,
    pub(crate) public_base_url: Option<Url>,
    pub(crate) policy: Arc<RouterPolicy>,
}

impl ServerConfig {
    /// Configuration serving documents from `static_source`, backed by the
    /// in-memory store and blob store until adapters are attached.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, static_source: StaticSource) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            media_dir: None,
            static_source,
            static_fetch_timeout: Duration::from_secs(DEFAULT_STATIC_FETCH_TIMEOUT_SECS),
            public_base_url: None,
            policy: Arc::new(RouterPolicy::default()),
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    ///
    /// When provided, every repository port uses its Diesel adapter;
    /// otherwise the process-local store backs them all.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Keep media blobs on disk under `dir`.
    #[must_use]
    pub fn with_media_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.media_dir = dir;
        self
    }

    #[must_use]
    pub fn with_static_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.static_fetch_timeout = timeout;
        self
    }

    /// Origin used for share links instead of the request host.
    #[must_use]
    pub fn with_public_base_url(mut self, url: Option<Url>) -> Self {
        self.public_base_url = url;
        self
    }

    /// Replace the CORS and caching policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RouterPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[must_use]
    pub fn policy(&self) -> Arc<RouterPolicy> {
        Arc::clone(&self.policy)
    }
}
