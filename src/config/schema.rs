//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure handed to the
//! nginx template. Every leaf has a compiled-in default; the optional
//! composites (`gzip`, `builder`) stay `None` until a layer populates one of
//! their leaves.

use serde::{Deserialize, Serialize};

pub const DEFAULT_WORKER_PROCESSES: &str = "auto";
pub const DEFAULT_MAX_WORKER_CONNECTIONS: i64 = 768;
/// Must exceed the timeout of any load balancer in front of the router.
pub const DEFAULT_TIMEOUT: &str = "1300s";
pub const DEFAULT_ERROR_LOG_LEVEL: &str = "error";
pub const DEFAULT_SERVER_NAME_HASH_MAX_SIZE: i64 = 512;
pub const DEFAULT_SERVER_NAME_HASH_BUCKET_SIZE: i64 = 64;

pub const DEFAULT_SSL_BUFFER_SIZE: &str = "4k";
/// 180 days.
pub const DEFAULT_HSTS_MAX_AGE: i64 = 15_552_000;

pub const DEFAULT_GZIP_COMP_LEVEL: &str = "5";
pub const DEFAULT_GZIP_DISABLE: &str = "msie6";
pub const DEFAULT_GZIP_HTTP_VERSION: &str = "1.1";
pub const DEFAULT_GZIP_MIN_LENGTH: &str = "256";
pub const DEFAULT_GZIP_TYPES: &str = "application/atom+xml application/javascript application/json \
application/rss+xml application/vnd.ms-fontobject application/x-font-ttf \
application/x-web-app-manifest+json application/xhtml+xml application/xml font/opentype \
image/svg+xml image/x-icon text/css text/plain text/x-component";
pub const DEFAULT_GZIP_PROXIED: &str = "any";
pub const DEFAULT_GZIP_VARY: &str = "on";

pub const DEFAULT_BUILDER_CONNECT_TIMEOUT: &str = "10s";
pub const DEFAULT_BUILDER_TCP_TIMEOUT: &str = "1200s";

/// Root configuration rendered into `nginx.conf`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// `worker_processes`; either `auto` or a count.
    pub worker_processes: String,

    /// `worker_connections` in the events block.
    pub max_worker_connections: i64,

    /// Keepalive and upstream send/read timeout, nginx time syntax.
    pub default_timeout: String,

    /// Severity passed to `error_log`.
    pub error_log_level: String,

    pub server_name_hash_max_size: i64,

    pub server_name_hash_bucket_size: i64,

    /// Accept the PROXY protocol on every HTTP listener.
    pub use_proxy_protocol: bool,

    pub ssl: SslConfig,

    /// Compression settings; `None` keeps gzip off entirely.
    pub gzip: Option<GzipConfig>,

    /// Raw TCP passthrough to the builder; `None` omits the stream block.
    pub builder: Option<BuilderConfig>,

    /// Routed applications. Supplied by the routing state, never merged.
    pub apps: Vec<AppConfig>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            worker_processes: DEFAULT_WORKER_PROCESSES.to_string(),
            max_worker_connections: DEFAULT_MAX_WORKER_CONNECTIONS,
            default_timeout: DEFAULT_TIMEOUT.to_string(),
            error_log_level: DEFAULT_ERROR_LOG_LEVEL.to_string(),
            server_name_hash_max_size: DEFAULT_SERVER_NAME_HASH_MAX_SIZE,
            server_name_hash_bucket_size: DEFAULT_SERVER_NAME_HASH_BUCKET_SIZE,
            use_proxy_protocol: false,
            ssl: SslConfig::default(),
            gzip: None,
            builder: None,
            apps: Vec::new(),
        }
    }
}

impl RouterConfig {
    /// Replace the routed applications, keeping every merged setting.
    pub fn with_apps(mut self, apps: Vec<AppConfig>) -> Self {
        self.apps = apps;
        self
    }

    /// Gzip settings, created with defaults on first access.
    pub(crate) fn gzip_mut(&mut self) -> &mut GzipConfig {
        self.gzip.get_or_insert_with(GzipConfig::default)
    }

    /// Builder settings, created with defaults on first access.
    pub(crate) fn builder_mut(&mut self) -> &mut BuilderConfig {
        self.builder.get_or_insert_with(BuilderConfig::default)
    }
}

/// SSL settings. Always present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SslConfig {
    pub buffer_size: String,
    pub hsts: HstsConfig,
}

impl Default for SslConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_SSL_BUFFER_SIZE.to_string(),
            hsts: HstsConfig::default(),
        }
    }
}

/// Strict-Transport-Security settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HstsConfig {
    /// Seconds.
    pub max_age: i64,
    pub include_sub_domains: bool,
    pub preload: bool,
}

impl Default for HstsConfig {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_HSTS_MAX_AGE,
            include_sub_domains: false,
            preload: false,
        }
    }
}

/// Gzip directives, emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GzipConfig {
    pub comp_level: String,
    pub disable: String,
    pub http_version: String,
    pub min_length: String,
    pub types: String,
    pub proxied: String,
    pub vary: String,
}

impl Default for GzipConfig {
    fn default() -> Self {
        Self {
            comp_level: DEFAULT_GZIP_COMP_LEVEL.to_string(),
            disable: DEFAULT_GZIP_DISABLE.to_string(),
            http_version: DEFAULT_GZIP_HTTP_VERSION.to_string(),
            min_length: DEFAULT_GZIP_MIN_LENGTH.to_string(),
            types: DEFAULT_GZIP_TYPES.to_string(),
            proxied: DEFAULT_GZIP_PROXIED.to_string(),
            vary: DEFAULT_GZIP_VARY.to_string(),
        }
    }
}

/// Stream passthrough to the builder's SSH endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub connect_timeout: String,
    pub tcp_timeout: String,
    /// Builder service address; no default.
    pub service_ip: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_BUILDER_CONNECT_TIMEOUT.to_string(),
            tcp_timeout: DEFAULT_BUILDER_TCP_TIMEOUT.to_string(),
            service_ip: String::new(),
        }
    }
}

/// One routed application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Upstream service address, proxied on port 80.
    pub service_ip: String,

    /// Unavailable apps answer 503 instead of proxying.
    #[serde(default)]
    pub available: bool,

    /// Host names served by this app, in render order.
    #[serde(default)]
    pub domains: Vec<String>,
}
