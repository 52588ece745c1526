//! Dotted key resolution.
//!
//! Both layers share one path table. Each layer carries its own namespace
//! prefix which is stripped before lookup:
//!
//! ```text
//! annotations: router.deis.io/nginx.ssl.hsts.maxAge ─┐
//!                                                    ├─▶ ssl.hsts.maxAge ─▶ (SslHstsMaxAge, Integer)
//! config map:  nginx.ssl.hsts.maxAge ────────────────┘
//! ```
//!
//! A key outside the namespace, or a path missing from the table, resolves to
//! `None` and is skipped by the caller.

use std::fmt;

use crate::config::schema::RouterConfig;

/// Namespace of deployment annotations.
pub const ANNOTATION_NAMESPACE: &str = "router.deis.io/nginx.";

/// Namespace of config map entries.
pub const CONFIG_MAP_NAMESPACE: &str = "nginx.";

/// Which layer a key/value map came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerSource {
    Annotations,
    ConfigMap,
}

impl LayerSource {
    pub fn namespace(self) -> &'static str {
        match self {
            LayerSource::Annotations => ANNOTATION_NAMESPACE,
            LayerSource::ConfigMap => CONFIG_MAP_NAMESPACE,
        }
    }

    /// Strip this layer's namespace, if the key carries it.
    pub fn strip<'a>(self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.namespace())
    }

    /// Build the fully namespaced key for a table path.
    pub fn qualify(self, path: &str) -> String {
        format!("{}{}", self.namespace(), path)
    }
}

impl fmt::Display for LayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerSource::Annotations => f.write_str("annotations"),
            LayerSource::ConfigMap => f.write_str("config map"),
        }
    }
}

/// Semantic type a key's string value is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
    Boolean,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => f.write_str("string"),
            ValueKind::Integer => f.write_str("integer"),
            ValueKind::Boolean => f.write_str("boolean"),
        }
    }
}

/// A coerced value ready to be written into a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl ValueKind {
    /// Coerce raw text. Returns `None` when the text is not a valid value of
    /// this kind.
    pub fn coerce(self, raw: &str) -> Option<Value> {
        match self {
            ValueKind::String => Some(Value::String(raw.to_string())),
            ValueKind::Integer => raw.parse::<i64>().ok().map(Value::Integer),
            ValueKind::Boolean => match raw {
                "true" => Some(Value::Boolean(true)),
                "false" => Some(Value::Boolean(false)),
                _ => None,
            },
        }
    }
}

/// Every leaf of [`RouterConfig`] addressable by a dotted key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigField {
    WorkerProcesses,
    MaxWorkerConnections,
    DefaultTimeout,
    ErrorLogLevel,
    ServerNameHashMaxSize,
    ServerNameHashBucketSize,
    UseProxyProtocol,
    SslBufferSize,
    SslHstsMaxAge,
    SslHstsIncludeSubDomains,
    SslHstsPreload,
    GzipCompLevel,
    GzipDisable,
    GzipHttpVersion,
    GzipMinLength,
    GzipTypes,
    GzipProxied,
    GzipVary,
    BuilderConnectTimeout,
    BuilderTcpTimeout,
    BuilderServiceIp,
}

/// One row of the path table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPath {
    /// Dotted path below the layer namespace.
    pub path: &'static str,
    pub field: ConfigField,
    pub kind: ValueKind,
}

const fn key(path: &'static str, field: ConfigField, kind: ValueKind) -> KeyPath {
    KeyPath { path, field, kind }
}

/// Every recognized key path.
pub static KEY_TABLE: &[KeyPath] = &[
    key("workerProcesses", ConfigField::WorkerProcesses, ValueKind::String),
    key("maxWorkerConnections", ConfigField::MaxWorkerConnections, ValueKind::Integer),
    key("defaultTimeout", ConfigField::DefaultTimeout, ValueKind::String),
    key("errorLogLevel", ConfigField::ErrorLogLevel, ValueKind::String),
    key("serverNameHashMaxSize", ConfigField::ServerNameHashMaxSize, ValueKind::Integer),
    key("serverNameHashBucketSize", ConfigField::ServerNameHashBucketSize, ValueKind::Integer),
    key("useProxyProtocol", ConfigField::UseProxyProtocol, ValueKind::Boolean),
    key("ssl.bufferSize", ConfigField::SslBufferSize, ValueKind::String),
    key("ssl.hsts.maxAge", ConfigField::SslHstsMaxAge, ValueKind::Integer),
    key("ssl.hsts.includeSubDomains", ConfigField::SslHstsIncludeSubDomains, ValueKind::Boolean),
    key("ssl.hsts.preload", ConfigField::SslHstsPreload, ValueKind::Boolean),
    key("gzip.compLevel", ConfigField::GzipCompLevel, ValueKind::String),
    key("gzip.disable", ConfigField::GzipDisable, ValueKind::String),
    key("gzip.httpVersion", ConfigField::GzipHttpVersion, ValueKind::String),
    key("gzip.minLength", ConfigField::GzipMinLength, ValueKind::String),
    key("gzip.types", ConfigField::GzipTypes, ValueKind::String),
    key("gzip.proxied", ConfigField::GzipProxied, ValueKind::String),
    key("gzip.vary", ConfigField::GzipVary, ValueKind::String),
    key("builder.connectTimeout", ConfigField::BuilderConnectTimeout, ValueKind::String),
    key("builder.tcpTimeout", ConfigField::BuilderTcpTimeout, ValueKind::String),
    key("builder.serviceIP", ConfigField::BuilderServiceIp, ValueKind::String),
];

/// Look up a path (namespace already stripped).
pub fn resolve(path: &str) -> Option<&'static KeyPath> {
    KEY_TABLE.iter().find(|entry| entry.path == path)
}

/// Strip `source`'s namespace from `key` and look up the remainder.
pub fn resolve_key(source: LayerSource, key: &str) -> Option<&'static KeyPath> {
    source.strip(key).and_then(resolve)
}

impl ConfigField {
    /// Write a coerced value into the addressed leaf. Touching a gzip or
    /// builder leaf brings that composite into existence.
    pub(crate) fn apply(self, config: &mut RouterConfig, value: &Value) {
        use ConfigField::*;

        match (self, value) {
            (WorkerProcesses, Value::String(v)) => config.worker_processes = v.clone(),
            (MaxWorkerConnections, Value::Integer(v)) => config.max_worker_connections = *v,
            (DefaultTimeout, Value::String(v)) => config.default_timeout = v.clone(),
            (ErrorLogLevel, Value::String(v)) => config.error_log_level = v.clone(),
            (ServerNameHashMaxSize, Value::Integer(v)) => config.server_name_hash_max_size = *v,
            (ServerNameHashBucketSize, Value::Integer(v)) => {
                config.server_name_hash_bucket_size = *v
            }
            (UseProxyProtocol, Value::Boolean(v)) => config.use_proxy_protocol = *v,
            (SslBufferSize, Value::String(v)) => config.ssl.buffer_size = v.clone(),
            (SslHstsMaxAge, Value::Integer(v)) => config.ssl.hsts.max_age = *v,
            (SslHstsIncludeSubDomains, Value::Boolean(v)) => {
                config.ssl.hsts.include_sub_domains = *v
            }
            (SslHstsPreload, Value::Boolean(v)) => config.ssl.hsts.preload = *v,
            (GzipCompLevel, Value::String(v)) => config.gzip_mut().comp_level = v.clone(),
            (GzipDisable, Value::String(v)) => config.gzip_mut().disable = v.clone(),
            (GzipHttpVersion, Value::String(v)) => config.gzip_mut().http_version = v.clone(),
            (GzipMinLength, Value::String(v)) => config.gzip_mut().min_length = v.clone(),
            (GzipTypes, Value::String(v)) => config.gzip_mut().types = v.clone(),
            (GzipProxied, Value::String(v)) => config.gzip_mut().proxied = v.clone(),
            (GzipVary, Value::String(v)) => config.gzip_mut().vary = v.clone(),
            (BuilderConnectTimeout, Value::String(v)) => {
                config.builder_mut().connect_timeout = v.clone()
            }
            (BuilderTcpTimeout, Value::String(v)) => config.builder_mut().tcp_timeout = v.clone(),
            (BuilderServiceIp, Value::String(v)) => config.builder_mut().service_ip = v.clone(),
            (field, value) => {
                // Values are only ever produced by coercing to the table's kind.
                tracing::warn!(?field, ?value, "value kind does not match field, ignored");
            }
        }
    }
}
