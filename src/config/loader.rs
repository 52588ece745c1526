//! Reconciliation snapshot loading from disk.
//!
//! A snapshot is what the cluster watcher hands to one reconciliation pass:
//!
//! ```toml
//! [annotations]
//! "router.deis.io/nginx.defaultTimeout" = "1500s"
//!
//! [config_map]
//! "nginx.errorLogLevel" = "info"
//!
//! [[apps]]
//! service_ip = "10.0.0.5"
//! available = true
//! domains = ["example.com"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::schema::AppConfig;

/// Error type for snapshot loading.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Inputs of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterSnapshot {
    /// Deployment annotations, `router.deis.io/nginx.` namespace.
    pub annotations: BTreeMap<String, String>,

    /// Config map data, `nginx.` namespace.
    pub config_map: BTreeMap<String, String>,

    /// Routed applications from the routing state.
    pub apps: Vec<AppConfig>,
}

impl RouterSnapshot {
    pub fn from_toml(content: &str) -> Result<Self, SnapshotError> {
        Ok(toml::from_str(content)?)
    }
}

/// Load a snapshot from a TOML file.
pub fn load_snapshot(path: &Path) -> Result<RouterSnapshot, SnapshotError> {
    let content = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = RouterSnapshot::from_toml(&content)?;

    tracing::debug!(
        path = %path.display(),
        annotations = snapshot.annotations.len(),
        config_map = snapshot.config_map.len(),
        apps = snapshot.apps.len(),
        "Snapshot loaded"
    );

    Ok(snapshot)
}
